//! # Visibility Label Filter
//!
//! The per-cell decision for one scan:
//!
//! ```text
//! cell ─► VersionGate::admit ── Exhausted ──► Skip(VersionsExhausted)
//!               │
//!            Proceed
//!               │
//!               ▼
//!     VisibilityEvaluator::evaluate ─► Include | Skip(label reason)
//! ```
//!
//! The version check runs first and is cheap; tags of a cell whose
//! version budget is spent are never decoded.
//!
//! A filter instance is single-scan, single-threaded state. Independent
//! scans each own a filter and share the immutable label set and limit
//! table through `Arc`.

pub mod version_gate;

use std::sync::Arc;
use crate::model::{AuthorizedLabelSet, Cell, VersionLimitTable};
use crate::verdict::{SkipReason, Verdict};
use crate::visibility::VisibilityEvaluator;
use crate::Result;

pub use version_gate::{Admission, FilterRunningState, KeySnapshot, VersionGate};

/// Version-cap plus visibility-label filter for one scan.
#[derive(Debug, Clone)]
pub struct VisibilityLabelFilter {
    gate: VersionGate,
    evaluator: VisibilityEvaluator,
}

impl VisibilityLabelFilter {
    pub fn new(labels: Arc<AuthorizedLabelSet>, limits: Arc<VersionLimitTable>) -> Self {
        Self {
            gate: VersionGate::new(limits),
            evaluator: VisibilityEvaluator::new(labels),
        }
    }

    /// Classify one cell given its parts.
    ///
    /// Errors are fatal for the scan: a family missing from the limit
    /// table, or a malformed tag block / visibility expression.
    pub fn decide(&mut self, family: &[u8], qualifier: &[u8], tag_block: &[u8]) -> Result<Verdict> {
        match self.gate.admit(family, qualifier)? {
            Admission::Exhausted => Ok(Verdict::Skip(SkipReason::VersionsExhausted)),
            Admission::Proceed => self.evaluator.evaluate(tag_block),
        }
    }

    /// Classify one cell.
    pub fn filter_cell(&mut self, cell: &Cell) -> Result<Verdict> {
        self.decide(&cell.family, &cell.qualifier, &cell.tags)
    }

    /// Clear the running state.
    ///
    /// Must be called whenever the owning scan restarts or seeks, so that
    /// version counts from the previous position do not carry over.
    pub fn reset(&mut self) {
        self.gate.reset();
    }

    pub fn running_state(&self) -> &FilterRunningState {
        self.gate.state()
    }

    pub fn labels(&self) -> &AuthorizedLabelSet {
        self.evaluator.labels()
    }
}
