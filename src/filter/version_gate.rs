//! VersionGate — per-(family, qualifier) version counting.
//!
//! Cells for the same (family, qualifier) arrive contiguously. The gate
//! keeps an owned snapshot of the last family and qualifier it saw and
//! compares each incoming cell against them as borrowed slices; bytes are
//! only copied when the pair changes.

use std::sync::Arc;
use smallvec::SmallVec;
use crate::model::{to_string_binary, VersionLimitTable};
use crate::{Error, Result};

/// Owned copy of a family or qualifier.
pub type KeySnapshot = SmallVec<[u8; 32]>;

/// Gate decision for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Proceed,
    Exhausted,
}

// ============================================================================
// FilterRunningState
// ============================================================================

/// Streaming state carried from one cell to the next.
///
/// Owned by exactly one filter instance. Call [`FilterRunningState::reset`]
/// before reusing it at a new scan position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRunningState {
    /// `None` until the first cell, and after a reset.
    pub family: Option<KeySnapshot>,
    /// Cleared whenever the family changes.
    pub qualifier: Option<KeySnapshot>,
    /// Cap cached from the limit table on family change.
    pub family_max_versions: u32,
    /// Versions of the current qualifier seen so far, this cell included.
    pub qualifier_versions: u32,
}

impl FilterRunningState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the never-seen-a-cell condition.
    pub fn reset(&mut self) {
        self.family = None;
        self.qualifier = None;
        self.family_max_versions = 0;
        self.qualifier_versions = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.family.is_none()
    }
}

fn differs(snapshot: &Option<KeySnapshot>, key: &[u8]) -> bool {
    snapshot.as_deref() != Some(key)
}

fn replace(snapshot: &mut Option<KeySnapshot>, key: &[u8]) {
    match snapshot {
        Some(buf) => {
            buf.clear();
            buf.extend_from_slice(key);
        }
        None => *snapshot = Some(SmallVec::from_slice(key)),
    }
}

// ============================================================================
// VersionGate
// ============================================================================

/// Enforces the per-family version cap across a sorted cell stream.
#[derive(Debug, Clone)]
pub struct VersionGate {
    limits: Arc<VersionLimitTable>,
    state: FilterRunningState,
}

impl VersionGate {
    pub fn new(limits: Arc<VersionLimitTable>) -> Self {
        Self { limits, state: FilterRunningState::new() }
    }

    pub fn state(&self) -> &FilterRunningState {
        &self.state
    }

    pub fn limits(&self) -> &VersionLimitTable {
        &self.limits
    }

    /// Count one cell and decide whether its version budget is spent.
    ///
    /// Fails when `family` has no entry in the limit table. On failure the
    /// state is left untouched.
    pub fn admit(&mut self, family: &[u8], qualifier: &[u8]) -> Result<Admission> {
        let state = &mut self.state;
        if differs(&state.family, family) {
            let cap = self.limits.get(family).ok_or_else(|| Error::MissingVersionLimit {
                family: to_string_binary(family),
            })?;
            replace(&mut state.family, family);
            state.family_max_versions = cap;
            state.qualifier = None;
        }
        if differs(&state.qualifier, qualifier) {
            replace(&mut state.qualifier, qualifier);
            state.qualifier_versions = 0;
        }
        state.qualifier_versions = state.qualifier_versions.saturating_add(1);

        Ok(if state.qualifier_versions > state.family_max_versions {
            Admission::Exhausted
        } else {
            Admission::Proceed
        })
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(limits: &[(&str, u32)]) -> VersionGate {
        VersionGate::new(Arc::new(limits.iter().map(|&(f, n)| (f, n)).collect()))
    }

    #[test]
    fn test_cap_reached_on_same_pair() {
        let mut g = gate(&[("f", 2)]);
        assert_eq!(g.admit(b"f", b"q").unwrap(), Admission::Proceed);
        assert_eq!(g.admit(b"f", b"q").unwrap(), Admission::Proceed);
        assert_eq!(g.admit(b"f", b"q").unwrap(), Admission::Exhausted);
        assert_eq!(g.admit(b"f", b"q").unwrap(), Admission::Exhausted);
        assert_eq!(g.state().qualifier_versions, 4);
    }

    #[test]
    fn test_qualifier_change_resets_count() {
        let mut g = gate(&[("f", 1)]);
        assert_eq!(g.admit(b"f", b"q1").unwrap(), Admission::Proceed);
        assert_eq!(g.admit(b"f", b"q2").unwrap(), Admission::Proceed);
        assert_eq!(g.admit(b"f", b"q2").unwrap(), Admission::Exhausted);
    }

    #[test]
    fn test_family_change_resets_qualifier_and_cap() {
        let mut g = gate(&[("f1", 1), ("f2", 5)]);
        assert_eq!(g.admit(b"f1", b"q").unwrap(), Admission::Proceed);
        assert_eq!(g.admit(b"f2", b"q").unwrap(), Admission::Proceed);
        assert_eq!(g.state().family_max_versions, 5);
        assert_eq!(g.state().qualifier_versions, 1);
    }

    #[test]
    fn test_zero_cap_exhausts_immediately() {
        let mut g = gate(&[("f", 0)]);
        assert_eq!(g.admit(b"f", b"q").unwrap(), Admission::Exhausted);
    }

    #[test]
    fn test_empty_qualifier_is_a_real_key() {
        let mut g = gate(&[("f", 1)]);
        assert_eq!(g.admit(b"f", b"").unwrap(), Admission::Proceed);
        assert_eq!(g.admit(b"f", b"").unwrap(), Admission::Exhausted);
        assert_eq!(g.admit(b"f", b"q").unwrap(), Admission::Proceed);
    }

    #[test]
    fn test_missing_family_is_configuration_error() {
        let mut g = gate(&[("f", 1)]);
        g.admit(b"f", b"q").unwrap();
        let err = g.admit(b"other", b"q").unwrap_err();
        assert!(matches!(err, Error::MissingVersionLimit { ref family } if family == "other"));
        // state untouched by the failed call
        assert_eq!(g.state().family.as_deref(), Some(&b"f"[..]));
        assert_eq!(g.state().qualifier_versions, 1);
    }

    #[test]
    fn test_reset_starts_fresh_count() {
        let mut g = gate(&[("f", 1)]);
        assert_eq!(g.admit(b"f", b"q").unwrap(), Admission::Proceed);
        g.reset();
        assert!(g.state().is_empty());
        assert_eq!(g.state(), &FilterRunningState::default());
        assert_eq!(g.admit(b"f", b"q").unwrap(), Admission::Proceed);
        assert_eq!(g.state().qualifier_versions, 1);
    }

    #[test]
    fn test_long_keys_spill_to_heap() {
        let family = vec![b'f'; 100];
        let mut g = VersionGate::new(Arc::new(VersionLimitTable::new().with_limit(&family, 1)));
        assert_eq!(g.admit(&family, &[b'q'; 64]).unwrap(), Admission::Proceed);
        assert_eq!(g.admit(&family, &[b'q'; 64]).unwrap(), Admission::Exhausted);
        assert_eq!(g.state().family.as_deref(), Some(family.as_slice()));
    }
}
