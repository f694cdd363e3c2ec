//! Visibility evaluation: AND within an expression, OR across tags.

use std::sync::Arc;
use super::expression::{Constraint, ConstraintIter};
use crate::model::{AuthorizedLabelSet, TagIter, TagRef};
use crate::verdict::{IncludeReason, SkipReason, Verdict};
use crate::Result;

/// Result of checking one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionOutcome {
    Satisfied,
    /// The first constraint that failed. Later constraints are not decoded.
    Failed(SkipReason),
}

/// Check one constraint against the authorized set.
#[inline]
pub fn check_constraint(constraint: Constraint, labels: &AuthorizedLabelSet) -> Option<SkipReason> {
    match constraint {
        Constraint::Require(ordinal) if !labels.contains(ordinal) => {
            Some(SkipReason::RequiredLabelMissing { ordinal })
        }
        Constraint::Forbid(ordinal) if labels.contains(ordinal) => {
            Some(SkipReason::ForbiddenLabelPresent { ordinal })
        }
        _ => None,
    }
}

/// Evaluate one packed expression payload as a conjunction.
///
/// Short-circuits on the first failing constraint; bytes after it are
/// never decoded. An empty payload is trivially satisfied.
pub fn evaluate_expression(payload: &[u8], labels: &AuthorizedLabelSet) -> Result<ExpressionOutcome> {
    for constraint in ConstraintIter::new(payload) {
        if let Some(reason) = check_constraint(constraint?, labels) {
            return Ok(ExpressionOutcome::Failed(reason));
        }
    }
    Ok(ExpressionOutcome::Satisfied)
}

/// Evaluate a cell's tags.
///
/// Non-visibility tags are ignored. The first satisfied expression
/// includes the cell. With no visibility tag at all the cell is included;
/// otherwise it is skipped with the reason of the last failed expression.
pub fn evaluate_tags<'t, I>(tags: I, labels: &AuthorizedLabelSet) -> Result<Verdict>
where
    I: IntoIterator<Item = Result<TagRef<'t>>>,
{
    let mut last_failure = None;
    for tag in tags {
        let tag = tag?;
        if !tag.is_visibility() {
            continue;
        }
        match evaluate_expression(tag.value, labels)? {
            ExpressionOutcome::Satisfied => {
                return Ok(Verdict::Include(IncludeReason::ExpressionSatisfied));
            }
            ExpressionOutcome::Failed(reason) => last_failure = Some(reason),
        }
    }
    Ok(match last_failure {
        Some(reason) => Verdict::Skip(reason),
        None => Verdict::Include(IncludeReason::NoVisibilityExpression),
    })
}

// ============================================================================
// VisibilityEvaluator
// ============================================================================

/// Evaluates cells against one scan's authorized labels.
///
/// Holds no per-cell state; cloning shares the label set.
#[derive(Debug, Clone)]
pub struct VisibilityEvaluator {
    labels: Arc<AuthorizedLabelSet>,
}

impl VisibilityEvaluator {
    pub fn new(labels: Arc<AuthorizedLabelSet>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &AuthorizedLabelSet {
        &self.labels
    }

    /// Evaluate a packed tag block.
    pub fn evaluate(&self, tag_block: &[u8]) -> Result<Verdict> {
        evaluate_tags(TagIter::new(tag_block), &self.labels)
    }

    /// Evaluate already-split tags.
    pub fn evaluate_refs<'t>(&self, tags: impl IntoIterator<Item = TagRef<'t>>) -> Result<Verdict> {
        evaluate_tags(tags.into_iter().map(Ok), &self.labels)
    }
}

// ============================================================================
// Tests
// ============================================================================
