//! Filter verdicts and the reason codes attached to them.
//!
//! Decision functions return a [`Verdict`] and never log. Turning a reason
//! into a log line is left to the caller (see [`crate::scan::ScanFilter`]).

use std::fmt;
use serde::{Deserialize, Serialize};

/// Outcome for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Propagate the cell to scan output.
    Include(IncludeReason),
    /// Drop the cell and continue scanning.
    Skip(SkipReason),
}

impl Verdict {
    pub fn is_include(&self) -> bool {
        matches!(self, Verdict::Include(_))
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Verdict::Skip(_))
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Verdict::Skip(reason) => Some(*reason),
            Verdict::Include(_) => None,
        }
    }
}

/// Why a cell was included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncludeReason {
    /// The cell carries no visibility expression (default-open).
    NoVisibilityExpression,
    /// At least one visibility expression held.
    ExpressionSatisfied,
}

/// Why a cell was skipped.
///
/// When several visibility expressions fail, the reason reported is that
/// of the last one evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// The (family, qualifier) pair already emitted its version cap.
    VersionsExhausted,
    /// An expression required a label the scan is not authorized for.
    RequiredLabelMissing { ordinal: u32 },
    /// An expression forbade a label the scan is authorized for.
    ForbiddenLabelPresent { ordinal: u32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::VersionsExhausted => write!(f, "versions-exhausted"),
            SkipReason::RequiredLabelMissing { ordinal } => {
                write!(f, "required-label-missing({ordinal})")
            }
            SkipReason::ForbiddenLabelPresent { ordinal } => {
                write!(f, "forbidden-label-present({ordinal})")
            }
        }
    }
}

impl fmt::Display for IncludeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncludeReason::NoVisibilityExpression => write!(f, "no-visibility-expression"),
            IncludeReason::ExpressionSatisfied => write!(f, "expression-satisfied"),
        }
    }
}
