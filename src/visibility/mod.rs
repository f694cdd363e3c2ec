//! # Visibility Labels
//!
//! Decoding and evaluation of the visibility expressions carried in cell
//! tags.
//!
//! ```text
//! tag block ─► TagIter ─► visibility tag payload
//!                              │
//!                     varint::decode (bounded by tag length)
//!                              │
//!                     Constraint::{Require, Forbid}
//!                              │
//!              AND within a tag, OR across tags ─► Verdict
//! ```
//!
//! A cell without any visibility tag is visible to every scan.

pub mod evaluator;
pub mod expression;
pub mod varint;

pub use evaluator::{
    check_constraint, evaluate_expression, evaluate_tags,
    ExpressionOutcome, VisibilityEvaluator,
};
pub use expression::{Constraint, ConstraintIter, VisibilityExpression};
pub use varint::{read_raw_varint32, write_raw_varint32, VarintIter, MAX_VARINT_LEN};
