//! # cell-visibility — Per-Cell Scan Inclusion Filter
//!
//! Decides, for every cell of a sorted column-family scan, whether the
//! cell reaches scan output.
//!
//! ## Design Principles
//!
//! 1. **Two policies, fixed order**: the per-family version cap runs first
//!    and is cheap; visibility expressions are decoded only for cells that
//!    pass it
//! 2. **Sign decoded at the boundary**: wire ordinals become
//!    `Constraint::{Require, Forbid}` once, nothing downstream looks at signs
//! 3. **Decisions don't log**: every verdict carries a reason code; the
//!    scan driver turns reasons into `tracing` events
//! 4. **Fail loudly**: malformed expressions and unconfigured families are
//!    errors, never silent includes
//!
//! ## Quick Start
//!
//! ```rust
//! use cell_visibility::{Cell, FilterConfig, ScanFilter, VisibilityExpression};
//!
//! # fn example() -> cell_visibility::Result<()> {
//! let tables = FilterConfig::new()
//!     .with_limit("cf", 1)
//!     .with_labels([3, 7])
//!     .build()?;
//! let mut scan = ScanFilter::new(tables.new_filter());
//!
//! // must have 3, must not have 5, must have 7
//! let expr = VisibilityExpression::new().require(3).forbid(5).require(7);
//! let cell = Cell::new("row-1", "cf", "q", 42).with_tag(expr.to_tag()?)?;
//!
//! assert!(scan.filter_cell(&cell)?.is_include());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `model` | Cells, tag blocks, label bitset, version-limit table |
//! | `visibility` | Varint decoding and expression evaluation |
//! | `filter` | Version gate and the combined per-cell decision |
//! | `scan` | Stream driver with logging and counters |
//! | `config` | JSON-loadable filter configuration |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod visibility;
pub mod verdict;
pub mod filter;
pub mod scan;
pub mod config;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    AuthorizedLabelSet, Cell, Tag, TagIter, TagRef, VersionLimitTable,
    VISIBILITY_TAG_TYPE,
};

// ============================================================================
// Re-exports: Visibility
// ============================================================================

pub use visibility::{Constraint, VisibilityEvaluator, VisibilityExpression};

// ============================================================================
// Re-exports: Filter
// ============================================================================

pub use verdict::{IncludeReason, SkipReason, Verdict};
pub use filter::{Admission, FilterRunningState, VersionGate, VisibilityLabelFilter};
pub use scan::{FilterStats, ScanFilter};
pub use config::{FilterConfig, FilterTables};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Decode error at offset {offset}: {message}")]
    Decode { offset: usize, message: String },

    #[error("Malformed tag at offset {offset}: {message}")]
    MalformedTag { offset: usize, message: String },

    #[error("Configuration error: no version limit for column family '{family}'")]
    MissingVersionLimit { family: String },

    #[error("Invalid label ordinal: {0}")]
    InvalidOrdinal(u32),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
