//! # Cell Model
//!
//! Plain data handed to the filter by the scan: cells, their packed tag
//! blocks, and the two immutable per-scan inputs (authorized labels and
//! per-family version limits).
//!
//! Design rule: this module is pure data. No decisions, no logging.

pub mod bytes;
pub mod cell;
pub mod label_set;
pub mod tag;
pub mod version_limits;

pub use bytes::to_string_binary;
pub use cell::Cell;
pub use label_set::AuthorizedLabelSet;
pub use tag::{
    encode_tags, Tag, TagIter, TagRef,
    MAX_TAG_PAYLOAD, TAG_LENGTH_SIZE, TAG_TYPE_SIZE, VISIBILITY_TAG_TYPE,
};
pub use version_limits::VersionLimitTable;
