//! Cell — a single stored (row, family, qualifier, version, value, tags) unit.

use serde::{Deserialize, Serialize};
use super::tag::{Tag, TagIter};
use crate::Result;

/// A cell as supplied by the scan, in sorted order.
///
/// Tags are held as one packed block (see [`super::tag`]); the filter
/// borrows into it without copying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: Vec<u8>,
    pub family: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub timestamp: u64,
    pub value: Vec<u8>,
    pub tags: Vec<u8>,
}

impl Cell {
    pub fn new(
        row: impl Into<Vec<u8>>,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        timestamp: u64,
    ) -> Self {
        Self {
            row: row.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp,
            value: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = value.into();
        self
    }

    /// Append a tag to the cell's tag block.
    pub fn with_tag(mut self, tag: Tag) -> Result<Self> {
        tag.encode_into(&mut self.tags)?;
        Ok(self)
    }

    pub fn tags(&self) -> TagIter<'_> {
        TagIter::new(&self.tags)
    }

    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}
