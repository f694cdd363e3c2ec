//! Tags — typed metadata blobs attached to a cell.
//!
//! A cell carries its tags as one packed block. Each tag is laid out as:
//!
//! ```text
//! ┌──────────────────────┬──────────┬─────────────────────┐
//! │ length: u16 (BE)     │ type: u8 │ payload             │
//! │ = 1 + payload length │          │ (length - 1 bytes)  │
//! └──────────────────────┴──────────┴─────────────────────┘
//! ```
//!
//! Only [`VISIBILITY_TAG_TYPE`] tags are interpreted by the filter; every
//! other type is walked over untouched.

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Tag type carrying a packed visibility expression.
pub const VISIBILITY_TAG_TYPE: u8 = 2;

/// Size of the big-endian length prefix.
pub const TAG_LENGTH_SIZE: usize = 2;

/// Size of the type byte.
pub const TAG_TYPE_SIZE: usize = 1;

/// Largest payload a single tag can carry.
pub const MAX_TAG_PAYLOAD: usize = u16::MAX as usize - TAG_TYPE_SIZE;

// ============================================================================
// Owned tag
// ============================================================================

/// An owned tag, used when building cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub tag_type: u8,
    pub value: Vec<u8>,
}

impl Tag {
    pub fn new(tag_type: u8, value: impl Into<Vec<u8>>) -> Self {
        Self { tag_type, value: value.into() }
    }

    pub fn is_visibility(&self) -> bool {
        self.tag_type == VISIBILITY_TAG_TYPE
    }

    pub fn view(&self) -> TagRef<'_> {
        TagRef { tag_type: self.tag_type, value: &self.value }
    }

    /// Append this tag, length-prefixed, to a tag block.
    pub fn encode_into(&self, block: &mut Vec<u8>) -> Result<()> {
        if self.value.len() > MAX_TAG_PAYLOAD {
            return Err(Error::MalformedTag {
                offset: block.len(),
                message: format!(
                    "payload of {} bytes exceeds the {} byte tag limit",
                    self.value.len(),
                    MAX_TAG_PAYLOAD
                ),
            });
        }
        let len = (self.value.len() + TAG_TYPE_SIZE) as u16;
        block.extend_from_slice(&len.to_be_bytes());
        block.push(self.tag_type);
        block.extend_from_slice(&self.value);
        Ok(())
    }
}

// ============================================================================
// Borrowed tag view
// ============================================================================

/// A tag borrowed out of a packed tag block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRef<'a> {
    pub tag_type: u8,
    pub value: &'a [u8],
}

impl<'a> TagRef<'a> {
    pub fn is_visibility(&self) -> bool {
        self.tag_type == VISIBILITY_TAG_TYPE
    }

    pub fn to_tag(&self) -> Tag {
        Tag::new(self.tag_type, self.value)
    }
}

// ============================================================================
// Tag block iteration
// ============================================================================

/// Lazy iterator over a packed tag block.
///
/// Yields an error (and then stops) when a tag's declared length is zero
/// or runs past the end of the block.
#[derive(Debug, Clone)]
pub struct TagIter<'a> {
    block: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> TagIter<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        Self { block, pos: 0, failed: false }
    }

    fn fail(&mut self, message: String) -> Option<Result<TagRef<'a>>> {
        self.failed = true;
        Some(Err(Error::MalformedTag { offset: self.pos, message }))
    }
}

impl<'a> Iterator for TagIter<'a> {
    type Item = Result<TagRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.block.len() {
            return None;
        }
        let rest = &self.block[self.pos..];
        if rest.len() < TAG_LENGTH_SIZE {
            return self.fail(format!("{} trailing bytes cannot hold a tag length", rest.len()));
        }
        let len = u16::from_be_bytes([rest[0], rest[1]]) as usize;
        if len < TAG_TYPE_SIZE {
            return self.fail("zero-length tag".into());
        }
        let body = &rest[TAG_LENGTH_SIZE..];
        if body.len() < len {
            return self.fail(format!(
                "tag declares {len} bytes but only {} remain",
                body.len()
            ));
        }
        self.pos += TAG_LENGTH_SIZE + len;
        Some(Ok(TagRef { tag_type: body[0], value: &body[TAG_TYPE_SIZE..len] }))
    }
}

/// Pack a sequence of tags into a single block.
pub fn encode_tags<'t>(tags: impl IntoIterator<Item = &'t Tag>) -> Result<Vec<u8>> {
    let mut block = Vec::new();
    for tag in tags {
        tag.encode_into(&mut block)?;
    }
    Ok(block)
}

// ============================================================================
// Tests
// ============================================================================
