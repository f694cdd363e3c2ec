//! Visibility expressions: conjunctions of required/forbidden label ordinals.
//!
//! On the wire an expression is a run of signed varints. A value `n >= 0`
//! requires ordinal `n`; a value `-n` forbids ordinal `n`. The sign is
//! consumed here, at the decode boundary, and everything downstream works
//! with [`Constraint`].

use serde::{Deserialize, Serialize};
use super::varint::{self, VarintIter};
use crate::model::{Tag, VISIBILITY_TAG_TYPE};
use crate::{Error, Result};

/// One term of a visibility expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    /// The scan must be authorized for this ordinal.
    Require(u32),
    /// The scan must NOT be authorized for this ordinal.
    Forbid(u32),
}

impl Constraint {
    /// Interpret a decoded signed value.
    ///
    /// `i32::MIN` has no positive magnitude and is rejected.
    pub fn from_signed(value: i32, offset: usize) -> Result<Self> {
        if value >= 0 {
            Ok(Constraint::Require(value as u32))
        } else if value == i32::MIN {
            Err(Error::Decode {
                offset,
                message: "label ordinal i32::MIN cannot be negated".into(),
            })
        } else {
            Ok(Constraint::Forbid(value.unsigned_abs()))
        }
    }

    /// Signed wire value.
    pub fn to_signed(self) -> Result<i32> {
        match self {
            Constraint::Require(n) => i32::try_from(n).map_err(|_| Error::InvalidOrdinal(n)),
            Constraint::Forbid(0) => Err(Error::InvalidOrdinal(0)),
            Constraint::Forbid(n) => i32::try_from(n)
                .map(|v| -v)
                .map_err(|_| Error::InvalidOrdinal(n)),
        }
    }

    pub fn ordinal(self) -> u32 {
        match self {
            Constraint::Require(n) | Constraint::Forbid(n) => n,
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Lazily decodes the constraints packed in one tag payload.
#[derive(Debug, Clone)]
pub struct ConstraintIter<'a> {
    inner: VarintIter<'a>,
    offset: usize,
}

impl<'a> ConstraintIter<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { inner: varint::decode(payload, 0, payload.len()), offset: 0 }
    }
}

impl<'a> Iterator for ConstraintIter<'a> {
    type Item = Result<Constraint>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(item.and_then(|(value, consumed)| {
            let at = self.offset;
            self.offset += consumed;
            Constraint::from_signed(value, at)
        }))
    }
}

// ============================================================================
// Owned expression (producer side)
// ============================================================================

/// An owned visibility expression, used to build visibility tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityExpression {
    pub constraints: Vec<Constraint>,
}

impl VisibilityExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, ordinal: u32) -> Self {
        self.constraints.push(Constraint::Require(ordinal));
        self
    }

    pub fn forbid(mut self, ordinal: u32) -> Self {
        self.constraints.push(Constraint::Forbid(ordinal));
        self
    }

    /// Build from signed ordinals (`n` requires, `-n` forbids).
    pub fn from_signed(values: &[i32]) -> Result<Self> {
        let constraints = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Constraint::from_signed(v, i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { constraints })
    }

    /// Decode a full tag payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let constraints = ConstraintIter::new(payload).collect::<Result<Vec<_>>>()?;
        Ok(Self { constraints })
    }

    /// Packed varint payload.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(self.constraints.len());
        for constraint in &self.constraints {
            varint::write_raw_varint32(constraint.to_signed()?, &mut payload);
        }
        Ok(payload)
    }

    /// Wrap the encoded payload in a visibility tag.
    pub fn to_tag(&self) -> Result<Tag> {
        Ok(Tag::new(VISIBILITY_TAG_TYPE, self.encode()?))
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}
