//! AuthorizedLabelSet — the bitset of label ordinals a scan may see.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const WORD_BITS: u32 = u64::BITS;

/// Fixed bitset indexed by label ordinal.
///
/// Built once per scan and never mutated afterwards, so a single set can
/// be shared by reference across filter instances. Ordinals beyond the
/// highest set bit read as "not authorized".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedLabelSet {
    words: SmallVec<[u64; 4]>,
}

impl AuthorizedLabelSet {
    /// A set that authorizes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_ordinals(ordinals: impl IntoIterator<Item = u32>) -> Self {
        let mut set = Self::default();
        for ordinal in ordinals {
            set.insert(ordinal);
        }
        set
    }

    fn insert(&mut self, ordinal: u32) {
        let word = (ordinal / WORD_BITS) as usize;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (ordinal % WORD_BITS);
    }

    /// Whether the scan is authorized for `ordinal`.
    #[inline]
    pub fn contains(&self, ordinal: u32) -> bool {
        self.words
            .get((ordinal / WORD_BITS) as usize)
            .is_some_and(|w| w & (1u64 << (ordinal % WORD_BITS)) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of authorized ordinals.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Authorized ordinals in ascending order.
    pub fn ordinals(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            (0..WORD_BITS)
                .filter(move |&bit| w & (1u64 << bit) != 0)
                .map(move |bit| i as u32 * WORD_BITS + bit)
        })
    }
}

impl FromIterator<u32> for AuthorizedLabelSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::from_ordinals(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let set = AuthorizedLabelSet::from_ordinals([3, 7, 64, 300]);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(set.contains(64));
        assert!(set.contains(300));
        assert!(!set.contains(0));
        assert!(!set.contains(5));
        assert!(!set.contains(63));
    }

    #[test]
    fn test_beyond_capacity_is_unauthorized() {
        let set = AuthorizedLabelSet::from_ordinals([1]);
        assert!(!set.contains(1_000_000));
        assert!(!set.contains(u32::MAX));
    }

    #[test]
    fn test_empty() {
        let set = AuthorizedLabelSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(0));
    }

    #[test]
    fn test_ordinals_ascending() {
        let set: AuthorizedLabelSet = [300, 3, 64, 3].into_iter().collect();
        assert_eq!(set.ordinals().collect::<Vec<_>>(), vec![3, 64, 300]);
        assert_eq!(set.len(), 3);
    }
}
