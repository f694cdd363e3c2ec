//! VersionLimitTable — per-column-family maximum version counts.

use hashbrown::HashMap;

/// Family bytes → maximum number of versions admitted per qualifier.
///
/// Immutable once handed to a filter. A family the scan encounters that
/// has no entry here is a configuration error, never "unlimited".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionLimitTable {
    limits: HashMap<Box<[u8]>, u32>,
}

impl VersionLimitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, family: impl AsRef<[u8]>, max_versions: u32) -> Self {
        self.insert(family, max_versions);
        self
    }

    pub fn insert(&mut self, family: impl AsRef<[u8]>, max_versions: u32) {
        self.limits.insert(family.as_ref().into(), max_versions);
    }

    /// Cap for `family`, borrowed lookup without allocation.
    pub fn get(&self, family: &[u8]) -> Option<u32> {
        self.limits.get(family).copied()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

impl<K: AsRef<[u8]>> FromIterator<(K, u32)> for VersionLimitTable {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (family, max_versions) in iter {
            table.insert(family, max_versions);
        }
        table
    }
}
