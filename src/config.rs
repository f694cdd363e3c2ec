//! Filter configuration.
//!
//! The two per-scan inputs, in a serializable form:
//!
//! ```json
//! {
//!   "version_limits": { "cf": 3, "meta": 1 },
//!   "authorized_labels": [3, 7]
//! }
//! ```
//!
//! Family names in JSON are UTF-8. Binary family keys are supported by
//! building a [`VersionLimitTable`] directly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use crate::filter::VisibilityLabelFilter;
use crate::model::{AuthorizedLabelSet, VersionLimitTable};
use crate::{Error, Result};

/// Serializable filter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Family name → max versions per qualifier.
    #[serde(default)]
    pub version_limits: HashMap<String, u32>,
    /// Label ordinals the scan is authorized for.
    #[serde(default)]
    pub authorized_labels: Vec<u32>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, family: impl Into<String>, max_versions: u32) -> Self {
        self.version_limits.insert(family.into(), max_versions);
        self
    }

    pub fn with_labels(mut self, ordinals: impl IntoIterator<Item = u32>) -> Self {
        self.authorized_labels.extend(ordinals);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject empty family names and ordinals no expression can encode.
    pub fn validate(&self) -> Result<()> {
        if self.version_limits.keys().any(String::is_empty) {
            return Err(Error::Config("empty column family name in version_limits".into()));
        }
        if let Some(&bad) = self.authorized_labels.iter().find(|&&n| i32::try_from(n).is_err()) {
            return Err(Error::InvalidOrdinal(bad));
        }
        Ok(())
    }

    /// Validate and build the shared, immutable per-scan tables.
    pub fn build(&self) -> Result<FilterTables> {
        self.validate()?;
        let limits: VersionLimitTable = self
            .version_limits
            .iter()
            .map(|(family, &max)| (family.as_bytes(), max))
            .collect();
        let labels = AuthorizedLabelSet::from_ordinals(self.authorized_labels.iter().copied());
        Ok(FilterTables {
            labels: Arc::new(labels),
            limits: Arc::new(limits),
        })
    }
}

/// Immutable tables shared by every filter of one scan configuration.
#[derive(Debug, Clone)]
pub struct FilterTables {
    pub labels: Arc<AuthorizedLabelSet>,
    pub limits: Arc<VersionLimitTable>,
}

impl FilterTables {
    /// A fresh filter instance over these tables.
    pub fn new_filter(&self) -> VisibilityLabelFilter {
        VisibilityLabelFilter::new(Arc::clone(&self.labels), Arc::clone(&self.limits))
    }
}
