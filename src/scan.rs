//! Scan-side driver: runs cells through a filter and owns the logging.
//!
//! The filter itself never logs. `ScanFilter` turns each verdict into a
//! structured `tracing` event and keeps running counts, so observability
//! stays out of the decision path.
//!
//! Version caps apply per row: the driver resets the filter whenever the
//! row key changes, the same way a region scanner resets its filters at
//! each new row.

use serde::{Deserialize, Serialize};
use crate::filter::VisibilityLabelFilter;
use crate::model::{to_string_binary, Cell};
use crate::verdict::{SkipReason, Verdict};
use crate::Result;

/// Per-scan verdict counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub included: u64,
    pub skipped_versions: u64,
    pub skipped_required_label: u64,
    pub skipped_forbidden_label: u64,
}

impl FilterStats {
    pub fn skipped(&self) -> u64 {
        self.skipped_versions + self.skipped_required_label + self.skipped_forbidden_label
    }

    pub fn total(&self) -> u64 {
        self.included + self.skipped()
    }

    fn record(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Include(_) => self.included += 1,
            Verdict::Skip(SkipReason::VersionsExhausted) => self.skipped_versions += 1,
            Verdict::Skip(SkipReason::RequiredLabelMissing { .. }) => self.skipped_required_label += 1,
            Verdict::Skip(SkipReason::ForbiddenLabelPresent { .. }) => self.skipped_forbidden_label += 1,
        }
    }
}

/// Drives a [`VisibilityLabelFilter`] over a sorted cell stream.
#[derive(Debug, Clone)]
pub struct ScanFilter {
    filter: VisibilityLabelFilter,
    stats: FilterStats,
    current_row: Option<Vec<u8>>,
}

impl ScanFilter {
    pub fn new(filter: VisibilityLabelFilter) -> Self {
        Self { filter, stats: FilterStats::default(), current_row: None }
    }

    /// Classify one cell, logging the reason and updating the counters.
    pub fn filter_cell(&mut self, cell: &Cell) -> Result<Verdict> {
        if self.current_row.as_deref() != Some(cell.row.as_slice()) {
            self.filter.reset();
            self.current_row = Some(cell.row.clone());
        }
        let verdict = match self.filter.filter_cell(cell) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(
                    row = %to_string_binary(&cell.row),
                    family = %to_string_binary(&cell.family),
                    error = %err,
                    "cell filter failed, aborting scan"
                );
                return Err(err);
            }
        };
        match verdict {
            Verdict::Skip(reason) => tracing::debug!(
                row = %to_string_binary(&cell.row),
                timestamp = cell.timestamp,
                %reason,
                "skip"
            ),
            Verdict::Include(reason) => tracing::trace!(
                row = %to_string_binary(&cell.row),
                timestamp = cell.timestamp,
                %reason,
                "include"
            ),
        }
        self.stats.record(&verdict);
        Ok(verdict)
    }

    /// Run a whole stream and keep the included cells.
    ///
    /// Stops at the first error; nothing after it is evaluated.
    pub fn filter_cells<I>(&mut self, cells: I) -> Result<Vec<Cell>>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut out = Vec::new();
        for cell in cells {
            if self.filter_cell(&cell)?.is_include() {
                out.push(cell);
            }
        }
        Ok(out)
    }

    /// Forward a scan restart or seek to the filter. Counters are kept.
    pub fn reset(&mut self) {
        tracing::trace!("filter reset");
        self.current_row = None;
        self.filter.reset();
    }

    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    pub fn filter(&self) -> &VisibilityLabelFilter {
        &self.filter
    }

    pub fn into_inner(self) -> VisibilityLabelFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::visibility::VisibilityExpression;
    use crate::Error;
    use pretty_assertions::assert_eq;

    fn scan(cfg: FilterConfig) -> ScanFilter {
        ScanFilter::new(cfg.build().unwrap().new_filter())
    }

    fn tagged(row: &str, qualifier: &str, signed: &[i32]) -> Cell {
        let tag = VisibilityExpression::from_signed(signed).unwrap().to_tag().unwrap();
        Cell::new(row, "cf", qualifier, 1).with_tag(tag).unwrap()
    }

    #[test]
    fn test_stats_by_reason() {
        let mut s = scan(FilterConfig::new().with_limit("cf", 1).with_labels([3]));
        let err = s
            .filter_cells(vec![
                tagged("r1", "a", &[3]),
                tagged("r1", "a", &[3]),
                tagged("r1", "b", &[4]),
                tagged("r1", "c", &[-3]),
                Cell::new("r1", "d", "x", 1),
            ])
            .unwrap_err();
        // "d" is not a configured family
        assert!(matches!(err, Error::MissingVersionLimit { .. }));
        assert_eq!(
            *s.stats(),
            FilterStats {
                included: 1,
                skipped_versions: 1,
                skipped_required_label: 1,
                skipped_forbidden_label: 1,
            }
        );
        assert_eq!(s.stats().total(), 4);
    }

    #[test]
    fn test_filter_cells_keeps_included() {
        let mut s = scan(FilterConfig::new().with_limit("cf", 2).with_labels([1]));
        let kept = s
            .filter_cells(vec![
                tagged("r1", "a", &[1]),
                tagged("r1", "a", &[2]),
                tagged("r1", "a", &[1]),
                Cell::new("r2", "cf", "b", 5),
            ])
            .unwrap();
        let rows: Vec<(&[u8], &[u8])> = kept.iter().map(|c| (&c.row[..], &c.qualifier[..])).collect();
        assert_eq!(rows, vec![(&b"r1"[..], &b"a"[..]), (&b"r2"[..], &b"b"[..])]);
    }

    #[test]
    fn test_new_row_starts_fresh_versions() {
        let mut s = scan(FilterConfig::new().with_limit("cf", 1));
        assert!(s.filter_cell(&Cell::new("r1", "cf", "q", 2)).unwrap().is_include());
        assert!(s.filter_cell(&Cell::new("r1", "cf", "q", 1)).unwrap().is_skip());
        assert!(s.filter_cell(&Cell::new("r2", "cf", "q", 2)).unwrap().is_include());
    }

    #[test]
    fn test_reset_keeps_stats() {
        let mut s = scan(FilterConfig::new().with_limit("cf", 1));
        s.filter_cell(&Cell::new("r", "cf", "q", 1)).unwrap();
        s.reset();
        assert!(s.filter_cell(&Cell::new("r", "cf", "q", 1)).unwrap().is_include());
        assert_eq!(s.stats().included, 2);
    }
}
