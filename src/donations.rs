use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{DonationRecord, GroupAvailability};

/// Optional filters for a donation search. Empty strings mean "no constraint".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub blood_group: String,
    pub location: String,
    /// Accepted for compatibility with callers; not applied
    pub date_range: String,
    pub available_only: bool,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            blood_group: String::new(),
            location: String::new(),
            date_range: String::new(),
            available_only: true,
        }
    }
}

impl SearchCriteria {
    pub fn matches(&self, record: &DonationRecord) -> bool {
        if !self.blood_group.is_empty() && record.blood_group != self.blood_group {
            return false;
        }

        if !self.location.is_empty() && record.location != self.location {
            return false;
        }

        !self.available_only || record.is_available
    }
}

/// Search results, serialized as `{"donations": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub donations: Vec<DonationRecord>,
}

/// Per-group availability keyed by the raw blood group string
pub type AvailabilityReport = BTreeMap<String, GroupAvailability>;

/// Linear filter over donation records
pub struct DonationFilter;

impl DonationFilter {
    pub fn new() -> Self {
        Self
    }

    /// Records matching every supplied filter, in input order
    pub fn search(&self, records: &[DonationRecord], criteria: &SearchCriteria) -> SearchResults {
        if !criteria.date_range.is_empty() {
            debug!(date_range = %criteria.date_range, "date range filter is not applied");
        }

        let donations: Vec<DonationRecord> = records
            .iter()
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect();

        debug!(
            scanned = records.len(),
            matched = donations.len(),
            "donation search complete"
        );

        SearchResults { donations }
    }
}

impl Default for DonationFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Groups donations by blood group and computes availability
pub struct AvailabilityAggregator;

impl AvailabilityAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Only groups with at least one available record appear in the report,
    /// even when unavailable records give them a non-zero total.
    pub fn calculate(&self, records: &[DonationRecord]) -> AvailabilityReport {
        let mut available: BTreeMap<&str, u64> = BTreeMap::new();
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();

        for record in records {
            if record.is_available {
                *available.entry(record.blood_group.as_str()).or_insert(0) += u64::from(record.units);
            }
            *totals.entry(record.blood_group.as_str()).or_insert(0) += u64::from(record.units);
        }

        let report: AvailabilityReport = available
            .into_iter()
            .map(|(group, available)| {
                let total = totals.get(group).copied().unwrap_or(0);
                (
                    group.to_string(),
                    GroupAvailability {
                        available,
                        total,
                        utilization: utilization(available, total),
                    },
                )
            })
            .collect();

        debug!(
            records = records.len(),
            groups = report.len(),
            "availability calculated"
        );

        report
    }
}

impl Default for AvailabilityAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn utilization(available: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        available as f64 / total as f64
    }
}
