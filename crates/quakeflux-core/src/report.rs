use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validity::RejectionReason;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSummary {
    pub path: Option<String>,
    pub file_hash: String,
}

/// Row accounting for one run. `input_rows == emitted + unresolved + rejected`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub input: Option<InputSummary>,
    pub timezone: String,
    pub partitions: usize,
    pub input_rows: usize,
    pub emitted: usize,
    pub unresolved: usize,
    pub rejected: usize,
    pub rejected_by_reason: BTreeMap<String, usize>,
    pub daily_rows: usize,
    pub country_rows: usize,
}

impl RunReport {
    pub fn record_rejection(&mut self, reason: &RejectionReason) {
        self.rejected += 1;
        *self.rejected_by_reason.entry(reason.code()).or_insert(0) += 1;
    }

    pub fn merge_counts(&mut self, other: &RunReport) {
        self.input_rows += other.input_rows;
        self.emitted += other.emitted;
        self.unresolved += other.unresolved;
        self.rejected += other.rejected;
        for (code, count) in &other.rejected_by_reason {
            *self.rejected_by_reason.entry(code.clone()).or_insert(0) += count;
        }
    }
}
