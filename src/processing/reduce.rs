//! Reductions over the congestion column, whole-table and grouped.
//!
//! [`group_by`] is the shared primitive behind the line, direction and station aggregations:
//! one pass that keeps count/sum/max per group plus the time slot where the group's
//! maximum first occurs.

use std::collections::HashMap;
use std::hash::Hash;

use crate::types::{CongestionRecord, CongestionTable};

/// Round to one decimal place, ties to even.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}

/// Running summary of a group of records.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
    /// Time slot of the first record (in table order) attaining `max`.
    pub peak_time: String,
}

impl GroupSummary {
    fn start(record: &CongestionRecord) -> Self {
        Self {
            count: 1,
            sum: record.congestion,
            max: record.congestion,
            peak_time: record.time_slot.clone(),
        }
    }

    fn push(&mut self, record: &CongestionRecord) {
        self.count += 1;
        self.sum += record.congestion;
        // Strictly greater: ties keep the earliest record.
        if record.congestion > self.max {
            self.max = record.congestion;
            self.peak_time = record.time_slot.clone();
        }
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Summarize every record of `table` as one group. Returns `None` for an empty table.
pub fn summarize(table: &CongestionTable) -> Option<GroupSummary> {
    let mut records = table.iter();
    let first = records.next()?;
    Some(records.fold(GroupSummary::start(first), |mut acc, r| {
        acc.push(r);
        acc
    }))
}

/// Group records by `key` and summarize each group.
///
/// Groups are returned in order of first appearance in `table`.
pub fn group_by<K, F>(table: &CongestionTable, mut key: F) -> Vec<(K, GroupSummary)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&CongestionRecord) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, GroupSummary)> = Vec::new();

    for record in table {
        let k = key(record);
        match positions.get(&k) {
            Some(&idx) => groups[idx].1.push(record),
            None => {
                positions.insert(k.clone(), groups.len());
                groups.push((k, GroupSummary::start(record)));
            }
        }
    }

    groups
}
