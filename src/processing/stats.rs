//! Descriptive statistics and dataset profiling.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{CongestionRecord, CongestionTable, LONG_COLUMNS};

use super::reduce::round1;

/// Distribution of the congestion column, each field rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CongestionStats {
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator).
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

/// Record count and distinct-value counts for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    /// Distinct station names.
    pub stations: usize,
    pub lines: usize,
    pub time_slots: usize,
}

/// Per-column profile of the long-format table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
    pub unique_count: usize,
}

/// Descriptive statistics over the congestion column. Empty input → all zeros.
///
/// Quantiles interpolate linearly between order statistics. With a single record the
/// standard deviation is reported as `0`.
pub fn get_congestion_stats(table: &CongestionTable) -> CongestionStats {
    let mut values = table.congestion_values();
    if values.is_empty() {
        return CongestionStats::default();
    }
    values.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() > 1 {
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (ss / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    CongestionStats {
        mean: round1(mean),
        std: round1(std),
        min: round1(values[0]),
        max: round1(values[values.len() - 1]),
        q25: round1(quantile(&values, 0.25)),
        q50: round1(quantile(&values, 0.50)),
        q75: round1(quantile(&values, 0.75)),
    }
}

/// Linear-interpolation quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Count records plus distinct stations, lines and time slots.
pub fn dataset_summary(table: &CongestionTable) -> DatasetSummary {
    DatasetSummary {
        total_records: table.row_count(),
        stations: distinct_count(table, |r| r.station_name.as_str()),
        lines: distinct_count(table, |r| r.line.as_str()),
        time_slots: distinct_count(table, |r| r.time_slot.as_str()),
    }
}

/// Profile every long-format column: type, null count and distinct-value count.
///
/// Normalization never produces missing values, so `null_count` is always `0`.
pub fn column_profiles(table: &CongestionTable) -> Vec<ColumnProfile> {
    LONG_COLUMNS
        .iter()
        .map(|&name| {
            let (dtype, unique_count) = match name {
                "congestion" => (
                    "float64",
                    table
                        .iter()
                        .map(|r| r.congestion.to_bits())
                        .collect::<HashSet<_>>()
                        .len(),
                ),
                _ => (
                    "string",
                    table
                        .iter()
                        .filter_map(|r| text_field(r, name))
                        .collect::<HashSet<_>>()
                        .len(),
                ),
            };
            ColumnProfile {
                name: name.to_string(),
                dtype: dtype.to_string(),
                null_count: 0,
                unique_count,
            }
        })
        .collect()
}

fn distinct_count<'a, F>(table: &'a CongestionTable, field: F) -> usize
where
    F: Fn(&'a CongestionRecord) -> &'a str,
{
    table.iter().map(field).collect::<HashSet<_>>().len()
}

fn text_field<'a>(record: &'a CongestionRecord, name: &str) -> Option<&'a str> {
    match name {
        "weekday" => Some(record.weekday.as_str()),
        "line" => Some(record.line.as_str()),
        "station_number" => Some(record.station_number.as_str()),
        "station_name" => Some(record.station_name.as_str()),
        "direction" => Some(record.direction.as_str()),
        "time_slot" => Some(record.time_slot.as_str()),
        _ => None,
    }
}
