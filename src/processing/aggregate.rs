//! Dashboard aggregations: KPIs, per-line/per-direction summaries, weekday vs weekend,
//! the time × line heatmap and station rankings.
//!
//! All functions are pure. Empty input never fails: KPIs fall back to zeros and
//! [`NOT_AVAILABLE`], table-shaped results come back empty. Averages and maxima are rounded
//! to one decimal with [`round1`].

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::Serialize;

use crate::error::QueryError;
use crate::types::CongestionTable;

use super::filter::{FilterSpec, apply_filters};
use super::reduce::{GroupSummary, group_by, round1, summarize};

/// `peak_time` sentinel when there is no data.
pub const NOT_AVAILABLE: &str = "N/A";

/// Weekday classification: category label → weekday values it covers.
pub const WEEKDAY_CLASSES: [(&str, &[&str]); 2] = [
    ("평일", &["평일"]),
    ("주말", &["토요일", "일요일"]),
];

/// Headline numbers for a filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub peak_congestion: f64,
    /// Time slot of the first record (in table order) with the peak value.
    pub peak_time: String,
    pub avg_congestion: f64,
    pub total_records: usize,
}

impl Kpis {
    fn empty() -> Self {
        Self {
            peak_congestion: 0.0,
            peak_time: NOT_AVAILABLE.to_string(),
            avg_congestion: 0.0,
            total_records: 0,
        }
    }
}

/// One row of [`aggregate_for_line`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSummary {
    pub line: String,
    pub avg_congestion: f64,
    pub max_congestion: f64,
    pub peak_time: String,
}

/// One row of [`compare_by_direction`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionSummary {
    pub direction: String,
    pub avg_congestion: f64,
    pub max_congestion: f64,
    pub peak_time: String,
}

/// One row of [`compare_by_weekday`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayComparison {
    pub category: String,
    pub avg_congestion: f64,
    pub max_congestion: f64,
}

/// One row of [`top_n_stations`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRank {
    /// 1-based rank.
    pub rank: usize,
    pub station_name: String,
    pub line: String,
    pub congestion: f64,
}

/// How stations are ranked by [`top_n_stations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankBy {
    /// Highest single time-slot value.
    Max,
    /// Mean over all time slots.
    Avg,
}

impl FromStr for RankBy {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(RankBy::Max),
            "avg" | "mean" => Ok(RankBy::Avg),
            _ => Err(QueryError::InvalidRankBy { value: s.to_string() }),
        }
    }
}

impl RankBy {
    /// The unrounded ranking value of a group.
    pub fn value_of(self, summary: &GroupSummary) -> f64 {
        match self {
            RankBy::Max => summary.max,
            RankBy::Avg => summary.mean(),
        }
    }
}

/// Average congestion per (time slot, line).
///
/// Rows are time slots in ascending (chronological) order, columns are lines in ascending
/// order. Combinations with no records are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Heatmap {
    pub time_slots: Vec<String>,
    pub lines: Vec<String>,
    /// `values[row][col]` for `time_slots[row]` × `lines[col]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl Heatmap {
    pub fn is_empty(&self) -> bool {
        self.time_slots.is_empty()
    }

    /// Cell for a (time slot, line) pair; `None` if either is unknown or the cell is empty.
    pub fn get(&self, time_slot: &str, line: &str) -> Option<f64> {
        let row = self.time_slots.iter().position(|t| t == time_slot)?;
        let col = self.lines.iter().position(|l| l == line)?;
        self.values[row][col]
    }
}

/// Filter `table` with `spec`, then compute the headline KPIs.
pub fn compute_kpis(table: &CongestionTable, spec: &FilterSpec) -> Kpis {
    let filtered = apply_filters(table, spec);
    match summarize(&filtered) {
        None => Kpis::empty(),
        Some(s) => Kpis {
            peak_congestion: round1(s.max),
            peak_time: s.peak_time.clone(),
            avg_congestion: round1(s.mean()),
            total_records: s.count,
        },
    }
}

/// Sort groups by key so output does not depend on record order.
fn sorted_groups(mut groups: Vec<(String, GroupSummary)>) -> Vec<(String, GroupSummary)> {
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
}

/// Per-line mean/max congestion and peak time, sorted by average descending.
///
/// Lines with equal rounded averages keep ascending line order.
pub fn aggregate_for_line(table: &CongestionTable) -> Vec<LineSummary> {
    let mut out = sorted_groups(group_by(table, |r| r.line.clone()))
        .into_iter()
        .map(|(line, s)| LineSummary {
            line,
            avg_congestion: round1(s.mean()),
            max_congestion: round1(s.max),
            peak_time: s.peak_time,
        })
        .collect::<Vec<_>>();
    out.sort_by(|a, b| b.avg_congestion.total_cmp(&a.avg_congestion));
    out
}

/// Per-direction mean/max congestion and peak time, in ascending direction order.
pub fn compare_by_direction(table: &CongestionTable) -> Vec<DirectionSummary> {
    sorted_groups(group_by(table, |r| r.direction.clone()))
        .into_iter()
        .map(|(direction, s)| DirectionSummary {
            direction,
            avg_congestion: round1(s.mean()),
            max_congestion: round1(s.max),
            peak_time: s.peak_time,
        })
        .collect()
}

/// Weekday vs weekend mean/max congestion.
///
/// Categories follow [`WEEKDAY_CLASSES`] order; a category without records is omitted.
pub fn compare_by_weekday(table: &CongestionTable) -> Vec<WeekdayComparison> {
    WEEKDAY_CLASSES
        .iter()
        .filter_map(|(category, days)| {
            let subset = table.filter_rows(|r| days.contains(&r.weekday.as_str()));
            summarize(&subset).map(|s| WeekdayComparison {
                category: category.to_string(),
                avg_congestion: round1(s.mean()),
                max_congestion: round1(s.max),
            })
        })
        .collect()
}

/// Mean congestion per (time slot, line), laid out as a matrix.
pub fn aggregate_for_heatmap(table: &CongestionTable) -> Heatmap {
    let groups = group_by(table, |r| (r.time_slot.clone(), r.line.clone()));
    if groups.is_empty() {
        return Heatmap::default();
    }

    let time_slots = groups
        .iter()
        .map(|((t, _), _)| t.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    let lines = groups
        .iter()
        .map(|((_, l), _)| l.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    let cells = groups
        .into_iter()
        .map(|(k, s)| (k, round1(s.mean())))
        .collect::<BTreeMap<_, _>>();

    let values = time_slots
        .iter()
        .map(|t| {
            lines
                .iter()
                .map(|l| cells.get(&(t.clone(), l.clone())).copied())
                .collect()
        })
        .collect();

    Heatmap {
        time_slots,
        lines,
        values,
    }
}

/// The `n` most congested (station, line) pairs.
///
/// Each pair is reduced by max or mean per `rank_by`, then sorted descending. Pairs with equal
/// values keep the order in which they first appear in `table`. Ranks run 1..=k.
pub fn top_n_stations(table: &CongestionTable, n: usize, rank_by: RankBy) -> Vec<StationRank> {
    let mut ranked = group_by(table, |r| (r.station_name.clone(), r.line.clone()))
        .into_iter()
        .map(|(key, s)| (key, rank_by.value_of(&s)))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, ((station_name, line), value))| StationRank {
            rank: i + 1,
            station_name,
            line,
            congestion: round1(value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CongestionRecord;

    fn record(weekday: &str, line: &str, station: &str, direction: &str, time_slot: &str, congestion: f64) -> CongestionRecord {
        CongestionRecord {
            weekday: weekday.to_string(),
            line: line.to_string(),
            station_number: "0000".to_string(),
            station_name: station.to_string(),
            direction: direction.to_string(),
            time_slot: time_slot.to_string(),
            congestion,
        }
    }

    fn sample_table() -> CongestionTable {
        CongestionTable::new(vec![
            record("평일", "1호선", "서울역", "상선", "07:30", 60.0),
            record("평일", "1호선", "서울역", "하선", "08:00", 40.0),
            record("평일", "2호선", "강남", "내선", "08:00", 120.0),
            record("평일", "2호선", "강남", "외선", "18:00", 90.0),
            record("토요일", "2호선", "강남", "내선", "13:00", 50.0),
            record("일요일", "1호선", "서울역", "상선", "13:00", 30.0),
        ])
    }

    #[test]
    fn kpis_over_filtered_view() {
        let kpis = compute_kpis(&sample_table(), &FilterSpec::new().with_line("2호선"));
        assert_eq!(
            kpis,
            Kpis {
                peak_congestion: 120.0,
                peak_time: "08:00".to_string(),
                avg_congestion: 86.7,
                total_records: 3,
            }
        );
    }

    #[test]
    fn kpis_on_empty_result_use_sentinels() {
        let kpis = compute_kpis(&sample_table(), &FilterSpec::new().with_line("9호선"));
        assert_eq!(kpis.peak_congestion, 0.0);
        assert_eq!(kpis.peak_time, NOT_AVAILABLE);
        assert_eq!(kpis.avg_congestion, 0.0);
        assert_eq!(kpis.total_records, 0);
    }

    #[test]
    fn line_summary_sorted_by_average_descending() {
        let out = aggregate_for_line(&sample_table());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].line, "2호선");
        assert_eq!(out[0].avg_congestion, 86.7);
        assert_eq!(out[0].max_congestion, 120.0);
        assert_eq!(out[0].peak_time, "08:00");
        assert_eq!(out[1].line, "1호선");
        assert_eq!(out[1].avg_congestion, 43.3);
        assert_eq!(out[1].peak_time, "07:30");
    }

    #[test]
    fn line_summary_of_empty_table_is_empty() {
        assert!(aggregate_for_line(&CongestionTable::default()).is_empty());
    }

    #[test]
    fn direction_comparison_in_key_order() {
        let out = compare_by_direction(&sample_table());
        let dirs = out.iter().map(|d| d.direction.as_str()).collect::<Vec<_>>();
        assert_eq!(dirs, vec!["내선", "상선", "외선", "하선"]);

        let inner = &out[0];
        assert_eq!(inner.avg_congestion, 85.0);
        assert_eq!(inner.max_congestion, 120.0);
        assert_eq!(inner.peak_time, "08:00");
    }

    #[test]
    fn weekday_comparison_groups_weekend_days() {
        let out = compare_by_weekday(&sample_table());
        assert_eq!(
            out,
            vec![
                WeekdayComparison {
                    category: "평일".to_string(),
                    avg_congestion: 77.5,
                    max_congestion: 120.0,
                },
                WeekdayComparison {
                    category: "주말".to_string(),
                    avg_congestion: 40.0,
                    max_congestion: 50.0,
                },
            ]
        );
    }

    #[test]
    fn weekday_comparison_omits_empty_categories() {
        let weekdays_only = sample_table().filter_rows(|r| r.weekday == "평일");
        let out = compare_by_weekday(&weekdays_only);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, "평일");
    }

    #[test]
    fn heatmap_layout_and_missing_cells() {
        let heatmap = aggregate_for_heatmap(&sample_table());
        assert_eq!(heatmap.time_slots, vec!["07:30", "08:00", "13:00", "18:00"]);
        assert_eq!(heatmap.lines, vec!["1호선", "2호선"]);
        assert_eq!(heatmap.get("13:00", "1호선"), Some(30.0));
        assert_eq!(heatmap.get("13:00", "2호선"), Some(50.0));
        assert_eq!(heatmap.get("07:30", "2호선"), None);
        assert_eq!(heatmap.values[1], vec![Some(40.0), Some(120.0)]);
    }

    #[test]
    fn heatmap_of_empty_table_is_empty() {
        assert!(aggregate_for_heatmap(&CongestionTable::default()).is_empty());
    }

    #[test]
    fn top_n_ties_keep_input_order() {
        let table = CongestionTable::new(vec![
            record("평일", "3호선", "교대", "상선", "08:00", 90.0),
            record("평일", "2호선", "잠실", "내선", "08:00", 50.0),
            record("평일", "2호선", "강남", "내선", "08:00", 90.0),
            record("평일", "4호선", "사당", "상선", "08:00", 70.0),
        ]);

        let out = top_n_stations(&table, 3, RankBy::Max);
        let names = out.iter().map(|s| (s.rank, s.station_name.as_str())).collect::<Vec<_>>();
        assert_eq!(names, vec![(1, "교대"), (2, "강남"), (3, "사당")]);
    }

    #[test]
    fn top_n_by_average_and_oversized_n() {
        let out = top_n_stations(&sample_table(), 10, RankBy::Avg);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].station_name, "강남");
        assert_eq!(out[0].congestion, 86.7);
        assert_eq!(out[1].station_name, "서울역");
        assert_eq!(out[1].congestion, 43.3);
        assert_eq!(out[1].rank, 2);
    }

    #[test]
    fn top_n_on_empty_table() {
        assert!(top_n_stations(&CongestionTable::default(), 5, RankBy::Max).is_empty());
    }

    #[test]
    fn rank_by_parses_or_fails_fast() {
        assert_eq!("max".parse::<RankBy>(), Ok(RankBy::Max));
        assert_eq!("AVG".parse::<RankBy>(), Ok(RankBy::Avg));
        let err = "median".parse::<RankBy>().unwrap_err();
        assert_eq!(err, QueryError::InvalidRankBy { value: "median".to_string() });
        assert!(err.to_string().contains("'median'"));
    }

    #[test]
    fn rank_by_selects_max_or_mean_of_a_group() {
        let table = CongestionTable::new(vec![
            record("평일", "2호선", "강남", "내선", "08:00", 90.0),
            record("평일", "2호선", "강남", "내선", "09:00", 30.0),
        ]);
        let summary = summarize(&table).unwrap();
        assert_eq!(RankBy::Max.value_of(&summary), 90.0);
        assert_eq!(RankBy::Avg.value_of(&summary), 60.0);
    }
}
