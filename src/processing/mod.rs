//! Queries over the normalized [`crate::types::CongestionTable`].
//!
//! Every function here is pure: tables in, new tables or scalars out. Empty input yields a
//! defined empty/zero result rather than an error, so callers detect "no matching data" via
//! `total_records` or row counts.
//!
//! - [`filter`]: [`FilterSpec`] and [`apply_filters()`], named [`TimePeriod`]s
//! - [`reduce`]: whole-table and grouped reductions ([`group_by`])
//! - [`aggregate`]: KPIs, per-line/per-direction/weekday comparisons, heatmap, top-N stations
//! - [`stats`]: descriptive statistics and dataset profiling
//!
//! ## Example: filter → KPIs → ranking
//!
//! ```rust
//! use subway_congestion::processing::{compute_kpis, top_n_stations, FilterSpec, RankBy};
//! use subway_congestion::types::{CongestionRecord, CongestionTable};
//!
//! let record = |station: &str, time_slot: &str, congestion: f64| CongestionRecord {
//!     weekday: "평일".to_string(),
//!     line: "2호선".to_string(),
//!     station_number: "0222".to_string(),
//!     station_name: station.to_string(),
//!     direction: "내선".to_string(),
//!     time_slot: time_slot.to_string(),
//!     congestion,
//! };
//! let table = CongestionTable::new(vec![
//!     record("강남", "08:00", 120.5),
//!     record("강남", "13:00", 60.0),
//!     record("시청", "08:30", 80.0),
//! ]);
//!
//! let kpis = compute_kpis(&table, &FilterSpec::new().with_time_period("출근"));
//! assert_eq!(kpis.peak_time, "08:00");
//! assert_eq!(kpis.total_records, 2);
//!
//! let top = top_n_stations(&table, 1, RankBy::Max);
//! assert_eq!(top[0].station_name, "강남");
//! ```

pub mod aggregate;
pub mod filter;
pub mod reduce;
pub mod stats;

pub use aggregate::{
    DirectionSummary, Heatmap, Kpis, LineSummary, NOT_AVAILABLE, RankBy, StationRank, WEEKDAY_CLASSES,
    WeekdayComparison, aggregate_for_heatmap, aggregate_for_line, compare_by_direction, compare_by_weekday,
    compute_kpis, top_n_stations,
};
pub use filter::{FilterSpec, TIME_PERIODS, TimePeriod, apply_filters, time_period_of, time_to_minutes};
pub use reduce::{GroupSummary, group_by, round1, summarize};
pub use stats::{
    ColumnProfile, CongestionStats, DatasetSummary, column_profiles, dataset_summary, get_congestion_stats,
};
