//! `subway-congestion` turns a wide-format subway congestion export into a normalized
//! long-format [`types::CongestionTable`] and answers the filter/aggregation queries a
//! congestion dashboard needs.
//!
//! The primary entrypoint is [`ingestion::load`], which locates the CSV export (an explicit
//! path, or the first `*.csv` under `data/`), decodes it (CP949 with a UTF-8 fallback),
//! repairs the header row, coerces congestion cells and reshapes wide → long.
//!
//! ## Data model
//!
//! One [`types::CongestionRecord`] per (weekday, line, station, direction, time slot):
//!
//! - `time_slot` is `HH:MM`; post-midnight slots `00:00`/`00:30` become `24:00`/`24:30` so that
//!   string order is chronological within a service day
//! - `congestion` is always a finite number `>= 0`; blank or unparseable cells become `0`
//!
//! ## Quick example: load and query
//!
//! ```no_run
//! use subway_congestion::ingestion::{load, LoadOptions};
//! use subway_congestion::processing::{compute_kpis, FilterSpec};
//!
//! # fn main() -> Result<(), subway_congestion::LoadError> {
//! let table = load(&LoadOptions::for_path("data/congestion.csv"))?;
//! let kpis = compute_kpis(&table, &FilterSpec::new().with_line("2호선").with_time_period("출근"));
//! println!("peak {} at {}", kpis.peak_congestion, kpis.peak_time);
//! # Ok(())
//! # }
//! ```
//!
//! ## Normalizing in-memory bytes
//!
//! ```rust
//! use subway_congestion::ingestion::normalize_bytes;
//!
//! let csv = "요일구분,호선,역번호,역명,승하구분,7시30분,00시00분\n평일,2호선,0001,시청,승차,45.2,  \n";
//! let table = normalize_bytes(csv.as_bytes(), "utf-8").unwrap();
//!
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.records[0].time_slot, "07:30");
//! assert_eq!(table.records[0].congestion, 45.2);
//! assert_eq!(table.records[1].time_slot, "24:00");
//! assert_eq!(table.records[1].congestion, 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: loading, decoding, header repair, coercion and reshape
//! - [`types`]: raw, wide and long-format table types
//! - [`processing`]: filters, KPIs, rankings, comparisons and statistics
//! - [`cache`]: optional per-session memoization of loaded tables
//! - [`error`]: error types

pub mod cache;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{LoadError, LoadResult, QueryError, QueryResult};
