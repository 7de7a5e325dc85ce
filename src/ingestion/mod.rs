//! Loading and normalization of congestion exports.
//!
//! Most callers should use [`load`] (from [`loader`]) which:
//!
//! - locates the input (explicit path, or the first `*.csv` under the data directory)
//! - decodes it (CP949 by default, UTF-8 fallback)
//! - repairs the header row and coerces congestion cells to numbers
//! - reshapes the wide table into a long-format [`crate::types::CongestionTable`]
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! The individual stages are also available under:
//! - [`encoding`]
//! - [`csv`]
//! - [`reshape`]

pub mod csv;
pub mod encoding;
pub mod loader;
pub mod observability;
pub mod reshape;

pub use loader::{
    DEFAULT_DATA_DIR, FileInfo, LoadOptions, LoadRequest, csv_info, discover_csv, load, load_from_path,
    load_wide_from_bytes, normalize_bytes, resolve_path,
};
pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, TracingObserver,
};
pub use reshape::{normalize_time_label, to_long_format};
