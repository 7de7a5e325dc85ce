//! Core data model types.
//!
//! Data flows one way through these types:
//!
//! [`RawTable`] (decoded header + string cells) → [`WideTable`] (repaired headers, numeric cells)
//! → [`CongestionTable`] (one [`CongestionRecord`] per station/direction/weekday/time slot).
//!
//! Every stage produces a new value; nothing downstream mutates an upstream table.

use serde::Serialize;

/// Weekday-class column of the wide export.
pub const WEEKDAY_CLASS_COLUMN: &str = "요일구분";
/// Line column of the wide export.
pub const LINE_COLUMN: &str = "호선";
/// Station number column of the wide export.
pub const STATION_NUMBER_COLUMN: &str = "역번호";
/// Station name column of the wide export.
pub const STATION_NAME_COLUMN: &str = "역명";
/// Boarding/alighting (or inbound/outbound) column of the wide export.
pub const DIRECTION_CLASS_COLUMN: &str = "승하구분";

/// The five identifying columns of the wide export, in canonical order.
pub const ID_COLUMNS: [&str; 5] = [
    WEEKDAY_CLASS_COLUMN,
    LINE_COLUMN,
    STATION_NUMBER_COLUMN,
    STATION_NAME_COLUMN,
    DIRECTION_CLASS_COLUMN,
];

/// Field names of the long-format table, in column order.
pub const LONG_COLUMNS: [&str; 7] = [
    "weekday",
    "line",
    "station_number",
    "station_name",
    "direction",
    "time_slot",
    "congestion",
];

/// Decoded tabular input: a header row plus string cells.
///
/// Rows may be shorter or longer than the header row; consumers treat missing cells as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    /// Header names in file order.
    pub headers: Vec<String>,
    /// Row-major cell storage.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a raw table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Identifying attributes shared by every time slot of one wide row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RowKey {
    pub weekday: String,
    pub line: String,
    pub station_number: String,
    pub station_name: String,
    pub direction: String,
}

/// One wide row: identifying attributes plus one congestion value per time column.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub key: RowKey,
    /// Values aligned with [`WideTable::time_columns`]; always finite and `>= 0`.
    pub values: Vec<f64>,
}

/// Wide table after header repair and numeric coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideTable {
    /// Time-slot column labels as they appear in the (repaired) header.
    pub time_columns: Vec<String>,
    pub rows: Vec<WideRow>,
    /// Whether the header row was replaced by the canonical header.
    pub header_repaired: bool,
}

impl WideTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn time_column_count(&self) -> usize {
        self.time_columns.len()
    }
}

/// The canonical long-format unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongestionRecord {
    pub weekday: String,
    pub line: String,
    pub station_number: String,
    pub station_name: String,
    pub direction: String,
    /// `HH:MM`, with `00:00`/`00:30` remapped to `24:00`/`24:30`.
    pub time_slot: String,
    /// Congestion percentage; finite and `>= 0`.
    pub congestion: f64,
}

/// Normalized long-format table.
///
/// Computed once per load and treated as immutable; filters and aggregations return new values.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CongestionTable {
    pub records: Vec<CongestionRecord>,
}

impl CongestionTable {
    /// Create a table from records (order is kept as given).
    pub fn new(records: Vec<CongestionRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CongestionRecord> {
        self.records.iter()
    }

    /// Create a new table containing only records that match `predicate`, in input order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&CongestionRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Self { records }
    }

    /// All congestion values in table order.
    pub fn congestion_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.congestion).collect()
    }
}

impl<'a> IntoIterator for &'a CongestionTable {
    type Item = &'a CongestionRecord;
    type IntoIter = std::slice::Iter<'a, CongestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
