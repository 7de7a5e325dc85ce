//! CSV reading, header repair and congestion cell coercion.
//!
//! The raw export is a wide table: five identifying columns followed by one column per
//! half-hour slot (labels like `5시30분`). This module turns decoded text into a [`WideTable`]:
//!
//! 1. read the header row and cells ([`read_raw_table`]); header names are trimmed
//! 2. decide whether to replace the header with the canonical one ([`repair_headers`])
//! 3. coerce every non-identifying cell to a congestion value ([`coerce_cell`])

use std::io::Read;

use crate::error::{LoadError, LoadResult};
use crate::types::{ID_COLUMNS, RawTable, RowKey, WideRow, WideTable};

/// Outcome of the header repair decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderRepair {
    /// Replace the header row with these names (same length as the original).
    Repaired(Vec<String>),
    /// The header row did not look repairable and is used as-is.
    PassThrough,
}

impl HeaderRepair {
    /// Resolve the decision into the header names to use and whether a repair happened.
    pub fn apply(self, original: &[String]) -> (Vec<String>, bool) {
        match self {
            HeaderRepair::Repaired(headers) => (headers, true),
            HeaderRepair::PassThrough => (original.to_vec(), false),
        }
    }
}

/// Read CSV text (header row required) into a [`RawTable`].
pub fn read_raw_table(text: &str) -> LoadResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    read_raw_table_from_reader(&mut rdr)
}

/// Read from an existing CSV reader. Header names are trimmed; cells are kept verbatim.
pub fn read_raw_table_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> LoadResult<RawTable> {
    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Whether a header label looks like a time-slot column (`시` hour marker, `00분`/`30분` minutes).
pub fn is_time_label(label: &str) -> bool {
    label.contains('시') || label.contains("00분") || label.contains("30분")
}

/// Decide whether to replace the header row with the canonical one.
///
/// When the header has at least as many columns as the five identifying columns plus every
/// recognized time label, the leading five names become the canonical identifying names and
/// the following names become the recognized time labels in order. Columns past that point
/// keep their original names. Otherwise the header passes through unchanged.
pub fn repair_headers(headers: &[String]) -> HeaderRepair {
    let time_labels = headers
        .iter()
        .filter(|h| is_time_label(h))
        .cloned()
        .collect::<Vec<_>>();
    let required = ID_COLUMNS.len() + time_labels.len();

    if headers.len() < required {
        return HeaderRepair::PassThrough;
    }

    let mut repaired = ID_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(time_labels)
        .collect::<Vec<_>>();
    repaired.extend(headers[required..].iter().cloned());
    HeaderRepair::Repaired(repaired)
}

/// Coerce one raw cell to a congestion value.
///
/// Whitespace is stripped before parsing. Anything that is not a finite, non-negative number
/// (blank cells, text, `NaN`, `inf`, negatives) becomes `0`.
pub fn coerce_cell(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Apply header repair and coercion to a raw table.
///
/// Every column other than the five identifying columns is treated as a time-slot column.
/// Returns [`LoadError::MissingColumns`] if an identifying column is still absent after repair.
pub fn coerce_to_wide(raw: &RawTable) -> LoadResult<WideTable> {
    let decision = repair_headers(&raw.headers);
    if decision == HeaderRepair::PassThrough {
        tracing::warn!(
            columns = raw.headers.len(),
            "header row not repairable, using headers as-is"
        );
    }
    let (headers, header_repaired) = decision.apply(&raw.headers);

    let mut id_idxs = [0usize; 5];
    let mut missing = Vec::new();
    for (slot, name) in id_idxs.iter_mut().zip(ID_COLUMNS) {
        match headers.iter().position(|h| h == name) {
            Some(idx) => *slot = idx,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { missing, headers });
    }

    let time_idxs = (0..headers.len())
        .filter(|&i| !ID_COLUMNS.contains(&headers[i].as_str()))
        .collect::<Vec<_>>();
    let time_columns = time_idxs.iter().map(|&i| headers[i].clone()).collect();

    let rows = raw
        .rows
        .iter()
        .map(|cells| {
            let cell = |idx: usize| cells.get(idx).map(|c| c.trim()).unwrap_or("").to_string();
            WideRow {
                key: RowKey {
                    weekday: cell(id_idxs[0]),
                    line: cell(id_idxs[1]),
                    station_number: cell(id_idxs[2]),
                    station_name: cell(id_idxs[3]),
                    direction: cell(id_idxs[4]),
                },
                values: time_idxs
                    .iter()
                    .map(|&i| cells.get(i).map(|c| coerce_cell(c)).unwrap_or(0.0))
                    .collect(),
            }
        })
        .collect();

    Ok(WideTable {
        time_columns,
        rows,
        header_repaired,
    })
}
