//! Wide → long reshape.
//!
//! Every (row, time column) pair of a [`WideTable`] becomes exactly one [`CongestionRecord`], so a
//! table with `R` rows and `T` time columns always yields `R × T` records.

use std::cmp::Ordering;

use crate::types::{CongestionRecord, CongestionTable, WideTable};

/// Post-midnight slots that belong to the previous service day.
const MIDNIGHT_REMAP: [(&str, &str); 2] = [("00:00", "24:00"), ("00:30", "24:30")];

/// Normalize a time column label into a `HH:MM` time slot.
///
/// The hour marker `시` becomes `:` and the minute marker `분` is dropped, then the hour and
/// minute are zero-padded (`5시30분` → `05:30`). `00:00`/`00:30` are remapped to `24:00`/`24:30`
/// so slots sort chronologically across midnight. Labels that do not parse as a time are
/// returned stripped of markers but otherwise unchanged.
pub fn normalize_time_label(label: &str) -> String {
    let cleaned = label.replace('시', ":").replace('분', "");
    let cleaned = cleaned.trim();

    let formatted = cleaned
        .split_once(':')
        .and_then(|(h, m)| {
            let hour = h.trim().parse::<u32>().ok()?;
            let minute = match m.trim() {
                "" => 0,
                m => m.parse::<u32>().ok()?,
            };
            Some(format!("{hour:02}:{minute:02}"))
        })
        .unwrap_or_else(|| cleaned.to_string());

    MIDNIGHT_REMAP
        .iter()
        .find(|(from, _)| *from == formatted)
        .map(|(_, to)| to.to_string())
        .unwrap_or(formatted)
}

/// Reshape a wide table into the long-format [`CongestionTable`].
///
/// Output is sorted ascending by (weekday, line, station number, direction, time slot).
/// Station numbers that are plain integers compare numerically and sort before any
/// non-numeric station numbers. The sort is stable.
pub fn to_long_format(wide: &WideTable) -> CongestionTable {
    let slots = wide
        .time_columns
        .iter()
        .map(|label| normalize_time_label(label))
        .collect::<Vec<_>>();

    let mut records = Vec::with_capacity(wide.row_count() * slots.len());
    for row in &wide.rows {
        for (slot, &congestion) in slots.iter().zip(&row.values) {
            records.push(CongestionRecord {
                weekday: row.key.weekday.clone(),
                line: row.key.line.clone(),
                station_number: row.key.station_number.clone(),
                station_name: row.key.station_name.clone(),
                direction: row.key.direction.clone(),
                time_slot: slot.clone(),
                congestion,
            });
        }
    }

    records.sort_by(compare_records);
    CongestionTable::new(records)
}

fn compare_records(a: &CongestionRecord, b: &CongestionRecord) -> Ordering {
    a.weekday
        .cmp(&b.weekday)
        .then_with(|| a.line.cmp(&b.line))
        .then_with(|| station_sort_key(&a.station_number).cmp(&station_sort_key(&b.station_number)))
        .then_with(|| a.direction.cmp(&b.direction))
        .then_with(|| a.time_slot.cmp(&b.time_slot))
}

fn station_sort_key(number: &str) -> (u8, u64, &str) {
    match number.parse::<u64>() {
        Ok(n) => (0, n, number),
        Err(_) => (1, 0, number),
    }
}
