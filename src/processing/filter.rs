//! Record filtering for [`crate::types::CongestionTable`].

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{CongestionRecord, CongestionTable};

/// Named time-of-day periods used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimePeriod {
    /// Morning commute (`출근`).
    CommuteIn,
    /// Lunch hours (`점심`).
    Midday,
    /// Evening commute (`퇴근`).
    CommuteOut,
    /// Late night (`심야`), runs past midnight into the `24:xx` slots.
    LateNight,
}

/// Period lookup table: (period, display name, machine name, first slot, last slot).
///
/// Rows follow the variant order of [`TimePeriod`]. Bounds are inclusive `HH:MM` slots
/// compared as strings.
pub const TIME_PERIODS: [(TimePeriod, &str, &str, &str, &str); 4] = [
    (TimePeriod::CommuteIn, "출근", "commute_in", "06:00", "10:00"),
    (TimePeriod::Midday, "점심", "midday", "11:00", "14:00"),
    (TimePeriod::CommuteOut, "퇴근", "commute_out", "17:00", "21:00"),
    (TimePeriod::LateNight, "심야", "late_night", "22:00", "24:30"),
];

impl TimePeriod {
    fn entry(self) -> (TimePeriod, &'static str, &'static str, &'static str, &'static str) {
        // TIME_PERIODS rows are in variant order.
        TIME_PERIODS[self as usize]
    }

    /// Display name, e.g. `출근`.
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Inclusive `(start, end)` slot bounds.
    pub fn bounds(self) -> (&'static str, &'static str) {
        let (_, _, _, start, end) = self.entry();
        (start, end)
    }

    /// Look up a period by display name (`출근`) or machine name (`commute_in`).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        TIME_PERIODS
            .iter()
            .find(|(_, display, machine, ..)| *display == name || *machine == name)
            .map(|(p, ..)| *p)
    }

    /// Whether `time_slot` falls inside this period (inclusive).
    pub fn contains(self, time_slot: &str) -> bool {
        let (start, end) = self.bounds();
        start <= time_slot && time_slot <= end
    }
}

/// Classify a time slot into the first named period containing it.
pub fn time_period_of(time_slot: &str) -> Option<TimePeriod> {
    TIME_PERIODS
        .iter()
        .map(|(p, ..)| *p)
        .find(|p| p.contains(time_slot))
}

/// Convert an `HH:MM` slot into minutes since `00:00` (`24:30` → 1470). Malformed input → `0`.
pub fn time_to_minutes(time_slot: &str) -> u32 {
    time_slot
        .split_once(':')
        .and_then(|(h, m)| {
            let hours = h.trim().parse::<u32>().ok()?;
            let minutes = m.trim().parse::<u32>().ok()?;
            hours.checked_mul(60)?.checked_add(minutes)
        })
        .unwrap_or(0)
}

/// Filter configuration. Every dimension is optional; empty sets do not constrain.
///
/// Dimensions combine with AND. Deserializes from JSON such as
/// `{"line": ["2호선"], "time_period": "출근"}`; a dimension may also be a single string
/// (`{"line": "2호선"}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    #[serde(deserialize_with = "one_or_many")]
    pub weekday: BTreeSet<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub line: BTreeSet<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub station_name: BTreeSet<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub direction: BTreeSet<String>,
    /// Name of a [`TimePeriod`]; unknown names leave the table unfiltered on time.
    pub time_period: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weekday(mut self, weekday: impl Into<String>) -> Self {
        self.weekday.insert(weekday.into());
        self
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line.insert(line.into());
        self
    }

    pub fn with_station(mut self, station_name: impl Into<String>) -> Self {
        self.station_name.insert(station_name.into());
        self
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction.insert(direction.into());
        self
    }

    pub fn with_time_period(mut self, name: impl Into<String>) -> Self {
        self.time_period = Some(name.into());
        self
    }

    /// The period to filter on, if one is named and known.
    pub fn resolved_period(&self) -> Option<TimePeriod> {
        let name = self.time_period.as_deref()?;
        let period = TimePeriod::from_name(name);
        if period.is_none() && !name.trim().is_empty() {
            tracing::debug!(time_period = name, "unknown time period ignored");
        }
        period
    }

    /// Whether `record` passes every configured dimension.
    pub fn matches(&self, record: &CongestionRecord) -> bool {
        self.matches_with_period(record, self.resolved_period())
    }

    fn matches_with_period(&self, record: &CongestionRecord, period: Option<TimePeriod>) -> bool {
        allows(&self.weekday, &record.weekday)
            && allows(&self.line, &record.line)
            && allows(&self.station_name, &record.station_name)
            && allows(&self.direction, &record.direction)
            && period.is_none_or(|p| p.contains(&record.time_slot))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(BTreeSet<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => BTreeSet::from([value]),
        OneOrMany::Many(values) => values,
    })
}

fn allows(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.contains(value)
}

/// Returns a new table with the records matching `spec`, in input order.
pub fn apply_filters(table: &CongestionTable, spec: &FilterSpec) -> CongestionTable {
    let period = spec.resolved_period();
    table.filter_rows(|r| spec.matches_with_period(r, period))
}
