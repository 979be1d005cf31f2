use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Calendar orderings
// ---------------------------------------------------------------------------

/// Weekday names in display order (Monday first).
pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Month names in calendar order.
pub const MONTH_ORDER: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a date, e.g. `2011-03-05` → `"March"`.
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_ORDER[date.month0() as usize]
}

// ---------------------------------------------------------------------------
// DailyRecord – one row of day_data
// ---------------------------------------------------------------------------

/// Rentals aggregated over one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub season: String,
    pub weather: String,
    pub working_day: bool,
    pub weekday: String,
    pub month: String,
    /// Total rentals, always `casual + registered`.
    pub total: u32,
    pub casual: u32,
    pub registered: u32,
}

// ---------------------------------------------------------------------------
// HourlyRecord – one row of hour_data
// ---------------------------------------------------------------------------

/// Rentals aggregated over one hour of one day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    /// Hour of day, 0–23.
    pub hour: u8,
    pub total: u32,
    pub casual: Option<u32>,
    pub registered: Option<u32>,
}

// ---------------------------------------------------------------------------
// RentalDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Both rental tables plus the lookup data the filter widgets need.
#[derive(Debug, Clone)]
pub struct RentalDataset {
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
    /// Season labels in order of first appearance in the daily table.
    pub seasons: Vec<String>,
    /// Weather labels in order of first appearance in the daily table.
    pub weathers: Vec<String>,
    /// Earliest and latest daily date, `None` for an empty daily table.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl RentalDataset {
    /// Build label indices and date bounds from the loaded records.
    pub fn from_records(daily: Vec<DailyRecord>, hourly: Vec<HourlyRecord>) -> Self {
        let seasons = unique_in_order(daily.iter().map(|r| r.season.as_str()));
        let weathers = unique_in_order(daily.iter().map(|r| r.weather.as_str()));

        let date_bounds = daily.iter().map(|r| r.date).fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        });

        RentalDataset {
            daily,
            hourly,
            seasons,
            weathers,
            date_bounds,
        }
    }

    /// Number of daily rows.
    pub fn len(&self) -> usize {
        self.daily.len()
    }

    /// Whether the daily table is empty.
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    /// Daily rows at the given indices, in index order.
    pub fn daily_rows(&self, indices: &[usize]) -> Vec<&DailyRecord> {
        indices.iter().filter_map(|&i| self.daily.get(i)).collect()
    }

    /// Hourly rows at the given indices, in index order.
    pub fn hourly_rows(&self, indices: &[usize]) -> Vec<&HourlyRecord> {
        indices.iter().filter_map(|&i| self.hourly.get(i)).collect()
    }
}

fn unique_in_order<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut ordered = Vec::new();
    for label in labels {
        if seen.insert(label) {
            ordered.push(label.to_string());
        }
    }
    ordered
}
