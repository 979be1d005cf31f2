use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::RentalDataset;

// ---------------------------------------------------------------------------
// Filter predicate: date range plus selected labels
// ---------------------------------------------------------------------------

/// Current user selection.  Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub seasons: BTreeSet<String>,
    pub weathers: BTreeSet<String>,
}

/// Initialise a [`FilterState`] covering the whole dataset (i.e., show everything).
///
/// An empty dataset gets a degenerate range at the Unix epoch.
pub fn init_filter_state(dataset: &RentalDataset) -> FilterState {
    let (start, end) = dataset
        .date_bounds
        .unwrap_or((NaiveDate::default(), NaiveDate::default()));
    FilterState {
        start,
        end,
        seasons: dataset.seasons.iter().cloned().collect(),
        weathers: dataset.weathers.iter().cloned().collect(),
    }
}

impl FilterState {
    fn date_in_range(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Return indices of daily rows passing the date, season and weather predicates.
///
/// An empty season or weather set selects nothing.
pub fn filtered_daily_indices(dataset: &RentalDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .daily
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            filters.date_in_range(r.date)
                && filters.seasons.contains(&r.season)
                && filters.weathers.contains(&r.weather)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of hourly rows inside the date range.  Hourly rows carry no
/// season or weather label, so only the date predicate applies.
pub fn filtered_hourly_indices(dataset: &RentalDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .hourly
        .iter()
        .enumerate()
        .filter(|(_, r)| filters.date_in_range(r.date))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::model::{month_name, DailyRecord, HourlyRecord};

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub(crate) fn daily(
        d: &str,
        season: &str,
        weather: &str,
        working_day: bool,
        weekday: &str,
        casual: u32,
        registered: u32,
    ) -> DailyRecord {
        let date = date(d);
        DailyRecord {
            date,
            season: season.to_string(),
            weather: weather.to_string(),
            working_day,
            weekday: weekday.to_string(),
            month: month_name(date).to_string(),
            total: casual + registered,
            casual,
            registered,
        }
    }

    fn hourly(d: &str, hour: u8, total: u32, users: Option<(u32, u32)>) -> HourlyRecord {
        HourlyRecord {
            date: date(d),
            hour,
            total,
            casual: users.map(|(c, _)| c),
            registered: users.map(|(_, r)| r),
        }
    }

    /// Eight days across two seasons and three weather labels.
    pub(crate) fn fixture() -> RentalDataset {
        let daily = vec![
            daily("2011-01-01", "Spring", "Clear", false, "Saturday", 30, 70),
            daily("2011-01-02", "Spring", "Mist", false, "Sunday", 20, 80),
            daily("2011-01-03", "Spring", "Clear", true, "Monday", 10, 190),
            daily("2011-01-04", "Spring", "Light Rain", true, "Tuesday", 5, 95),
            daily("2011-06-01", "Summer", "Clear", true, "Wednesday", 100, 400),
            daily("2011-06-02", "Summer", "Mist", true, "Thursday", 80, 320),
            daily("2011-06-03", "Summer", "Clear", true, "Friday", 90, 510),
            daily("2011-06-04", "Summer", "Light Rain", false, "Saturday", 40, 60),
        ];
        let hourly = vec![
            hourly("2011-01-01", 0, 16, Some((3, 13))),
            hourly("2011-01-01", 8, 40, Some((5, 35))),
            hourly("2011-01-03", 8, 60, None),
            hourly("2011-06-01", 17, 90, None),
        ];
        RentalDataset::from_records(daily, hourly)
    }

    fn labels(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_selection_returns_every_row() {
        let ds = fixture();
        let filters = init_filter_state(&ds);

        let idx = filtered_daily_indices(&ds, &filters);
        let rows = ds.daily_rows(&idx);
        assert_eq!(rows.len(), ds.daily.len());
        for (kept, original) in rows.iter().zip(&ds.daily) {
            assert_eq!(*kept, original);
        }
        assert_eq!(filtered_hourly_indices(&ds, &filters).len(), ds.hourly.len());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let ds = fixture();
        let mut filters = init_filter_state(&ds);
        filters.start = date("2011-01-02");
        filters.end = date("2011-06-01");

        let idx = filtered_daily_indices(&ds, &filters);
        assert_eq!(idx, vec![1, 2, 3, 4]);

        let hourly = filtered_hourly_indices(&ds, &filters);
        assert_eq!(hourly, vec![2, 3]);
    }

    #[test]
    fn test_conjunction_of_predicates() {
        let ds = fixture();
        let mut filters = init_filter_state(&ds);
        filters.end = date("2011-06-02");
        filters.seasons = labels(&["Summer"]);
        filters.weathers = labels(&["Clear", "Mist"]);

        let idx = filtered_daily_indices(&ds, &filters);
        assert_eq!(idx, vec![4, 5]);
        for r in ds.daily_rows(&idx) {
            assert_eq!(r.season, "Summer");
            assert!(r.date <= filters.end);
            assert_eq!(r.total, r.casual + r.registered);
        }
    }

    #[test]
    fn test_empty_label_selection_yields_nothing() {
        let ds = fixture();

        let mut filters = init_filter_state(&ds);
        filters.seasons.clear();
        assert!(filtered_daily_indices(&ds, &filters).is_empty());

        let mut filters = init_filter_state(&ds);
        filters.weathers.clear();
        assert!(filtered_daily_indices(&ds, &filters).is_empty());
        // hourly rows only follow the date range
        assert_eq!(filtered_hourly_indices(&ds, &filters).len(), ds.hourly.len());
    }

    #[test]
    fn test_reversed_range_yields_nothing() {
        let ds = fixture();
        let mut filters = init_filter_state(&ds);
        filters.start = date("2011-06-04");
        filters.end = date("2011-01-01");

        assert!(filtered_daily_indices(&ds, &filters).is_empty());
        assert!(filtered_hourly_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn test_filter_leaves_source_untouched() {
        let ds = fixture();
        let before = ds.daily.clone();
        let mut filters = init_filter_state(&ds);
        filters.seasons = labels(&["Spring"]);

        let _ = filtered_daily_indices(&ds, &filters);
        assert_eq!(ds.daily, before);
    }
}
