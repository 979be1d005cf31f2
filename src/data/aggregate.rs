use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{DailyRecord, HourlyRecord, MONTH_ORDER, WEEKDAY_ORDER};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One point of the raw daily series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total: u32,
}

/// Mean total rentals for one categorical group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub label: String,
    pub mean: f64,
    /// Number of rows in the group.
    pub count: usize,
    /// Set on exactly one group: the first (in label order) with the highest mean.
    pub is_max: bool,
}

/// Mean casual and registered rentals on one weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayUsage {
    pub weekday: &'static str,
    pub casual: f64,
    pub registered: f64,
}

/// Mean total rentals in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyMean {
    pub month: &'static str,
    pub mean: f64,
}

/// Mean total rentals at one hour of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyMean {
    pub hour: u8,
    pub mean: f64,
}

/// Box-plot statistics.  `min`/`max` are the whisker ends: the most extreme
/// values within 1.5 × IQR of the box.  Values beyond them are `outliers`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub outliers: Vec<f64>,
}

/// Distribution of daily totals for one value of the working-day flag.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkdayBox {
    pub working_day: bool,
    pub summary: BoxSummary,
}

/// Headline numbers over the filtered daily set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryMetrics {
    pub total: u64,
    /// `None` when no rows are selected.
    pub mean: Option<f64>,
    pub max: Option<u32>,
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// Raw `(date, total)` series sorted by date.
pub fn daily_trend(rows: &[&DailyRecord]) -> Vec<DailyPoint> {
    let mut points: Vec<DailyPoint> = rows
        .iter()
        .map(|r| DailyPoint {
            date: r.date,
            total: r.total,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Mean total per season label, max group flagged.
pub fn season_means(rows: &[&DailyRecord]) -> Vec<GroupMean> {
    group_means(rows, |r| r.season.as_str())
}

/// Mean total per weather label, max group flagged.
pub fn weather_means(rows: &[&DailyRecord]) -> Vec<GroupMean> {
    group_means(rows, |r| r.weather.as_str())
}

/// Group rows by `key`, average the totals and flag the maximum.
///
/// Groups come back in label order.  Ties on the maximum go to the first
/// label.
pub fn group_means<'a, F>(rows: &[&'a DailyRecord], key: F) -> Vec<GroupMean>
where
    F: Fn(&'a DailyRecord) -> &'a str,
{
    let mut sums: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for &r in rows {
        let entry = sums.entry(key(r)).or_default();
        entry.0 += u64::from(r.total);
        entry.1 += 1;
    }

    let mut groups: Vec<GroupMean> = sums
        .into_iter()
        .map(|(label, (sum, count))| GroupMean {
            label: label.to_string(),
            mean: sum as f64 / count as f64,
            count,
            is_max: false,
        })
        .collect();

    let max_mean = groups
        .iter()
        .map(|g| g.mean)
        .fold(f64::NEG_INFINITY, f64::max);
    if let Some(top) = groups.iter_mut().find(|g| g.mean == max_mean) {
        top.is_max = true;
    }
    groups
}

/// Mean casual and registered rentals per weekday, Monday first.
/// Weekdays without rows are omitted; unrecognised names are ignored.
pub fn weekday_usage(rows: &[&DailyRecord]) -> Vec<WeekdayUsage> {
    let mut acc = [(0u64, 0u64, 0usize); 7];
    for r in rows {
        if let Some(pos) = WEEKDAY_ORDER.iter().position(|w| *w == r.weekday) {
            acc[pos].0 += u64::from(r.casual);
            acc[pos].1 += u64::from(r.registered);
            acc[pos].2 += 1;
        }
    }

    WEEKDAY_ORDER
        .iter()
        .zip(acc)
        .filter(|(_, (_, _, n))| *n > 0)
        .map(|(&weekday, (casual, registered, n))| WeekdayUsage {
            weekday,
            casual: casual as f64 / n as f64,
            registered: registered as f64 / n as f64,
        })
        .collect()
}

/// Mean total per month in calendar order.  Months without rows are omitted.
pub fn monthly_means(rows: &[&DailyRecord]) -> Vec<MonthlyMean> {
    let mut acc = [(0u64, 0usize); 12];
    for r in rows {
        if let Some(pos) = MONTH_ORDER.iter().position(|m| *m == r.month) {
            acc[pos].0 += u64::from(r.total);
            acc[pos].1 += 1;
        }
    }

    MONTH_ORDER
        .iter()
        .zip(acc)
        .filter(|(_, (_, n))| *n > 0)
        .map(|(&month, (sum, n))| MonthlyMean {
            month,
            mean: sum as f64 / n as f64,
        })
        .collect()
}

/// Mean total per hour of day, ascending.  Hours without rows are omitted.
pub fn hourly_means(rows: &[&HourlyRecord]) -> Vec<HourlyMean> {
    let mut acc = [(0u64, 0usize); 24];
    for r in rows {
        if let Some(slot) = acc.get_mut(usize::from(r.hour)) {
            slot.0 += u64::from(r.total);
            slot.1 += 1;
        }
    }

    acc.iter()
        .enumerate()
        .filter(|(_, (_, n))| *n > 0)
        .map(|(hour, &(sum, n))| HourlyMean {
            hour: hour as u8,
            mean: sum as f64 / n as f64,
        })
        .collect()
}

/// Box summaries of daily totals split by working-day flag, non-working
/// days first.  Empty groups are omitted.
pub fn workday_boxes(rows: &[&DailyRecord]) -> Vec<WorkdayBox> {
    [false, true]
        .into_iter()
        .filter_map(|working_day| {
            let values: Vec<f64> = rows
                .iter()
                .filter(|r| r.working_day == working_day)
                .map(|r| f64::from(r.total))
                .collect();
            box_summary(&values).map(|summary| WorkdayBox {
                working_day,
                summary,
            })
        })
        .collect()
}

/// Quartiles by linear interpolation between closest ranks, Tukey whiskers.
/// Returns `None` for an empty sample.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    // The box always lies inside the fences, so min/max are always assigned.
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut outliers = Vec::new();
    for &v in &sorted {
        if low_fence <= v && v <= high_fence {
            min = min.min(v);
            max = max.max(v);
        } else {
            outliers.push(v);
        }
    }

    Some(BoxSummary {
        min,
        q1,
        median,
        q3,
        max,
        outliers,
    })
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Sum, mean and max of daily totals.
pub fn summary_metrics(rows: &[&DailyRecord]) -> SummaryMetrics {
    let total: u64 = rows.iter().map(|r| u64::from(r.total)).sum();
    let mean = (!rows.is_empty()).then(|| total as f64 / rows.len() as f64);
    let max = rows.iter().map(|r| r.total).max();
    SummaryMetrics { total, mean, max }
}
