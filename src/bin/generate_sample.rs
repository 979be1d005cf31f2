//! Writes a synthetic `day_data.csv` / `hour_data.csv` pair that satisfies
//! the dashboard's column layout and `cnt = casual + registered`.
//!
//! Usage: `generate_sample [OUT_DIR] [--parquet]` (default `main-data`).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use parquet::arrow::ArrowWriter;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const MONTHS: [&str; 12] = [
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
const WEATHERS: [&str; 3] = ["Clear", "Mist", "Light Rain"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct DayRow {
    date: NaiveDate,
    season: &'static str,
    weather: &'static str,
    working_day: bool,
    casual: u32,
    registered: u32,
}

struct HourRow {
    date: NaiveDate,
    hour: u32,
    casual: u32,
    registered: u32,
}

fn season_of(date: NaiveDate) -> &'static str {
    match date.month() {
        3..=5 => "Spring",
        6..=8 => "Summer",
        9..=11 => "Fall",
        _ => "Winter",
    }
}

fn season_factor(season: &str) -> f64 {
    match season {
        "Fall" => 1.15,
        "Summer" => 1.05,
        "Spring" => 0.85,
        _ => 0.55,
    }
}

/// Relative share of a day's rentals in each hour: commuter peaks at 8 and 17–18.
fn hour_weight(hour: u32, working_day: bool) -> f64 {
    let h = f64::from(hour);
    let bump = |center: f64, width: f64| (-(h - center).powi(2) / (2.0 * width * width)).exp();
    if working_day {
        0.05 + bump(8.0, 1.0) + 1.2 * bump(17.5, 1.3)
    } else {
        0.05 + 0.9 * bump(14.0, 3.0)
    }
}

fn count(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

fn generate(rng: &mut SimpleRng) -> (Vec<DayRow>, Vec<HourRow>) {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap_or_default();
    let mut days = Vec::new();
    let mut hours = Vec::new();

    for offset in 0..731 {
        let date = start + Duration::days(offset);
        let season = season_of(date);
        let working_day = !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let weather_roll = rng.next_f64();
        let weather_idx = if weather_roll < 0.63 {
            0
        } else if weather_roll < 0.93 {
            1
        } else {
            2
        };
        let weather_factor = [1.0, 0.8, 0.4][weather_idx];
        let growth = if date.year() == 2012 { 1.6 } else { 1.0 };
        let base = season_factor(season) * weather_factor * growth;

        let (casual_mean, registered_mean) = if working_day {
            (600.0, 3800.0)
        } else {
            (1500.0, 2700.0)
        };
        let casual_total = count(rng.gauss(casual_mean * base, 150.0));
        let registered_total = count(rng.gauss(registered_mean * base, 300.0));

        // Split the day across hours; rounding means hourly sums only
        // approximate the daily row, as in the real dataset.
        let weights: Vec<f64> = (0..24).map(|h| hour_weight(h, working_day)).collect();
        let weight_sum: f64 = weights.iter().sum();
        for (hour, w) in (0u32..).zip(&weights) {
            let share = w / weight_sum;
            hours.push(HourRow {
                date,
                hour,
                casual: count(f64::from(casual_total) * share),
                registered: count(f64::from(registered_total) * share),
            });
        }

        days.push(DayRow {
            date,
            season,
            weather: WEATHERS[weather_idx],
            working_day,
            casual: casual_total,
            registered: registered_total,
        });
    }

    (days, hours)
}

fn write_day_csv(path: &Path, days: &[DayRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating daily CSV")?;
    writer.write_record([
        "dteday",
        "season_label",
        "weather_label",
        "workingday",
        "weekday_name",
        "month",
        "casual",
        "registered",
        "cnt",
    ])?;
    for d in days {
        writer.write_record([
            d.date.format("%Y-%m-%d").to_string(),
            d.season.to_string(),
            d.weather.to_string(),
            u8::from(d.working_day).to_string(),
            WEEKDAYS[d.date.weekday().num_days_from_monday() as usize].to_string(),
            MONTHS[d.date.month0() as usize].to_string(),
            d.casual.to_string(),
            d.registered.to_string(),
            (d.casual + d.registered).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_hour_csv(path: &Path, hours: &[HourRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating hourly CSV")?;
    writer.write_record(["dteday", "datetime", "hr", "casual", "registered", "cnt"])?;
    for h in hours {
        let date = h.date.format("%Y-%m-%d");
        writer.write_record([
            date.to_string(),
            format!("{date} {:02}:00:00", h.hour),
            h.hour.to_string(),
            h.casual.to_string(),
            h.registered.to_string(),
            (h.casual + h.registered).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, columns: Vec<(&str, ArrayRef)>) -> Result<()> {
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn strings<T>(rows: &[T], f: impl Fn(&T) -> String) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn ints<T>(rows: &[T], f: impl Fn(&T) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn write_day_parquet(path: &Path, days: &[DayRow]) -> Result<()> {
    write_parquet(
        path,
        vec![
            ("dteday", strings(days, |d| d.date.format("%Y-%m-%d").to_string())),
            ("season_label", strings(days, |d| d.season.to_string())),
            ("weather_label", strings(days, |d| d.weather.to_string())),
            ("workingday", ints(days, |d| i64::from(d.working_day))),
            (
                "weekday_name",
                strings(days, |d| {
                    WEEKDAYS[d.date.weekday().num_days_from_monday() as usize].to_string()
                }),
            ),
            ("casual", ints(days, |d| i64::from(d.casual))),
            ("registered", ints(days, |d| i64::from(d.registered))),
            ("cnt", ints(days, |d| i64::from(d.casual + d.registered))),
        ],
    )
}

fn write_hour_parquet(path: &Path, hours: &[HourRow]) -> Result<()> {
    write_parquet(
        path,
        vec![
            ("dteday", strings(hours, |h| h.date.format("%Y-%m-%d").to_string())),
            ("hr", ints(hours, |h| i64::from(h.hour))),
            ("casual", ints(hours, |h| i64::from(h.casual))),
            ("registered", ints(hours, |h| i64::from(h.registered))),
            ("cnt", ints(hours, |h| i64::from(h.casual + h.registered))),
        ],
    )
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let parquet = args.iter().any(|a| a == "--parquet");
    let out_dir = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(String::as_str)
        .unwrap_or("main-data");
    let out_dir = Path::new(out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let (days, hours) = generate(&mut rng);

    write_day_csv(&out_dir.join("day_data.csv"), &days)?;
    write_hour_csv(&out_dir.join("hour_data.csv"), &hours)?;
    if parquet {
        write_day_parquet(&out_dir.join("day_data.parquet"), &days)?;
        write_hour_parquet(&out_dir.join("hour_data.parquet"), &hours)?;
    }

    println!(
        "Wrote {} daily and {} hourly rows to {}{}",
        days.len(),
        hours.len(),
        out_dir.display(),
        if parquet { " (csv + parquet)" } else { "" }
    );
    Ok(())
}
