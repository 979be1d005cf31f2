use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::LoadError;
use super::model::{month_name, DailyRecord, HourlyRecord, RentalDataset, MONTH_ORDER};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the daily and hourly tables and build a [`RentalDataset`].
///
/// Either table failing to load fails the whole dataset.
pub fn load_dataset(day_path: &Path, hour_path: &Path) -> Result<RentalDataset> {
    let daily = load_daily(day_path)
        .with_context(|| format!("loading daily table {}", day_path.display()))?;
    let hourly = load_hourly(hour_path)
        .with_context(|| format!("loading hourly table {}", hour_path.display()))?;
    Ok(RentalDataset::from_records(daily, hourly))
}

/// Load the daily table (`day_data`).
///
/// Required columns: `dteday`, `season_label`, `weather_label`, `workingday`,
/// `weekday_name`, `casual`, `registered`, `cnt`.  `month` is derived from
/// `dteday` when the column is absent or a cell is empty.
pub fn load_daily(path: &Path) -> Result<Vec<DailyRecord>, LoadError> {
    let table = read_table(path)?;
    parse_daily(&table)
}

/// Load the hourly table (`hour_data`).
///
/// Required columns: `dteday`, `hr`, `cnt`.  `casual` and `registered` are
/// optional.
pub fn load_hourly(path: &Path) -> Result<Vec<HourlyRecord>, LoadError> {
    let table = read_table(path)?;
    parse_hourly(&table)
}

// ---------------------------------------------------------------------------
// Raw table: header + string cells, shared by every file format
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct RawTable {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    fn column(&self, name: &str) -> Result<usize, LoadError> {
        self.optional_column(name)
            .ok_or_else(|| LoadError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn invalid(&self, row: usize, col: usize, value: &str) -> LoadError {
        LoadError::InvalidValue {
            path: self.path.clone(),
            row,
            column: self.headers[col].clone(),
            value: value.to_string(),
        }
    }
}

fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(|s| s.trim()).unwrap_or("")
}

/// Read a file into a [`RawTable`].  Dispatch by extension.
fn read_table(path: &Path) -> Result<RawTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path),
        "parquet" | "pq" => read_parquet(path),
        other => Err(LoadError::UnsupportedFormat {
            extension: other.to_string(),
            path: path.to_path_buf(),
        }),
    }
}

fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Parquet columns of any scalar type are cast to UTF-8 so that both formats
/// share one row parser.  Nulls become empty cells.
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let arrow_err = |source| LoadError::Arrow {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(arrow_err)?;

        let mut columns = Vec::with_capacity(batch.num_columns());
        for col in batch.columns() {
            columns.push(cast(col.as_ref(), &DataType::Utf8).map_err(arrow_err)?);
        }

        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        String::new()
                    } else {
                        col.as_string::<i32>().value(row).to_string()
                    }
                })
                .collect();
            rows.push(cells);
        }
    }

    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Row parsers
// ---------------------------------------------------------------------------

fn parse_daily(table: &RawTable) -> Result<Vec<DailyRecord>, LoadError> {
    let date_idx = table.column("dteday")?;
    let season_idx = table.column("season_label")?;
    let weather_idx = table.column("weather_label")?;
    let working_idx = table.column("workingday")?;
    let weekday_idx = table.column("weekday_name")?;
    let casual_idx = table.column("casual")?;
    let registered_idx = table.column("registered")?;
    let total_idx = table.column("cnt")?;
    let month_idx = table.optional_column("month");

    let mut records = Vec::with_capacity(table.rows.len());

    for (i, cells) in table.rows.iter().enumerate() {
        let row = i + 1;
        let field = |idx: usize| cell(cells, idx);

        let date = parse_date(field(date_idx))
            .ok_or_else(|| table.invalid(row, date_idx, field(date_idx)))?;
        let working_day = parse_flag(field(working_idx))
            .ok_or_else(|| table.invalid(row, working_idx, field(working_idx)))?;
        let casual = parse_count(field(casual_idx))
            .ok_or_else(|| table.invalid(row, casual_idx, field(casual_idx)))?;
        let registered = parse_count(field(registered_idx))
            .ok_or_else(|| table.invalid(row, registered_idx, field(registered_idx)))?;
        let total = parse_count(field(total_idx))
            .ok_or_else(|| table.invalid(row, total_idx, field(total_idx)))?;

        check_counts(table, row, total, casual, registered)?;

        let month = match month_idx.map(field) {
            Some(m) if !m.is_empty() => normalize_month(m),
            _ => month_name(date).to_string(),
        };

        records.push(DailyRecord {
            date,
            season: field(season_idx).to_string(),
            weather: field(weather_idx).to_string(),
            working_day,
            weekday: field(weekday_idx).to_string(),
            month,
            total,
            casual,
            registered,
        });
    }

    Ok(records)
}

fn parse_hourly(table: &RawTable) -> Result<Vec<HourlyRecord>, LoadError> {
    let date_idx = table.column("dteday")?;
    let hour_idx = table.column("hr")?;
    let total_idx = table.column("cnt")?;
    let casual_idx = table.optional_column("casual");
    let registered_idx = table.optional_column("registered");

    let mut records = Vec::with_capacity(table.rows.len());

    for (i, cells) in table.rows.iter().enumerate() {
        let row = i + 1;
        let field = |idx: usize| cell(cells, idx);

        let date = parse_date(field(date_idx))
            .ok_or_else(|| table.invalid(row, date_idx, field(date_idx)))?;
        let hour = field(hour_idx)
            .parse::<u8>()
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| table.invalid(row, hour_idx, field(hour_idx)))?;
        let total = parse_count(field(total_idx))
            .ok_or_else(|| table.invalid(row, total_idx, field(total_idx)))?;

        let optional_count = |idx: Option<usize>| -> Result<Option<u32>, LoadError> {
            match idx {
                Some(idx) if !field(idx).is_empty() => parse_count(field(idx))
                    .map(Some)
                    .ok_or_else(|| table.invalid(row, idx, field(idx))),
                _ => Ok(None),
            }
        };
        let casual = optional_count(casual_idx)?;
        let registered = optional_count(registered_idx)?;

        if let (Some(c), Some(r)) = (casual, registered) {
            check_counts(table, row, total, c, r)?;
        }

        records.push(HourlyRecord {
            date,
            hour,
            total,
            casual,
            registered,
        });
    }

    Ok(records)
}

fn check_counts(
    table: &RawTable,
    row: usize,
    total: u32,
    casual: u32,
    registered: u32,
) -> Result<(), LoadError> {
    if casual.checked_add(registered) != Some(total) {
        return Err(LoadError::InconsistentCounts {
            path: table.path.clone(),
            row,
            total,
            casual,
            registered,
        });
    }
    Ok(())
}

// -- Cell helpers --

/// Accepts `YYYY-MM-DD` and datetime forms, truncated to the date.  Offset
/// timestamps (`Z`, `+01:00`) keep the calendar date as written.
fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    let naive = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok());
    if let Some(dt) = naive {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z"))
        .ok()
        .map(|dt| dt.date_naive())
}

fn parse_flag(s: &str) -> Option<bool> {
    match s {
        "1" | "true" | "True" | "TRUE" => Some(true),
        "0" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Non-negative integer count.  Whole floats such as `"12.0"` are accepted
/// since Parquet files written from float columns cast that way.
fn parse_count(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

/// Month cells may hold a name or a 1-based month number.
fn normalize_month(s: &str) -> String {
    match s.parse::<usize>() {
        Ok(n) if (1..=12).contains(&n) => MONTH_ORDER[n - 1].to_string(),
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    const DAY_HEADER: &str =
        "dteday,season_label,weather_label,workingday,weekday_name,casual,registered,cnt";

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("bike_dashboard_{name}"));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_daily_derives_month() {
        let path = temp_file(
            "daily_ok.csv",
            &format!(
                "{DAY_HEADER}\n\
                 2011-01-01,Spring,Clear,0,Saturday,331,654,985\n\
                 2011-02-01 00:00:00,Spring,Mist,1,Tuesday,100,900,1000\n"
            ),
        );

        let records = load_daily(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, "January");
        assert_eq!(records[1].month, "February");
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2011, 2, 1).unwrap());
        assert!(!records[0].working_day);
        assert!(records[1].working_day);
        for r in &records {
            assert_eq!(r.total, r.casual + r.registered);
        }

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_daily_keeps_month_column() {
        let path = temp_file(
            "daily_month.csv",
            &format!(
                "{DAY_HEADER},month\n\
                 2011-01-01,Spring,Clear,0,Saturday,1,2,3,March\n\
                 2011-01-02,Spring,Clear,0,Sunday,1,2,3,7\n"
            ),
        );

        let records = load_daily(&path).unwrap();
        assert_eq!(records[0].month, "March");
        assert_eq!(records[1].month, "July");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_column_is_named() {
        let path = temp_file(
            "daily_missing.csv",
            "dteday,season_label,weather_label,workingday,weekday_name,casual,cnt\n\
             2011-01-01,Spring,Clear,0,Saturday,1,3\n",
        );

        match load_daily(&path) {
            Err(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "registered"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_inconsistent_counts_rejected() {
        let path = temp_file(
            "daily_bad_counts.csv",
            &format!(
                "{DAY_HEADER}\n\
                 2011-01-01,Spring,Clear,0,Saturday,1,2,3\n\
                 2011-01-02,Spring,Clear,0,Sunday,1,2,4\n"
            ),
        );

        match load_daily(&path) {
            Err(LoadError::InconsistentCounts { row, total, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(total, 4);
            }
            other => panic!("expected InconsistentCounts, got {other:?}"),
        }

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_date_reports_row_and_column() {
        let path = temp_file(
            "daily_bad_date.csv",
            &format!("{DAY_HEADER}\nnot-a-date,Spring,Clear,0,Saturday,1,2,3\n"),
        );

        match load_daily(&path) {
            Err(LoadError::InvalidValue { row, column, value, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "dteday");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_hourly_rejects_hour_out_of_range() {
        let path = temp_file(
            "hourly_bad_hour.csv",
            "dteday,hr,cnt\n2011-01-01,0,16\n2011-01-01,24,5\n",
        );

        match load_hourly(&path) {
            Err(LoadError::InvalidValue { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "hr");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_hourly_optional_user_counts() {
        let path = temp_file(
            "hourly_ok.csv",
            "dteday,hr,casual,registered,cnt\n2011-01-01,0,3,13,16\n2011-01-01,1,,,40\n",
        );

        let records = load_hourly(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].casual, Some(3));
        assert_eq!(records[0].registered, Some(13));
        assert_eq!(records[1].casual, None);
        assert_eq!(records[1].total, 40);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_and_unsupported_extension() {
        let missing = env::temp_dir().join("bike_dashboard_does_not_exist.csv");
        assert!(matches!(
            load_daily(&missing),
            Err(LoadError::NotFound { .. })
        ));

        let path = temp_file("daily.txt", "whatever");
        assert!(matches!(
            load_daily(&path),
            Err(LoadError::UnsupportedFormat { .. })
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_dataset_fails_when_either_table_fails() {
        let day = temp_file(
            "dataset_day.csv",
            &format!("{DAY_HEADER}\n2011-01-01,Spring,Clear,0,Saturday,1,2,3\n"),
        );
        let missing_hour = env::temp_dir().join("bike_dashboard_no_hour.csv");

        let err = load_dataset(&day, &missing_hour).unwrap_err();
        assert!(format!("{err:#}").contains("hourly table"));

        fs::remove_file(&day).unwrap();
    }

    #[test]
    fn test_load_hourly_parquet() {
        let path = env::temp_dir().join("bike_dashboard_hourly.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", DataType::Utf8, false),
            Field::new("hr", DataType::Int64, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2011-01-01", "2011-01-01"])),
                Arc::new(Int64Array::from(vec![0, 1])),
                Arc::new(Int64Array::from(vec![16, 40])),
            ],
        )
        .unwrap();

        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let records = load_hourly(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].hour, 1);
        assert_eq!(records[1].total, 40);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_hourly_inconsistent_counts_rejected() {
        let path = temp_file(
            "hourly_bad_counts.csv",
            "dteday,hr,casual,registered,cnt\n2011-01-01,0,3,13,99\n",
        );

        match load_hourly(&path) {
            Err(LoadError::InconsistentCounts {
                row,
                total,
                casual,
                registered,
                ..
            }) => {
                assert_eq!(row, 1);
                assert_eq!(total, 99);
                assert_eq!(casual, 3);
                assert_eq!(registered, 13);
            }
            other => panic!("expected InconsistentCounts, got {other:?}"),
        }

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_daily_parquet_with_date32_column() {
        let path = env::temp_dir().join("bike_dashboard_daily_date32.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", DataType::Date32, false),
            Field::new("season_label", DataType::Utf8, false),
            Field::new("weather_label", DataType::Utf8, false),
            Field::new("workingday", DataType::Int64, false),
            Field::new("weekday_name", DataType::Utf8, false),
            Field::new("casual", DataType::Int64, false),
            Field::new("registered", DataType::Int64, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        // Days since 1970-01-01: 2011-01-01 and 2011-03-01.
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![14975, 15034])),
                Arc::new(StringArray::from(vec!["Winter", "Spring"])),
                Arc::new(StringArray::from(vec!["Clear", "Mist"])),
                Arc::new(Int64Array::from(vec![0, 1])),
                Arc::new(StringArray::from(vec!["Saturday", "Tuesday"])),
                Arc::new(Int64Array::from(vec![331, 100])),
                Arc::new(Int64Array::from(vec![654, 900])),
                Arc::new(Int64Array::from(vec![985, 1000])),
            ],
        )
        .unwrap();

        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let records = load_daily(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2011, 3, 1).unwrap());
        assert_eq!(records[1].month, "March");
        assert!(records[1].working_day);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_parse_date_accepts_offset_timestamps() {
        let jan_first = NaiveDate::from_ymd_opt(2011, 1, 1);
        assert_eq!(parse_date("2011-01-01T00:00:00Z"), jan_first);
        assert_eq!(parse_date("2011-01-01T00:00:00+00:00"), jan_first);
        assert_eq!(parse_date("2011-01-01T23:30:00-05:00"), jan_first);
        assert_eq!(parse_date("2011-01-01 08:00:00+01:00"), jan_first);
        assert_eq!(parse_date("2011-01-01T08:00:00.250Z"), jan_first);
        assert_eq!(parse_date("01/01/2011"), None);
    }

    #[test]
    fn test_parse_count_accepts_whole_floats() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count(""), None);
    }
}
