/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  day_data.csv / hour_data.csv  (.parquet also accepted)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → RentalDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ RentalDataset │  Vec<DailyRecord>, Vec<HourlyRecord>, label index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + label predicates → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  grouped means, box summaries, metrics
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
