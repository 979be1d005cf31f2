use std::path::Path;

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::aggregate::{
    self, DailyPoint, GroupMean, HourlyMean, MonthlyMean, SummaryMetrics, WeekdayUsage, WorkdayBox,
};
use crate::data::filter::{
    filtered_daily_indices, filtered_hourly_indices, init_filter_state, FilterState,
};
use crate::data::loader;
use crate::data::model::RentalDataset;

// ---------------------------------------------------------------------------
// Derived view: everything the central panel draws
// ---------------------------------------------------------------------------

/// Aggregations of the current filtered rows, recomputed on every filter change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub metrics: SummaryMetrics,
    pub daily_trend: Vec<DailyPoint>,
    pub season_means: Vec<GroupMean>,
    pub weather_means: Vec<GroupMean>,
    pub weekday_usage: Vec<WeekdayUsage>,
    pub monthly_means: Vec<MonthlyMean>,
    pub hourly_means: Vec<HourlyMean>,
    pub workday_boxes: Vec<WorkdayBox>,
}

impl DashboardView {
    pub fn compute(dataset: &RentalDataset, daily_idx: &[usize], hourly_idx: &[usize]) -> Self {
        let daily = dataset.daily_rows(daily_idx);
        let hourly = dataset.hourly_rows(hourly_idx);
        Self {
            metrics: aggregate::summary_metrics(&daily),
            daily_trend: aggregate::daily_trend(&daily),
            season_means: aggregate::season_means(&daily),
            weather_means: aggregate::weather_means(&daily),
            weekday_usage: aggregate::weekday_usage(&daily),
            monthly_means: aggregate::monthly_means(&daily),
            hourly_means: aggregate::hourly_means(&hourly),
            workday_boxes: aggregate::workday_boxes(&daily),
        }
    }
}

/// Which label filter a widget edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelColumn {
    Season,
    Weather,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<RentalDataset>,

    /// Current date range and label selections.
    pub filters: FilterState,

    /// Indices of daily rows passing the current filters.
    pub visible_daily: Vec<usize>,

    /// Indices of hourly rows passing the current date range.
    pub visible_hourly: Vec<usize>,

    /// Aggregations of the visible rows.
    pub view: DashboardView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// `file://` URI of the branding image, `None` when the file is missing.
    /// Checked whenever the configuration changes rather than every frame.
    pub logo_uri: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            logo_uri: logo_uri(&config.logo_path),
            config,
            dataset: None,
            filters: FilterState::default(),
            visible_daily: Vec::new(),
            visible_hourly: Vec::new(),
            view: DashboardView::default(),
            status_message: None,
        }
    }

    /// Swap in a new configuration.  Data is not reloaded.
    pub fn set_config(&mut self, config: DashboardConfig) {
        self.config = config;
        self.refresh_logo();
    }

    /// Re-check the logo file, e.g. after it was added on disk.
    pub fn refresh_logo(&mut self) {
        self.logo_uri = logo_uri(&self.config.logo_path);
    }

    /// Load the tables named by the configuration.
    pub fn load_configured(&mut self) {
        let day = self.config.day_path.clone();
        let hour = self.config.hour_path.clone();
        self.load_from(&day, &hour);
    }

    /// Load both tables.  On failure the previous dataset is dropped and the
    /// error is kept in `status_message`.
    pub fn load_from(&mut self, day_path: &Path, hour_path: &Path) {
        match loader::load_dataset(day_path, hour_path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} daily and {} hourly rows ({} seasons, {} weather labels)",
                    dataset.daily.len(),
                    dataset.hourly.len(),
                    dataset.seasons.len(),
                    dataset.weathers.len()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                self.dataset = None;
                self.visible_daily.clear();
                self.visible_hourly.clear();
                self.view = DashboardView::default();
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and select everything.
    pub fn set_dataset(&mut self, dataset: RentalDataset) {
        self.filters = init_filter_state(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute visible rows and aggregations after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_daily = filtered_daily_indices(ds, &self.filters);
            self.visible_hourly = filtered_hourly_indices(ds, &self.filters);
            self.view = DashboardView::compute(ds, &self.visible_daily, &self.visible_hourly);
            log::debug!(
                "Filter {}..={} kept {} daily / {} hourly rows",
                self.filters.start,
                self.filters.end,
                self.visible_daily.len(),
                self.visible_hourly.len()
            );
        }
    }

    /// Set the date range, clamped to the dataset's bounds.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let (start, end) = match self.dataset.as_ref().and_then(|ds| ds.date_bounds) {
            Some((lo, hi)) => (start.clamp(lo, hi), end.clamp(lo, hi)),
            None => (start, end),
        };
        if (start, end) != (self.filters.start, self.filters.end) {
            self.filters.start = start;
            self.filters.end = end;
            self.refilter();
        }
    }

    fn labels_mut(&mut self, column: LabelColumn) -> &mut std::collections::BTreeSet<String> {
        match column {
            LabelColumn::Season => &mut self.filters.seasons,
            LabelColumn::Weather => &mut self.filters.weathers,
        }
    }

    /// Every label of a column present in the dataset, in display order.
    pub fn all_labels(&self, column: LabelColumn) -> Vec<String> {
        match (&self.dataset, column) {
            (Some(ds), LabelColumn::Season) => ds.seasons.clone(),
            (Some(ds), LabelColumn::Weather) => ds.weathers.clone(),
            (None, _) => Vec::new(),
        }
    }

    pub fn is_selected(&self, column: LabelColumn, label: &str) -> bool {
        match column {
            LabelColumn::Season => self.filters.seasons.contains(label),
            LabelColumn::Weather => self.filters.weathers.contains(label),
        }
    }

    /// Toggle a single label in a column's filter.
    pub fn toggle_label(&mut self, column: LabelColumn, label: &str) {
        let selected = self.labels_mut(column);
        if !selected.remove(label) {
            selected.insert(label.to_string());
        }
        self.refilter();
    }

    /// Select all labels in a column.
    pub fn select_all(&mut self, column: LabelColumn) {
        let all = self.all_labels(column);
        *self.labels_mut(column) = all.into_iter().collect();
        self.refilter();
    }

    /// Deselect all labels in a column.
    pub fn select_none(&mut self, column: LabelColumn) {
        self.labels_mut(column).clear();
        self.refilter();
    }
}

fn logo_uri(path: &Path) -> Option<String> {
    if path.is_file() {
        Some(format!("file://{}", path.display()))
    } else {
        log::warn!("Logo not found at {}", path.display());
        None
    }
}
