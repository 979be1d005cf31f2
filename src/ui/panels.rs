use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::config::{DAY_FILE, HOUR_FILE};
use crate::state::{AppState, LabelColumn};
use crate::ui::{metrics, plot, theme};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    logo(ui, state);
    ui.add_space(4.0);

    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            date_range(ui, state);
            ui.separator();

            label_filter(ui, state, LabelColumn::Season, "Select Seasons");
            label_filter(ui, state, LabelColumn::Weather, "Select Weather Conditions");

            ui.separator();
            ui.strong("About");
            ui.label("Data: Bike Sharing Dataset");
            ui.label("Daily and hourly rental counts, 2011–2012");
        });
}

/// Branding image.  A missing file degrades to a text title.
fn logo(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| match &state.logo_uri {
        Some(uri) => {
            ui.add(
                egui::Image::new(uri.as_str())
                    .max_width(150.0)
                    .max_height(120.0),
            );
        }
        None => {
            ui.label(RichText::new("🚲 Bike Sharing").size(20.0).strong());
        }
    });
}

fn date_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Date Range");

    let mut start = state.filters.start;
    let mut end = state.filters.end;
    let mut changed = false;

    egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("From");
        changed |= ui
            .add(DatePickerButton::new(&mut start).id_salt("start_date"))
            .changed();
        ui.end_row();

        ui.label("To");
        changed |= ui
            .add(DatePickerButton::new(&mut end).id_salt("end_date"))
            .changed();
        ui.end_row();
    });

    if changed {
        state.set_date_range(start, end);
    }
    if state.filters.start > state.filters.end {
        ui.label(RichText::new("Start date is after end date").color(Color32::YELLOW));
    }
}

/// Multi-select for one label column, with All / None shortcuts.
fn label_filter(ui: &mut Ui, state: &mut AppState, column: LabelColumn, title: &str) {
    let labels = state.all_labels(column);
    let n_selected = labels
        .iter()
        .filter(|l| state.is_selected(column, l))
        .count();
    let header_text = format!("{title}  ({n_selected}/{})", labels.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for label in &labels {
                let mut checked = state.is_selected(column, label);
                if ui.checkbox(&mut checked, label.as_str()).changed() {
                    state.toggle_label(column, label);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – metrics, charts, insights
// ---------------------------------------------------------------------------

const INSIGHTS: [&str; 5] = [
    "Peak hours occur around 8 AM and 5–6 PM, aligning with commuting hours.",
    "Registered users dominate weekday rentals, suggesting commuter usage.",
    "Casual users are more active on weekends, indicating recreational use.",
    "Fall shows the highest rental activity, followed by Summer.",
    "Clear weather significantly increases rentals compared to rainy conditions.",
];

/// Render the dashboard page.  Without a dataset only the load error is shown.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            let msg = state
                .status_message
                .as_deref()
                .unwrap_or("No data loaded  (File → Open data folder…)");
            ui.heading(RichText::new(msg).color(Color32::LIGHT_RED));
        });
        return;
    }

    let view = &state.view;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("🚲 Bike Sharing Dashboard").size(28.0));
            ui.label(
                RichText::new(concat!(
                    "Analysis of bike sharing patterns based on seasonality, ",
                    "user types, and time factors.",
                ))
                .color(Color32::LIGHT_BLUE),
            );
            ui.add_space(8.0);

            metrics::metrics_row(ui, &view.metrics);
            ui.add_space(8.0);

            theme::chart_card(ui, "Daily Rental Trends", |ui| {
                plot::daily_trend_chart(ui, &view.daily_trend)
            });
            theme::chart_card(ui, "Impact of Season and Weather on Rentals", |ui| {
                plot::season_weather_chart(ui, &view.season_means, &view.weather_means)
            });
            theme::chart_card(ui, "Casual vs Registered Rentals by Day of Week", |ui| {
                plot::weekday_usage_chart(ui, &view.weekday_usage)
            });
            theme::chart_card(ui, "Mean Rentals per Month", |ui| {
                plot::monthly_chart(ui, &view.monthly_means)
            });
            theme::chart_card(ui, "Rentals by Hour of Day", |ui| {
                plot::hourly_chart(ui, &view.hourly_means)
            });
            theme::chart_card(ui, "Working Days vs Weekends/Holidays", |ui| {
                plot::workday_chart(ui, &view.workday_boxes)
            });

            ui.add_space(8.0);
            ui.heading("Key Insights");
            egui::CollapsingHeader::new("📌 Usage Patterns")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for line in INSIGHTS {
                        ui.label(format!("• {line}"));
                    }
                });

            ui.separator();
            ui.label(
                RichText::new("Bike Sharing Dashboard | Built with egui")
                    .small()
                    .weak(),
            );
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.refresh_logo();
                state.load_configured();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} of {} days shown",
                state.visible_daily.len(),
                ds.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

/// Pick a directory holding `day_data.csv` and `hour_data.csv` and load it.
pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open bike sharing data folder")
        .pick_folder();

    if let Some(dir) = folder {
        state.set_config(state.config.clone().with_data_dir(&dir));
        log::info!("Loading {DAY_FILE} and {HOUR_FILE} from {}", dir.display());
        state.load_configured();
    }
}
