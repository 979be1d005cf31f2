use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line,
    MarkerShape, Plot, PlotPoints, Points,
};

use crate::color;
use crate::data::aggregate::{
    DailyPoint, GroupMean, HourlyMean, MonthlyMean, WeekdayUsage, WorkdayBox,
};
use crate::ui::theme::{self, CHART_HEIGHT};

// ---------------------------------------------------------------------------
// Shared plot setup
// ---------------------------------------------------------------------------

/// A static plot: charts are read-only, so drag/zoom are off.
fn base_plot(id: &str, x_label: &str, y_label: &str) -> Plot<'static> {
    Plot::new(id.to_string())
        .height(CHART_HEIGHT)
        .x_axis_label(x_label.to_string())
        .y_axis_label(y_label.to_string())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

/// Label integer grid marks with `labels[i]`; other marks stay blank.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

/// Categorical axes get one grid line per category.
fn unit_spacer() -> Box<dyn Fn(egui_plot::GridInput) -> Vec<egui_plot::GridMark>> {
    uniform_grid_spacer(|_| [10.0, 5.0, 1.0])
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

// ---------------------------------------------------------------------------
// 1. Daily trend
// ---------------------------------------------------------------------------

/// Raw daily totals as a line with point markers.
pub fn daily_trend_chart(ui: &mut Ui, points: &[DailyPoint]) {
    if points.is_empty() {
        theme::empty_chart(ui);
        return;
    }

    let series: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [day_number(p.date), f64::from(p.total)])
        .collect();

    base_plot("daily_trend", "Date", "Number of Rentals")
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .color(color::DAILY_LINE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series))
                    .color(color::DAILY_LINE)
                    .shape(MarkerShape::Circle)
                    .radius(2.5),
            );
        });
}

// ---------------------------------------------------------------------------
// 2. Season / weather impact
// ---------------------------------------------------------------------------

/// Side-by-side mean bars per season and per weather label.
pub fn season_weather_chart(ui: &mut Ui, seasons: &[GroupMean], weathers: &[GroupMean]) {
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Mean rentals per season");
        highlighted_bars(
            &mut cols[0],
            "season_means",
            "Season",
            seasons,
            color::SEASON_HIGHLIGHT,
        );
        cols[1].strong("Mean rentals per weather condition");
        highlighted_bars(
            &mut cols[1],
            "weather_means",
            "Weather",
            weathers,
            color::WEATHER_HIGHLIGHT,
        );
    });
}

fn highlighted_bars(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    groups: &[GroupMean],
    highlight: Color32,
) {
    if groups.is_empty() {
        theme::empty_chart(ui);
        return;
    }

    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let fill = if g.is_max { highlight } else { color::MUTED_BAR };
            Bar::new(i as f64, g.mean)
                .width(0.6)
                .fill(fill)
                .name(format!("{} ({} days)", g.label, g.count))
        })
        .collect();
    let labels = groups.iter().map(|g| g.label.clone()).collect();

    base_plot(id, x_label, "Mean Rentals")
        .x_axis_formatter(category_formatter(labels))
        .x_grid_spacer(unit_spacer())
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// 3. Weekly user pattern
// ---------------------------------------------------------------------------

/// Casual vs registered mean rentals across the week.
pub fn weekday_usage_chart(ui: &mut Ui, usage: &[WeekdayUsage]) {
    if usage.is_empty() {
        theme::empty_chart(ui);
        return;
    }

    let casual: Vec<[f64; 2]> = usage
        .iter()
        .enumerate()
        .map(|(i, u)| [i as f64, u.casual])
        .collect();
    let registered: Vec<[f64; 2]> = usage
        .iter()
        .enumerate()
        .map(|(i, u)| [i as f64, u.registered])
        .collect();
    let labels = usage.iter().map(|u| u.weekday.to_string()).collect();

    base_plot("weekday_usage", "Day of Week", "Mean Rentals")
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(labels))
        .x_grid_spacer(unit_spacer())
        .include_y(0.0)
        .show(ui, |plot_ui| {
            for (name, series, line_color) in [
                ("Casual", casual, color::CASUAL_LINE),
                ("Registered", registered, color::REGISTERED_LINE),
            ] {
                plot_ui.line(
                    Line::new(PlotPoints::from(series.clone()))
                        .name(name)
                        .color(line_color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(series))
                        .name(name)
                        .color(line_color)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// 4. Monthly trend
// ---------------------------------------------------------------------------

/// Mean rentals per month, shaded along a blue gradient.
pub fn monthly_chart(ui: &mut Ui, months: &[MonthlyMean]) {
    if months.is_empty() {
        theme::empty_chart(ui);
        return;
    }

    let shades = color::blues_gradient(months.len());
    let bars: Vec<Bar> = months
        .iter()
        .zip(shades)
        .enumerate()
        .map(|(i, (m, shade))| {
            Bar::new(i as f64, m.mean)
                .width(0.7)
                .fill(shade)
                .name(m.month)
        })
        .collect();
    let labels = months.iter().map(|m| m.month.to_string()).collect();

    base_plot("monthly_means", "Month", "Mean Rentals")
        .x_axis_formatter(category_formatter(labels))
        .x_grid_spacer(unit_spacer())
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// 5. Hourly pattern
// ---------------------------------------------------------------------------

/// Mean rentals per hour of day, ticks at every hour.
pub fn hourly_chart(ui: &mut Ui, hours: &[HourlyMean]) {
    if hours.is_empty() {
        theme::empty_chart(ui);
        return;
    }

    let series: PlotPoints = hours
        .iter()
        .map(|h| [f64::from(h.hour), h.mean])
        .collect();

    base_plot("hourly_means", "Hour", "Mean Rentals")
        .x_grid_spacer(uniform_grid_spacer(|_| [24.0, 6.0, 1.0]))
        .include_x(0.0)
        .include_x(23.0)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(series).color(color::HOURLY_LINE).width(2.0));
        });
}

// ---------------------------------------------------------------------------
// 6. Workday comparison
// ---------------------------------------------------------------------------

fn workday_label(working_day: bool) -> &'static str {
    if working_day {
        "1 (Workday)"
    } else {
        "0 (Holiday/Weekend)"
    }
}

/// Box plots of daily totals for non-working vs working days.
pub fn workday_chart(ui: &mut Ui, boxes: &[WorkdayBox]) {
    if boxes.is_empty() {
        theme::empty_chart(ui);
        return;
    }

    let elems: Vec<BoxElem> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let s = &b.summary;
            let fill = color::set2(usize::from(b.working_day));
            BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(workday_label(b.working_day))
                .fill(fill.gamma_multiply(0.8))
                .stroke(Stroke::new(1.5, fill))
                .box_width(0.5)
                .whisker_width(0.25)
        })
        .collect();
    let outliers: Vec<[f64; 2]> = boxes
        .iter()
        .enumerate()
        .flat_map(|(i, b)| b.summary.outliers.iter().map(move |&v| [i as f64, v]))
        .collect();
    let labels = boxes
        .iter()
        .map(|b| workday_label(b.working_day).to_string())
        .collect();

    base_plot("workday_boxes", "Working Day", "Number of Rentals")
        .x_axis_formatter(category_formatter(labels))
        .x_grid_spacer(unit_spacer())
        .include_x(-0.5)
        .include_x(boxes.len() as f64 - 0.5)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
            if !outliers.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(outliers))
                        .name("Outliers")
                        .shape(MarkerShape::Diamond)
                        .color(theme::TEXT)
                        .radius(3.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(value: f64) -> GridMark {
        GridMark {
            value,
            step_size: 1.0,
        }
    }

    #[test]
    fn test_category_formatter_labels_integer_marks() {
        let fmt = category_formatter(vec!["Fall".into(), "Spring".into()]);
        let range = 0.0..=1.0;
        assert_eq!(fmt(mark(0.0), &range), "Fall");
        assert_eq!(fmt(mark(1.0), &range), "Spring");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(2.0), &range), "");
        assert_eq!(fmt(mark(-1.0), &range), "");
    }

    #[test]
    fn test_day_number_round_trips_through_formatter_base() {
        let d = NaiveDate::from_ymd_opt(2012, 2, 29).unwrap();
        let back = NaiveDate::from_num_days_from_ce_opt(day_number(d) as i32).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_workday_labels() {
        assert_eq!(workday_label(false), "0 (Holiday/Weekend)");
        assert_eq!(workday_label(true), "1 (Workday)");
    }
}
