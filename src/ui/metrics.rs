use eframe::egui::{RichText, Ui};

use crate::data::aggregate::SummaryMetrics;

/// Shown in place of a metric when nothing is selected.
const NO_VALUE: &str = "–";

/// Render the three headline metrics side by side.
pub fn metrics_row(ui: &mut Ui, metrics: &SummaryMetrics) {
    let cards = [
        ("Total Rentals", format_thousands(metrics.total)),
        (
            "Average Daily Rentals",
            metrics
                .mean
                .map(|m| format!("{m:.0}"))
                .unwrap_or_else(|| NO_VALUE.to_string()),
        ),
        (
            "Max Daily Rentals",
            metrics
                .max
                .map(|m| format_thousands(u64::from(m)))
                .unwrap_or_else(|| NO_VALUE.to_string()),
        ),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            col.label(RichText::new(label).weak());
            col.label(RichText::new(value).size(30.0).strong());
        }
    });
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(3292679), "3,292,679");
    }
}
