use eframe::egui::{self, Color32, RichText, Stroke, Ui};

// ---------------------------------------------------------------------------
// Dark chart theme
// ---------------------------------------------------------------------------

pub const FIGURE_BG: Color32 = Color32::from_rgb(0x1E, 0x1E, 0x1E);
pub const AXES_BG: Color32 = Color32::from_rgb(0x28, 0x37, 0x47);
pub const TEXT: Color32 = Color32::WHITE;
pub const GRID: Color32 = Color32::GRAY;

/// Height of every chart body, placeholders included.
pub const CHART_HEIGHT: f32 = 300.0;

/// Install the dark visuals for the whole window.
pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = FIGURE_BG;
    visuals.extreme_bg_color = AXES_BG;
    ctx.set_visuals(visuals);
}

/// Draw a titled chart card.  Everything added by `add_contents` sees the
/// axes background, white text and gray grid strokes.
pub fn chart_card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::new()
        .fill(FIGURE_BG)
        .stroke(Stroke::new(0.5, GRID))
        .inner_margin(egui::Margin::same(8))
        .corner_radius(egui::CornerRadius::same(4))
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(title).strong().size(15.0).color(TEXT));
            ui.scope(|ui: &mut Ui| {
                let visuals = ui.visuals_mut();
                visuals.extreme_bg_color = AXES_BG;
                visuals.override_text_color = Some(TEXT);
                visuals.widgets.noninteractive.bg_stroke = Stroke::new(0.5, GRID);
                add_contents(ui);
            });
        });
}

/// Fixed-size stand-in for a chart whose aggregation came back empty.
pub fn empty_chart(ui: &mut Ui) {
    let text = RichText::new("No data for the current selection")
        .color(GRID)
        .italics();
    ui.add_sized([ui.available_width(), CHART_HEIGHT], egui::Label::new(text));
}
