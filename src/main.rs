mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::BikeDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::new(DashboardConfig::load());
    state.load_configured();

    let [width, height] = state.config.window_size;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the logo from disk.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            ui::theme::apply(&cc.egui_ctx);
            Ok(Box::new(BikeDashboardApp::new(state)))
        }),
    )
}
