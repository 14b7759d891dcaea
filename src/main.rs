use tracing::{info, warn};

use dataset_balancer::config::AppConfig;
use dataset_balancer::infrastructure::logging::setup_logging;

mod app;
mod state;
mod ui;

use app::BalancerApp;
use state::Settings;

fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

fn main() -> Result<(), eframe::Error> {
    if let Err(e) = setup_logging() {
        eprintln!("Failed to set up file logging: {}", e);
    }

    let config = AppConfig::default();
    let settings = Settings::load();
    let (width, height) = if settings.window_width > 0.0 && settings.window_height > 0.0 {
        (settings.window_width, settings.window_height)
    } else {
        warn!("Ignoring saved window size, using defaults");
        (config.window_width, config.window_height)
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_title("Dataset Balancer"),
        ..Default::default()
    };

    info!("Launching application window");
    eframe::run_native(
        "Dataset Balancer",
        options,
        Box::new(move |cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(BalancerApp::new(config, settings)))
        }),
    )
}
