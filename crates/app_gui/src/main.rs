use eframe::{NativeOptions, egui};

mod app;

use app::UiApp;

fn main() {
    tracing_subscriber::fmt::init();
    let (config, config_path) = app::settings::load_config();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([500.0, 600.0]),
        ..Default::default()
    };
    let title = format!("Image Insight {}", env!("IMAGE_INSIGHT_VERSION"));
    tracing::info!("starting {title} (core {})", vision_core::version());
    if let Err(e) = eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(UiApp::new(config, config_path)))),
    ) {
        tracing::error!("application stopped with error: {e}");
        eprintln!("Application stopped with error: {e}");
    }
}
