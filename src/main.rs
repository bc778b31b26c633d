mod app;
mod compositor;
mod config;
mod exporter;
mod loader;
mod toast;
mod transform;
mod ui_theme;

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 540.0])
            .with_min_inner_size([560.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Frame Studio",
        options,
        Box::new(|_cc| Ok(Box::new(app::FrameStudioApp::new()))),
    )
}
