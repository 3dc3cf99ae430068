// src/main.rs
mod chart;
mod config;
mod engine;
mod gui;
mod types;
use std::path::PathBuf;
use anyhow::anyhow;
use eframe::egui;
use crate::config::AppConfig;
// Entry point: `livechart [config.json]`
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    log::info!(
        "{} charts, stream {:?} at {}",
        config.charts.len(),
        config.stream.mode,
        config.stream.address
    );
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 640.0])
        .with_min_inner_size([480.0, 320.0])
        .with_title("Live Chart");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "livechart",
        options,
        Box::new(move |_cc| Box::new(gui::LiveChartApp::new(config))),
    )
    .map_err(|e| anyhow!("eframe failed: {e}"))
}
