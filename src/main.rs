mod app;
mod chart;
mod color;
mod data;
mod settings;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::LifeScatterApp;
use clap::Parser;
use eframe::egui;
use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "life-scatter", version, about = "Fertility rate vs. life expectancy by year")]
struct Cli {
    /// Table to load at startup (.csv, .tsv, .json, .parquet).
    data: Option<PathBuf>,

    /// JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width in points.
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height in points.
    #[arg(long)]
    height: Option<f64>,

    /// Space reserved around the plot for axes and labels.
    #[arg(long)]
    margin: Option<f64>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };
        if let Some(data) = &self.data {
            settings.data_path = data.clone();
        }
        if let Some(width) = self.width {
            settings.canvas.width = width;
        }
        if let Some(height) = self.height {
            settings.canvas.height = height;
        }
        if let Some(margin) = self.margin {
            settings.canvas.margin = margin;
        }
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let settings = Cli::parse().settings()?;
    log::debug!("Settings: {settings:?}");

    let canvas = settings.canvas;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([(canvas.width + 360.0) as f32, (canvas.height + 80.0) as f32])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Life Scatter – Fertility vs Life Expectancy",
        options,
        Box::new(|_cc| Ok(Box::new(LifeScatterApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("running the viewer: {e}"))
}
