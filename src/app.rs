use std::time::Duration;

use eframe::egui;

use crate::settings::Settings;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LifeScatterApp {
    pub state: AppState,
}

impl LifeScatterApp {
    /// Build the app and start loading the configured data file, if present.
    pub fn new(settings: Settings) -> Self {
        let data_path = settings.data_path.clone();
        let mut state = AppState::new(settings);

        if data_path.exists() {
            state.begin_load(&data_path);
        } else {
            log::info!("{} not found; waiting for File → Open", data_path.display());
        }
        Self { state }
    }
}

impl eframe::App for LifeScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();
        if self.state.loading {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: year selector ----
        egui::SidePanel::left("year_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::scatter_plot(ui, &mut self.state);
        });
    }
}
