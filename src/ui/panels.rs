use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year selector and table
// ---------------------------------------------------------------------------

/// Render the left panel: year selector, then the rows behind the plot.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Year");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let current = state
        .selected_year
        .as_ref()
        .map(|y| y.to_string())
        .unwrap_or_default();

    let mut chosen = None;
    egui::ComboBox::from_id_salt("selected_year")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for year in &state.years {
                if ui
                    .selectable_label(state.selected_year.as_ref() == Some(year), year.as_str())
                    .clicked()
                {
                    chosen = Some(year.clone());
                }
            }
        });
    if let Some(year) = chosen {
        state.select_year(year);
    }

    ui.separator();

    let Some(plot) = &state.plot else {
        return;
    };

    ui.strong(format!("{} countries", plot.points.len()));
    ui.add_space(4.0);

    let table_height = ui.available_height() * 0.7;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(table_height)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Country", "Fertility", "Life exp.", "Population"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (i, point) in plot.points.iter().enumerate() {
                let tip = &point.tooltip;
                body.row(18.0, |mut row| {
                    row.set_selected(state.hovered == Some(i));
                    row.col(|ui: &mut Ui| {
                        ui.label(tip.country.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(tip.fertility_rate.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(tip.life_expectancy.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(tip.population_formatted.as_str());
                    });
                });
            }
        });

    if !plot.skipped.is_empty() {
        ui.separator();
        egui::CollapsingHeader::new(
            RichText::new(format!("Skipped rows ({})", plot.skipped.len())).strong(),
        )
        .id_salt("skipped_rows")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                for skipped in &plot.skipped {
                    ui.label(format!("{}: {}", skipped.country, skipped.error));
                }
            });
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if let Some(path) = state.source.clone() {
                if ui.button("Reload").clicked() {
                    state.begin_load(&path);
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading…");
        } else if let Some(ds) = &state.dataset {
            let visible = state.plot.as_ref().map_or(0, |p| p.points.len());
            ui.label(format!(
                "{} rows loaded, {} years, {} visible",
                ds.len(),
                state.years.len(),
                visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open country data")
        .add_filter("Supported files", &["csv", "tsv", "tab", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Tab-separated", &["tsv", "tab"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.begin_load(&path);
    }
}
