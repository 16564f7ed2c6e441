use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::chart::PlotModel;
use crate::color::PointPalette;
use crate::data::filter::{distinct_years, initial_year};
use crate::data::loader::{load_file, LoadError};
use crate::data::model::{DataTable, Year};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

type LoadResult = (PathBuf, Result<DataTable, LoadError>);

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Point colours derived from `settings.point_color`.
    pub palette: PointPalette,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<DataTable>,

    /// File the current dataset came from.
    pub source: Option<PathBuf>,

    /// Distinct years in first-seen order, as offered by the selector.
    pub years: Vec<Year>,

    pub selected_year: Option<Year>,

    /// Output of the last render pass.
    pub plot: Option<PlotModel>,

    /// Index into `plot.points` under the pointer, if any.
    pub hovered: Option<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    pending: Option<Receiver<LoadResult>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let palette = PointPalette::from_hex_or_default(&settings.point_color);
        Self {
            settings,
            palette,
            dataset: None,
            source: None,
            years: Vec::new(),
            selected_year: None,
            plot: None,
            hovered: None,
            status_message: None,
            loading: false,
            pending: None,
        }
    }

    /// Start loading `path` on a background thread. Any load still in flight
    /// is abandoned.
    pub fn begin_load(&mut self, path: &Path) {
        let (tx, rx) = mpsc::channel();
        let path = path.to_path_buf();
        log::info!("Loading {}", path.display());

        thread::spawn(move || {
            let result = load_file(&path);
            // The receiver is gone if a newer load replaced this one.
            let _ = tx.send((path, result));
        });

        self.pending = Some(rx);
        self.loading = true;
        self.status_message = None;
    }

    /// Pick up a finished background load. Returns `true` when state changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok((path, result)) => {
                self.pending = None;
                self.finish_load(path, result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.loading = false;
                self.status_message = Some("Error: loader thread stopped unexpectedly".into());
                true
            }
        }
    }

    fn finish_load(&mut self, path: PathBuf, result: Result<DataTable, LoadError>) {
        match result {
            Ok(table) => {
                self.source = Some(path);
                self.set_dataset(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error loading {}: {e}", path.display()));
                self.loading = false;
            }
        }
    }

    /// Ingest a newly loaded dataset, populate the year list and render the
    /// initial year.
    pub fn set_dataset(&mut self, dataset: DataTable) {
        self.status_message = dataset
            .is_empty()
            .then(|| "The table has no rows.".to_string());
        self.years = distinct_years(&dataset);
        self.selected_year = initial_year(&self.years);
        self.dataset = Some(dataset);
        self.loading = false;
        self.rerender();
    }

    /// Handle a selector change.
    pub fn select_year(&mut self, year: Year) {
        if self.selected_year.as_ref() == Some(&year) {
            return;
        }
        self.selected_year = Some(year);
        self.rerender();
    }

    /// Discard the current plot and build a fresh one for the selected year.
    pub fn rerender(&mut self) {
        self.hovered = None;
        self.plot = match (&self.dataset, &self.selected_year) {
            (Some(ds), Some(year)) => Some(PlotModel::build(ds, year, &self.settings)),
            _ => None,
        };
    }

    /// Update hover from a canvas-relative pointer position.
    pub fn hover_at(&mut self, pos: Option<(f64, f64)>) {
        self.hovered = match (&self.plot, pos) {
            (Some(plot), Some((x, y))) => plot.point_at(x, y),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::data::model::tests::{country, table};

    fn state_with_data() -> AppState {
        let mut state = AppState::new(Settings::default());
        state.set_dataset(table(vec![
            country("A", "1961", "2", "40", "5"),
            country("B", "1960", "6", "70", "10"),
            country("C", "1960", "3", "60", "7"),
        ]));
        state
    }

    #[test]
    fn set_dataset_selects_and_renders_initial_year() {
        let state = state_with_data();
        assert_eq!(state.years, vec![Year::from(1961), Year::from(1960)]);
        assert_eq!(state.selected_year, Some(Year::from(1960)));
        let plot = state.plot.as_ref().unwrap();
        assert_eq!(plot.year, Year::from(1960));
        assert_eq!(plot.points.len(), 2);
    }

    #[test]
    fn select_year_rebuilds_the_plot() {
        let mut state = state_with_data();
        state.hover_at(Some((50.0, 550.0)));
        assert!(state.hovered.is_some());

        state.select_year(Year::from(1961));
        let plot = state.plot.as_ref().unwrap();
        assert_eq!(plot.year, Year::from(1961));
        assert_eq!(plot.points.len(), 1);
        assert_eq!(state.hovered, None);
    }

    #[test]
    fn hover_clears_when_pointer_leaves() {
        let mut state = state_with_data();
        state.hover_at(Some((750.0, 50.0)));
        assert_eq!(state.hovered, Some(0));
        state.hover_at(None);
        assert_eq!(state.hovered, None);
    }

    #[test]
    fn failed_background_load_reports_inline() {
        let mut state = state_with_data();
        let dir = tempfile::tempdir().unwrap();
        state.begin_load(&dir.path().join("absent.csv"));
        assert!(state.loading);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !state.poll_load() {
            assert!(Instant::now() < deadline, "loader never finished");
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(!state.loading);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error loading"));
        // The previous dataset stays on screen.
        assert!(state.dataset.is_some());
    }

    #[test]
    fn background_load_replaces_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(
            &path,
            "time,location,fertility_rate,life_expectancy,pop_mlns\n2000,Chad,6.1,50.0,8.3\n",
        )
        .unwrap();

        let mut state = state_with_data();
        state.begin_load(&path);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !state.poll_load() {
            assert!(Instant::now() < deadline, "loader never finished");
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(state.source.as_deref(), Some(path.as_path()));
        assert_eq!(state.years, vec![Year::from(2000)]);
        assert_eq!(state.plot.as_ref().unwrap().points.len(), 1);
    }
}
