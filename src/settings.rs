use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::chart::scale::{PixelRange, RADIUS_RANGE};

// ---------------------------------------------------------------------------
// Canvas – fixed drawing area
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Space reserved on every side for axes and labels.
    pub margin: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            width: 800.0,
            height: 600.0,
            margin: 50.0,
        }
    }
}

impl Canvas {
    pub fn range_x(&self) -> PixelRange {
        PixelRange::new(self.margin, self.width - self.margin)
    }

    pub fn range_y(&self) -> PixelRange {
        PixelRange::new(self.margin, self.height - self.margin)
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Viewer configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Table loaded at startup.
    pub data_path: PathBuf,
    pub canvas: Canvas,
    /// Point radius for the smallest and largest population.
    pub radius_range: [f64; 2],
    /// Approximate number of ticks per axis.
    pub tick_count: usize,
    /// Point fill as `#rrggbb`.
    pub point_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_path: PathBuf::from("dataEveryYear.csv"),
            canvas: Canvas::default(),
            radius_range: [RADIUS_RANGE.min, RADIUS_RANGE.max],
            tick_count: 10,
            point_color: "#4286f4".to_string(),
        }
    }
}

impl Settings {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing settings file {}", path.display()))
    }

    pub fn radius_range(&self) -> PixelRange {
        PixelRange::new(self.radius_range[0], self.radius_range[1])
    }
}
