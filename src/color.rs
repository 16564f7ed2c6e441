use eframe::egui::Color32;
use palette::rgb::FromHexError;
use palette::{Darken, Hsl, IntoColor, Lighten, Srgb};

/// Fill used when the configured colour does not parse.
pub const DEFAULT_FILL: Color32 = Color32::from_rgb(0x42, 0x86, 0xf4);

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

// ---------------------------------------------------------------------------
// Point colours
// ---------------------------------------------------------------------------

/// Fill, hover highlight and outline for scatter points, all derived from a
/// single base colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPalette {
    pub fill: Color32,
    pub hover: Color32,
    pub outline: Color32,
}

impl PointPalette {
    /// Build from a `#rrggbb` (or `rrggbb`) string.
    pub fn from_hex(hex: &str) -> Result<Self, FromHexError> {
        let base: Srgb<u8> = hex.trim().parse()?;
        let hsl: Hsl = base.into_format::<f32>().into_color();

        Ok(PointPalette {
            fill: Color32::from_rgb(base.red, base.green, base.blue),
            hover: to_color32(hsl.lighten(0.25)),
            outline: to_color32(hsl.darken(0.35)),
        })
    }

    /// Like [`PointPalette::from_hex`], falling back to [`DEFAULT_FILL`].
    pub fn from_hex_or_default(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_else(|e| {
            log::warn!("Invalid point colour '{hex}': {e}; using default");
            Self::default()
        })
    }
}

impl Default for PointPalette {
    fn default() -> Self {
        Self::from_hex("#4286f4").unwrap_or(PointPalette {
            fill: DEFAULT_FILL,
            hover: Color32::LIGHT_BLUE,
            outline: Color32::DARK_BLUE,
        })
    }
}
