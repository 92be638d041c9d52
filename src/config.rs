use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::Color;

pub const DEFAULT_SIZE: u32 = 180;
pub const DEFAULT_BACKGROUND: Color = Color::rgb(0x00, 0xd4, 0xff);
pub const DEFAULT_GLYPH: &str = "n";
pub const DEFAULT_FONT_SIZE: u32 = 100;
pub const DEFAULT_OUTPUT_PATH: &str = "/home/sol/n0de-deploy/frontend/public/apple-touch-icon.png";

#[cfg(target_os = "linux")]
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

#[cfg(target_os = "macos")]
pub const DEFAULT_FONT_PATH: &str = "/Library/Fonts/DejaVuSans-Bold.ttf";

// Not shipped with Windows; the built-in font takes over unless the user installed it
#[cfg(target_os = "windows")]
pub const DEFAULT_FONT_PATH: &str = "C:\\Windows\\Fonts\\DejaVuSans-Bold.ttf";

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
pub const DEFAULT_FONT_PATH: &str = "DejaVuSans-Bold.ttf";

/// Everything needed to render one icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSpec {
    /// Side length of the square canvas in pixels.
    pub size: u32,
    pub background: Color,
    pub glyph: String,
    /// `None` renders with the built-in bitmap font.
    pub font_path: Option<PathBuf>,
    /// Pixels per em.
    pub font_size: u32,
    pub output_path: PathBuf,
}

impl Default for IconSpec {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            background: DEFAULT_BACKGROUND,
            glyph: DEFAULT_GLYPH.to_string(),
            font_path: Some(PathBuf::from(DEFAULT_FONT_PATH)),
            font_size: DEFAULT_FONT_SIZE,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl IconSpec {
    /// Builds a spec from a JSON object; missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
