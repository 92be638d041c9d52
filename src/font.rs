use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, OutlinedGlyph, PxScale, ScaleFont, point};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use log::debug;

use crate::{color::Color, icon::IconImage};

/// Largest pixels-per-em any font is rasterized at.
pub const MAX_FONT_SIZE: u32 = 2048;

#[derive(Debug)]
pub enum FontError {
    NotFound(PathBuf),
    ReadError(std::io::Error),
    InvalidFont(PathBuf),
    MissingMetrics(PathBuf),
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::NotFound(path) => write!(f, "Font file not found: {}", path.display()),
            FontError::ReadError(err) => write!(f, "Failed to read font file: {err}"),
            FontError::InvalidFont(path) => write!(f, "Not a usable font: {}", path.display()),
            FontError::MissingMetrics(path) => {
                write!(f, "Font has no units-per-em metric: {}", path.display())
            }
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontError::ReadError(err) => Some(err),
            _ => None,
        }
    }
}

/// Pixel bounding box of rendered ink. `max_x`/`max_y` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl InkBox {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    fn union(self, other: InkBox) -> InkBox {
        InkBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

fn union_all(boxes: impl IntoIterator<Item = InkBox>) -> Option<InkBox> {
    boxes.into_iter().reduce(InkBox::union)
}

/// A TrueType/OpenType font scaled to a pixel size.
pub struct OutlineFont {
    font: FontVec,
    scale: PxScale,
}

impl OutlineFont {
    /// Lays `text` out on a single line whose origin sits on the font's ascent,
    /// so that layout coordinates start at the top-left of the line box.
    fn layout(&self, text: &str) -> Vec<OutlinedGlyph> {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = 0.0f32;
        let mut previous = None;
        let mut glyphs = Vec::new();

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            previous = Some(id);

            // Whitespace has no outline but still advances the caret
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
        }

        glyphs
    }

    fn measure(&self, text: &str) -> Option<InkBox> {
        union_all(self.layout(text).iter().map(|glyph| {
            let bounds = glyph.px_bounds();
            InkBox {
                min_x: bounds.min.x as i32,
                min_y: bounds.min.y as i32,
                max_x: bounds.max.x as i32,
                max_y: bounds.max.y as i32,
            }
        }))
    }

    fn draw(&self, image: &mut IconImage, text: &str, offset: (i32, i32), color: Color) {
        for glyph in self.layout(text) {
            let bounds = glyph.px_bounds();
            let left = bounds.min.x as i32 + offset.0;
            let top = bounds.min.y as i32 + offset.1;
            glyph.draw(|x, y, coverage| {
                image.blend(left + x as i32, top + y as i32, color, coverage);
            });
        }
    }
}

/// The always-available 8x8 bitmap font, magnified by an integer factor.
pub struct BuiltinFont {
    scale: i32,
}

impl BuiltinFont {
    const CELL: i32 = 8;

    pub fn new(font_size: u32) -> Self {
        let scale = (font_size.min(MAX_FONT_SIZE) as i32 / Self::CELL).max(1);
        Self { scale }
    }

    /// Calls `f` with the unscaled position of every set dot in `text`.
    fn for_each_dot(&self, text: &str, mut f: impl FnMut(i32, i32)) {
        for (index, c) in text.chars().enumerate() {
            // Uncovered characters advance without ink
            let Some(rows) = BASIC_FONTS.get(c) else {
                continue;
            };
            let origin = index as i32 * Self::CELL;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..Self::CELL {
                    if bits & (1 << col) != 0 {
                        f(origin + col, row as i32);
                    }
                }
            }
        }
    }

    fn measure(&self, text: &str) -> Option<InkBox> {
        let mut ink: Option<InkBox> = None;
        self.for_each_dot(text, |x, y| {
            let dot = InkBox {
                min_x: x * self.scale,
                min_y: y * self.scale,
                max_x: (x + 1) * self.scale,
                max_y: (y + 1) * self.scale,
            };
            ink = Some(ink.map_or(dot, |ink| ink.union(dot)));
        });
        ink
    }

    fn draw(&self, image: &mut IconImage, text: &str, offset: (i32, i32), color: Color) {
        let scale = self.scale;
        self.for_each_dot(text, |x, y| {
            for dy in 0..scale {
                for dx in 0..scale {
                    image.blend(x * scale + dx + offset.0, y * scale + dy + offset.1, color, 1.0);
                }
            }
        });
    }
}

/// A font resolved for rendering: either loaded from disk or the built-in fallback.
pub enum GlyphFont {
    Outline(OutlineFont),
    Builtin(BuiltinFont),
}

impl GlyphFont {
    pub fn builtin(font_size: u32) -> Self {
        GlyphFont::Builtin(BuiltinFont::new(font_size))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, GlyphFont::Builtin(_))
    }

    /// Ink bounds of `text` in layout coordinates, or `None` if nothing would be drawn.
    pub fn measure(&self, text: &str) -> Option<InkBox> {
        match self {
            GlyphFont::Outline(font) => font.measure(text),
            GlyphFont::Builtin(font) => font.measure(text),
        }
    }

    /// Draws `text` with its layout origin translated by `offset`.
    pub fn draw(&self, image: &mut IconImage, text: &str, offset: (i32, i32), color: Color) {
        match self {
            GlyphFont::Outline(font) => font.draw(image, text, offset, color),
            GlyphFont::Builtin(font) => font.draw(image, text, offset, color),
        }
    }
}

#[cfg(target_os = "windows")]
fn system_font_dirs() -> Vec<PathBuf> {
    let system_root = std::env::var("SYSTEMROOT").unwrap_or("C:\\Windows".to_string());
    vec![PathBuf::from(format!("{system_root}\\Fonts"))]
}

#[cfg(target_os = "macos")]
fn system_font_dirs() -> Vec<PathBuf> {
    ["/System/Library/Fonts", "/System/Library/Fonts/Supplemental", "/Library/Fonts"]
        .into_iter()
        .map(PathBuf::from)
        .collect()
}

#[cfg(target_os = "linux")]
fn system_font_dirs() -> Vec<PathBuf> {
    [
        // Ubuntu/Debian paths
        "/usr/share/fonts/truetype/dejavu",
        "/usr/share/fonts/truetype/liberation",
        "/usr/share/fonts/truetype",
        // Arch Linux paths
        "/usr/share/fonts/TTF",
        // Fedora/CentOS paths
        "/usr/share/fonts/dejavu-sans-fonts",
        "/usr/share/fonts/dejavu",
        "/usr/local/share/fonts",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn system_font_dirs() -> Vec<PathBuf> {
    Vec::new()
}

/// Finds the font file for `path`. Paths that exist are used as-is; a bare
/// file name is also searched for in the user and system font directories.
pub fn locate_font(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    let has_dir = path.parent().is_some_and(|parent| !parent.as_os_str().is_empty());
    if has_dir {
        return None;
    }

    dirs::font_dir()
        .into_iter()
        .chain(system_font_dirs())
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}

#[inline]
fn read_font_file(font_path: &Path) -> Result<Vec<u8>, FontError> {
    use std::io::Read;

    let file = std::fs::File::open(font_path).map_err(FontError::ReadError)?;
    let mut reader = std::io::BufReader::new(file);
    let mut font_data = Vec::new();
    reader.read_to_end(&mut font_data).map_err(FontError::ReadError)?;
    Ok(font_data)
}

/// Loads an outline font with `font_size` pixels per em.
pub fn try_load_font(path: &Path, font_size: u32) -> Result<GlyphFont, FontError> {
    let font_size = font_size.min(MAX_FONT_SIZE);
    let resolved = locate_font(path).ok_or_else(|| FontError::NotFound(path.to_path_buf()))?;
    let data = read_font_file(&resolved)?;
    let font = FontVec::try_from_vec(data).map_err(|_| FontError::InvalidFont(resolved.clone()))?;
    let units_per_em = font
        .units_per_em()
        .ok_or_else(|| FontError::MissingMetrics(resolved.clone()))?;

    // PxScale measures ascent-to-descent height, not the em square
    let scale = PxScale::from(font_size as f32 * font.height_unscaled() / units_per_em);
    debug!("Loaded font {} at {font_size}px/em", resolved.display());

    Ok(GlyphFont::Outline(OutlineFont { font, scale }))
}

/// Loads the font at `path`, or `None` when it cannot be used as a font.
pub fn load_font(path: &Path, font_size: u32) -> Option<GlyphFont> {
    match try_load_font(path, font_size) {
        Ok(font) => Some(font),
        Err(e) => {
            debug!("Falling back to built-in font: {e}");
            None
        }
    }
}

pub fn resolve_font(path: Option<&Path>, font_size: u32) -> GlyphFont {
    path.and_then(|path| load_font(path, font_size))
        .unwrap_or_else(|| GlyphFont::builtin(font_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scale_is_capped() {
        let font = BuiltinFont::new(u32::MAX);
        assert_eq!(font.scale, MAX_FONT_SIZE as i32 / 8);

        let ink = font.measure("WIDE TEXT").unwrap();
        assert!(ink.width() > 0 && ink.height() > 0);
    }

    #[test]
    fn builtin_scale_is_at_least_one() {
        assert_eq!(BuiltinFont::new(0).scale, 1);
        assert_eq!(BuiltinFont::new(7).scale, 1);
        assert_eq!(BuiltinFont::new(100).scale, 12);
    }
}
