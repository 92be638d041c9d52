use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{color::Color, config::IconSpec, error::RenderError, font::resolve_font, icon::IconImage};

/// Ink color of the glyph.
pub const FOREGROUND: Color = Color::BLACK;

/// Past a few canvas widths per em only a sliver of one stroke is visible.
fn font_size_limit(size: u32) -> u32 {
    size.saturating_mul(4).max(8)
}

#[derive(Debug, Clone)]
pub struct IconRenderer {
    spec: IconSpec,
}

impl IconRenderer {
    pub fn new(spec: IconSpec) -> Self {
        Self { spec }
    }

    /// Renders the icon in memory. A font that cannot be loaded is replaced
    /// by the built-in bitmap font.
    pub fn render(&self) -> IconImage {
        let spec = &self.spec;
        let mut image = IconImage::new(spec.size, spec.background);
        let font_size = spec.font_size.min(font_size_limit(spec.size));
        if font_size < spec.font_size {
            debug!("Font size {} capped to {font_size}", spec.font_size);
        }
        let font = resolve_font(spec.font_path.as_deref(), font_size);
        if font.is_builtin() {
            debug!("Rendering {:?} with the built-in font", spec.glyph);
        }

        if image.draw_centered_text(&font, &spec.glyph, FOREGROUND).is_none() {
            debug!("Glyph {:?} has no visible ink", spec.glyph);
        }

        image
    }

    /// Renders the icon and writes it as PNG, overwriting any existing file.
    pub fn render_to_file(&self) -> Result<PathBuf, RenderError> {
        let image = self.render();
        image.save(&self.spec.output_path)?;
        info!(
            "Wrote {}x{} icon to {}",
            image.width(),
            image.height(),
            self.spec.output_path.display()
        );
        Ok(self.spec.output_path.clone())
    }
}

/// Renders `glyph` centered on a `size`x`size` square and saves it to `output_path`.
pub fn render_icon(
    size: u32, background: Color, glyph: &str, font_path: Option<&Path>, font_size: u32,
    output_path: impl AsRef<Path>,
) -> Result<PathBuf, RenderError> {
    let spec = IconSpec {
        size,
        background,
        glyph: glyph.to_string(),
        font_path: font_path.map(Path::to_path_buf),
        font_size,
        output_path: output_path.as_ref().to_path_buf(),
    };
    IconRenderer::new(spec).render_to_file()
}
