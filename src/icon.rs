use std::{fs, io::Cursor, path::Path};

use image::{ImageFormat, Rgb, RgbImage};
use log::debug;

use crate::{
    color::Color,
    error::RenderError,
    font::{GlyphFont, InkBox},
};

/// Square RGB canvas. The size is fixed at creation.
#[derive(Debug, Clone)]
pub struct IconImage {
    buffer: RgbImage,
}

impl IconImage {
    pub fn new(size: u32, background: Color) -> Self {
        Self {
            buffer: RgbImage::from_pixel(size, size, background.into()),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.buffer
            .get_pixel_checked(x, y)
            .map(|Rgb([r, g, b])| Color::rgb(*r, *g, *b))
    }

    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Mixes `color` into the pixel at (x, y) by `coverage` in 0..=1.
    /// Points outside the canvas are ignored.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let Some(pixel) = self.buffer.get_pixel_mut_checked(x as u32, y as u32) else {
            return;
        };

        let coverage = coverage.clamp(0.0, 1.0);
        let Rgb(target) = Rgb::from(color);
        for (channel, new) in pixel.0.iter_mut().zip(target) {
            *channel = (*channel as f32 * (1.0 - coverage) + new as f32 * coverage).round() as u8;
        }
    }

    /// Draws `text` so that its ink box is centered on the canvas and returns
    /// the top-left corner of that box, or `None` if the text has no ink.
    pub fn draw_centered_text(
        &mut self, font: &GlyphFont, text: &str, color: Color,
    ) -> Option<(i32, i32)> {
        let ink = font.measure(text)?;
        let position = centered_position(self.width(), &ink);
        let offset = (position.0 - ink.min_x, position.1 - ink.min_y);
        debug!(
            "Drawing {text:?} ({}x{} ink) at {position:?}",
            ink.width(),
            ink.height()
        );
        font.draw(self, text, offset, color);
        Some(position)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.buffer.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Encodes the canvas as PNG and replaces whatever is at `path`.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let bytes = self.encode_png()?;
        fs::write(path, bytes).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Top-left corner that centers `ink` on a `size`x`size` canvas, rounding down.
pub fn centered_position(size: u32, ink: &InkBox) -> (i32, i32) {
    let size = size as i32;
    (
        (size - ink.width()).div_euclid(2),
        (size - ink.height()).div_euclid(2),
    )
}
