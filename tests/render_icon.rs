#[cfg(test)]
mod tests {
    use image::{ColorType, ImageReader, RgbImage};
    use std::{
        fs,
        path::{Path, PathBuf},
    };
    use tempfile::tempdir;
    use touchicon::{
        Color, IconRenderer, IconSpec, RenderError,
        font::{GlyphFont, locate_font},
        render_icon,
    };

    const CYAN: Color = Color::rgb(0x00, 0xd4, 0xff);

    fn builtin_spec(output_path: PathBuf) -> IconSpec {
        IconSpec {
            font_path: None,
            output_path,
            ..IconSpec::default()
        }
    }

    // For renders that never touch the filesystem
    fn in_memory_spec() -> IconSpec {
        builtin_spec(PathBuf::from("icon.png"))
    }

    fn decode(path: &Path) -> image::DynamicImage {
        ImageReader::open(path).unwrap().decode().unwrap()
    }

    // Bounding box of every pixel that differs from `background`, max exclusive
    fn ink_bounds(img: &RgbImage, background: Color) -> Option<(u32, u32, u32, u32)> {
        let bg = image::Rgb([background.r, background.g, background.b]);
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, pixel) in img.enumerate_pixels() {
            if *pixel == bg {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
        bounds
    }

    // `slack` is the allowed difference between opposite margins
    fn assert_centered(img: &RgbImage, background: Color, slack: i64) {
        let (x0, y0, x1, y1) = ink_bounds(img, background).expect("glyph left no ink");
        let left = x0 as i64;
        let right = img.width() as i64 - x1 as i64;
        let top = y0 as i64;
        let bottom = img.height() as i64 - y1 as i64;
        assert!((left - right).abs() <= slack, "horizontal margins {left} vs {right}");
        assert!((top - bottom).abs() <= slack, "vertical margins {top} vs {bottom}");
    }

    fn system_dejavu() -> Option<PathBuf> {
        locate_font(Path::new("DejaVuSans-Bold.ttf"))
    }

    #[test]
    fn writes_180_square_rgb_png() {
        let dir = tempdir().unwrap();
        let spec = builtin_spec(dir.path().join("icon.png"));
        let path = IconRenderer::new(spec.clone()).render_to_file().unwrap();
        assert_eq!(path, spec.output_path);

        let img = decode(&path);
        assert_eq!((img.width(), img.height()), (180, 180));
        assert_eq!(img.color(), ColorType::Rgb8);
        assert_eq!(*img.to_rgb8().get_pixel(0, 0), image::Rgb([0x00, 0xd4, 0xff]));
    }

    #[test]
    fn dimensions_do_not_depend_on_glyph() {
        for glyph in ["W", "nn", "", " ", "\u{263A}", "WIDE TEXT"] {
            let spec = IconSpec {
                glyph: glyph.to_string(),
                ..in_memory_spec()
            };
            let image = IconRenderer::new(spec).render();
            assert_eq!((image.width(), image.height()), (180, 180), "glyph {glyph:?}");
        }
    }

    #[test]
    fn huge_font_size_still_renders() {
        for glyph in ["n", "WIDE TEXT"] {
            let spec = IconSpec {
                glyph: glyph.to_string(),
                font_size: u32::MAX,
                ..in_memory_spec()
            };
            let image = IconRenderer::new(spec).render();
            assert_eq!((image.width(), image.height()), (180, 180), "glyph {glyph:?}");
        }

        if let Some(font_path) = system_dejavu() {
            let spec = IconSpec {
                font_path: Some(font_path),
                font_size: u32::MAX,
                ..in_memory_spec()
            };
            let image = IconRenderer::new(spec).render();
            assert_eq!((image.width(), image.height()), (180, 180));
        }
    }

    #[test]
    fn builtin_glyph_is_centered() {
        let image = IconRenderer::new(in_memory_spec()).render();
        assert_centered(image.as_rgb_image(), CYAN, 1);
        assert_eq!(image.pixel(0, 179), Some(CYAN));
    }

    #[test]
    fn builtin_glyph_is_black() {
        let image = IconRenderer::new(in_memory_spec()).render();
        let has_black = image.as_rgb_image().pixels().any(|p| p.0 == [0, 0, 0]);
        assert!(has_black);
    }

    #[test]
    fn missing_font_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let path = render_icon(
            180,
            CYAN,
            "n",
            Some(Path::new("/definitely/not/here/NoSuchFont.ttf")),
            100,
            dir.path().join("fallback.png"),
        )
        .unwrap();

        let img = decode(&path).to_rgb8();
        assert_eq!(img.dimensions(), (180, 180));

        let builtin = IconRenderer::new(in_memory_spec()).render();
        assert_eq!(&img, builtin.as_rgb_image());
    }

    #[test]
    fn non_font_file_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        fs::write(&bogus, b"this is not a font").unwrap();

        let spec = IconSpec {
            font_path: Some(bogus),
            ..in_memory_spec()
        };
        let image = IconRenderer::new(spec).render();
        let builtin = IconRenderer::new(in_memory_spec()).render();
        assert_eq!(image.as_rgb_image(), builtin.as_rgb_image());
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = IconRenderer::new(in_memory_spec()).render().encode_png().unwrap();
        let second = IconRenderer::new(in_memory_spec()).render().encode_png().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn system_font_rendering_is_deterministic() {
        let Some(font_path) = system_dejavu() else {
            eprintln!("DejaVuSans-Bold.ttf not installed, skipping");
            return;
        };

        let spec = IconSpec {
            font_path: Some(font_path),
            ..in_memory_spec()
        };
        let first = IconRenderer::new(spec.clone()).render().encode_png().unwrap();
        let second = IconRenderer::new(spec).render().encode_png().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn second_run_overwrites_first() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("icon.png");
        render_icon(180, Color::WHITE, "a", None, 100, &output).unwrap();
        render_icon(180, CYAN, "n", None, 100, &output).unwrap();

        let img = decode(&output).to_rgb8();
        assert_eq!(*img.get_pixel(0, 0), image::Rgb([0x00, 0xd4, 0xff]));
        let expected = IconRenderer::new(in_memory_spec()).render();
        assert_eq!(&img, expected.as_rgb_image());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("no-such-dir").join("icon.png");
        let err = render_icon(180, CYAN, "n", None, 100, &output).unwrap_err();
        match err {
            RenderError::Write { path, .. } => assert_eq!(path, output),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_spec_matches_shipped_icon() {
        let spec = IconSpec::default();
        assert_eq!(spec.size, 180);
        assert_eq!(spec.background, CYAN);
        assert_eq!(spec.glyph, "n");
        assert_eq!(spec.font_size, 100);
        assert!(spec.font_path.is_some());
        assert!(spec.output_path.is_absolute() || cfg!(windows));
    }

    #[test]
    fn spec_from_partial_json_keeps_defaults() {
        let spec = IconSpec::from_json(r##"{"glyph": "Q", "background": "#FFF", "font_path": null}"##)
            .unwrap();
        assert_eq!(spec.glyph, "Q");
        assert_eq!(spec.background, Color::WHITE);
        assert_eq!(spec.font_path, None);
        assert_eq!(spec.size, 180);

        assert!(IconSpec::from_json(r#"{"background": "not-a-color"}"#).is_err());
    }

    #[test]
    fn system_font_renders_centered_glyph() {
        let Some(font_path) = system_dejavu() else {
            eprintln!("DejaVuSans-Bold.ttf not installed, skipping");
            return;
        };

        let dir = tempdir().unwrap();
        let output = dir.path().join("dejavu.png");
        let path = render_icon(180, CYAN, "n", Some(font_path.as_path()), 100, &output).unwrap();
        let img = decode(&path);
        assert_eq!((img.width(), img.height()), (180, 180));
        assert_eq!(img.color(), ColorType::Rgb8);

        let rgb = img.to_rgb8();
        assert_eq!(*rgb.get_pixel(0, 0), image::Rgb([0x00, 0xd4, 0xff]));
        assert!(rgb.pixels().any(|p| p.0 == [0, 0, 0]));
        // Anti-aliased edges may leave an untouched pixel column inside the ink box
        assert_centered(&rgb, CYAN, 2);
    }

    #[test]
    fn bare_font_name_is_found_in_font_dirs() {
        if system_dejavu().is_none() {
            eprintln!("DejaVuSans-Bold.ttf not installed, skipping");
            return;
        }

        let font = touchicon::font::resolve_font(Some(Path::new("DejaVuSans-Bold.ttf")), 100);
        assert!(!font.is_builtin());
        assert!(matches!(
            touchicon::font::resolve_font(None, 100),
            GlyphFont::Builtin(_)
        ));
    }
}
