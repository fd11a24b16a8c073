//! Glyph rasterization.
//!
//! Glyph outlines are read with `ttf-parser`, filled into a coverage mask
//! with `tiny-skia` and composited onto a solid color with `image`. The
//! result is cropped to its ink, re-centered and scaled to the requested
//! size, so every icon sits in the middle of a square transparent PNG.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia;

use crate::catalog::CatalogEntry;
use crate::color::IconColor;
use crate::font::{GlyphMetrics, IconFont};
use crate::{Error, Result};

/// Smallest working canvas; smaller requests are drawn here and downscaled.
pub const MIN_CANVAS: u32 = 150;

/// Pixel size images are rendered at when LaTeX controls the display size.
pub const BASE_SIZE: u32 = 512;

/// Upper bound on auto-fit iterations.
pub const MAX_FIT_ITERATIONS: u32 = 64;

/// How the font size is chosen relative to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GlyphScale {
    /// Shrink from the canvas size until the glyph box fits.
    #[default]
    Auto,
    /// Font size is `canvas * factor`.
    Fixed(f32),
}

/// Outcome of [`fit_font_size`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontFit {
    /// Chosen font size in pixels.
    pub font_size: f32,
    /// Number of shrink steps taken.
    pub iterations: u32,
}

/// Size of the glyph box at `font_size` pixels: the larger of advance and
/// ink width by the larger of em size and ink height.
pub fn glyph_box(font_size: f32, metrics: &GlyphMetrics) -> (f32, f32) {
    let scale = font_size / metrics.units_per_em;
    let width = metrics.advance.max(metrics.ink_width()) * scale;
    let height = font_size.max(metrics.ink_height() * scale);
    (width, height)
}

/// Find the largest font size whose glyph box fits a `canvas` square.
///
/// Starts at the canvas size. While the longer side of the box exceeds the
/// canvas, the size is scaled by `canvas / side` times a damping factor that
/// decays by 1% every second step. Stops after [`MAX_FIT_ITERATIONS`] even
/// if the metrics never converge.
pub fn fit_font_size(canvas: f32, metrics: &GlyphMetrics) -> FontFit {
    let mut font_size = canvas;
    let mut factor = 1.0f32;
    let mut iterations = 0;

    while iterations < MAX_FIT_ITERATIONS {
        let (width, height) = glyph_box(font_size, metrics);
        let side = width.max(height);
        if !(side > canvas) || !side.is_finite() {
            break;
        }

        iterations += 1;
        font_size = font_size * canvas / side * factor;
        if iterations % 2 == 0 {
            factor *= 0.99;
        }
    }

    FontFit {
        font_size,
        iterations,
    }
}

/// Anything that can turn a catalog entry into a PNG on disk.
pub trait GlyphRenderer {
    /// Write `<export_dir>/<name>.png` and return its path.
    fn export(
        &self,
        name: &str,
        entry: &CatalogEntry,
        color: &IconColor,
        size: u32,
        export_dir: &Path,
    ) -> Result<PathBuf>;
}

/// Draws icon glyphs as transparent, centered square images.
#[derive(Debug, Clone, Default)]
pub struct GlyphRasterizer {
    scale: GlyphScale,
}

impl GlyphRasterizer {
    /// Create a rasterizer using [`GlyphScale::Auto`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how the font size is chosen.
    pub fn with_scale(mut self, scale: GlyphScale) -> Self {
        self.scale = scale;
        self
    }

    /// The configured scale.
    pub fn scale(&self) -> GlyphScale {
        self.scale
    }

    /// Render `character` as a `size`×`size` image in `color`.
    pub fn render(
        &self,
        font: &IconFont,
        character: char,
        size: u32,
        color: &IconColor,
    ) -> Result<RgbaImage> {
        if size == 0 {
            return Err(Error::invalid_value("size", "must be positive"));
        }

        let canvas = size.max(MIN_CANVAS);
        let metrics = font.glyph_metrics(character)?;

        let font_size = match self.scale {
            GlyphScale::Auto => fit_font_size(canvas as f32, &metrics).font_size,
            GlyphScale::Fixed(factor) => {
                if !(factor.is_finite() && factor > 0.0) {
                    return Err(Error::invalid_value("scale", format!("{factor} is not positive")));
                }
                canvas as f32 * factor
            }
        };
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(Error::invalid_value(
                "font size",
                format!("U+{:04X} has unusable metrics", u32::from(character)),
            ));
        }

        let mask = draw_mask(font, &metrics, font_size, canvas)?;
        let [r, g, b] = color.rgb();
        let colored = RgbaImage::from_fn(canvas, canvas, |x, y| {
            let alpha = mask.pixel(x, y).map_or(0, |p| p.alpha());
            Rgba([r, g, b, alpha])
        });

        let centered = recenter(&colored);

        Ok(if canvas == size {
            centered
        } else {
            imageops::resize(&centered, size, size, FilterType::Lanczos3)
        })
    }

    /// Render a glyph and save it as `<export_dir>/<file_name>`.
    ///
    /// The directory is created if needed.
    pub fn export_to(
        &self,
        font: &IconFont,
        character: char,
        size: u32,
        color: &IconColor,
        export_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf> {
        let image = self.render(font, character, size, color)?;

        std::fs::create_dir_all(export_dir).map_err(|e| Error::io(export_dir, e))?;
        let path = export_dir.join(file_name);
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| Error::image(&path, e))?;

        tracing::debug!("rendered U+{:04X} to {}", u32::from(character), path.display());
        Ok(path)
    }
}

impl GlyphRenderer for GlyphRasterizer {
    fn export(
        &self,
        name: &str,
        entry: &CatalogEntry,
        color: &IconColor,
        size: u32,
        export_dir: &Path,
    ) -> Result<PathBuf> {
        self.export_to(
            &entry.font,
            entry.character,
            size,
            color,
            export_dir,
            &format!("{name}.png"),
        )
    }
}

/// Fill the glyph outline, centered on its ink box, into a coverage pixmap.
fn draw_mask(
    font: &IconFont,
    metrics: &GlyphMetrics,
    font_size: f32,
    canvas: u32,
) -> Result<tiny_skia::Pixmap> {
    let mut pixmap = tiny_skia::Pixmap::new(canvas, canvas)
        .ok_or_else(|| Error::invalid_value("size", format!("cannot allocate {canvas}px canvas")))?;

    let face = font.face()?;
    let mut builder = OutlineBuilder::default();
    if face.outline_glyph(metrics.glyph_id, &mut builder).is_none() {
        return Ok(pixmap);
    }
    let (Some(path), Some((x_min, _, _, y_max))) = (builder.0.finish(), metrics.bounds) else {
        return Ok(pixmap);
    };

    let scale = font_size / metrics.units_per_em;
    let canvas = canvas as f32;
    let tx = (canvas - metrics.ink_width() * scale) / 2.0 - x_min * scale;
    let ty = (canvas - metrics.ink_height() * scale) / 2.0 + y_max * scale;
    // Font units are y-up.
    let transform = tiny_skia::Transform::from_row(scale, 0.0, 0.0, -scale, tx, ty);

    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;

    pixmap.fill_path(&path, &paint, tiny_skia::FillRule::Winding, transform, None);
    Ok(pixmap)
}

/// Crop to the non-transparent pixels and paste back centered.
fn recenter(image: &RgbaImage) -> RgbaImage {
    let Some((x0, y0, x1, y1)) = alpha_bounds(image) else {
        return image.clone();
    };
    let (width, height) = (x1 - x0 + 1, y1 - y0 + 1);
    let ink = imageops::crop_imm(image, x0, y0, width, height).to_image();

    let mut out = RgbaImage::new(image.width(), image.height());
    imageops::replace(
        &mut out,
        &ink,
        i64::from((image.width() - width) / 2),
        i64::from((image.height() - height) / 2),
    );
    out
}

/// Inclusive bounds of pixels with non-zero alpha.
fn alpha_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

/// Collects a `ttf-parser` outline into a `tiny-skia` path in font units.
#[derive(Default)]
struct OutlineBuilder(tiny_skia::PathBuilder);

impl ttf_parser::OutlineBuilder for OutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}
