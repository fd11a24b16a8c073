//! Icon font loading and character-map queries.
//!
//! An [`IconFont`] owns the raw font bytes and re-parses the table directory
//! on demand with `ttf-parser`, which is cheap and keeps the handle `'static`
//! so it can be shared by every catalog entry of a collection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ttf_parser::{Face, GlyphId};

use crate::{Error, Result};

/// A loaded TrueType/OpenType icon font.
#[derive(Clone)]
pub struct IconFont {
    /// Where the font came from (used for diagnostics).
    path: PathBuf,
    /// Raw font file contents.
    data: Arc<Vec<u8>>,
}

/// Scale-independent metrics for one glyph, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Glyph index in the font.
    pub glyph_id: GlyphId,
    /// Horizontal advance.
    pub advance: f32,
    /// Ink bounding box `(x_min, y_min, x_max, y_max)`, if the glyph has an outline.
    pub bounds: Option<(f32, f32, f32, f32)>,
    /// Units per em of the font.
    pub units_per_em: f32,
}

impl GlyphMetrics {
    /// Width of the ink box in font units.
    pub fn ink_width(&self) -> f32 {
        self.bounds.map_or(0.0, |(x0, _, x1, _)| x1 - x0)
    }

    /// Height of the ink box in font units.
    pub fn ink_height(&self) -> f32 {
        self.bounds.map_or(0.0, |(_, y0, _, y1)| y1 - y0)
    }
}

impl IconFont {
    /// Load a font file and check that it parses.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::from_bytes(path, data)
    }

    /// Wrap font bytes, validating them up front.
    ///
    /// `path` only labels the font in errors and logs.
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self> {
        let path = path.into();
        Face::parse(&data, 0).map_err(|e| Error::font_parse(&path, e.to_string()))?;
        Ok(Self {
            path,
            data: Arc::new(data),
        })
    }

    /// The font's source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the face.
    pub fn face(&self) -> Result<Face<'_>> {
        Face::parse(&self.data, 0).map_err(|e| Error::font_parse(&self.path, e.to_string()))
    }

    /// Whether any Unicode cmap subtable maps `character`.
    ///
    /// Non-Unicode subtables (symbol or legacy Mac encodings) are ignored, so
    /// a glyph reachable only through them does not count as present.
    pub fn has_unicode_char(&self, character: char) -> bool {
        let Ok(face) = self.face() else {
            return false;
        };
        let Some(cmap) = face.tables().cmap else {
            return false;
        };
        cmap.subtables
            .into_iter()
            .filter(|subtable| subtable.is_unicode())
            .any(|subtable| subtable.glyph_index(u32::from(character)).is_some())
    }

    /// Look up metrics for the glyph mapped to `character`.
    pub fn glyph_metrics(&self, character: char) -> Result<GlyphMetrics> {
        let face = self.face()?;
        let glyph_id = face.glyph_index(character).ok_or_else(|| Error::MissingGlyph {
            path: self.path.clone(),
            code_point: u32::from(character),
        })?;
        let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
        let bounds = face.glyph_bounding_box(glyph_id).map(|rect| {
            (
                f32::from(rect.x_min),
                f32::from(rect.y_min),
                f32::from(rect.x_max),
                f32::from(rect.y_max),
            )
        });

        Ok(GlyphMetrics {
            glyph_id,
            advance: f32::from(advance),
            bounds,
            units_per_em: f32::from(face.units_per_em()),
        })
    }
}

impl std::fmt::Debug for IconFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconFont")
            .field("path", &self.path)
            .field("bytes", &self.data.len())
            .finish()
    }
}
