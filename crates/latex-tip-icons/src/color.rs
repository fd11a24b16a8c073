//! Named icon colors.
//!
//! Colors are CSS named colors (`black`, `darkorange`, ...) matched
//! case-insensitively against the table shipped with `cssparser`. The
//! lower-cased name doubles as the cache directory for images in that color.

use crate::Diagnostics;

/// A resolved fill color for a glyph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconColor {
    name: String,
    rgb: [u8; 3],
}

impl IconColor {
    /// Look up a named color, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let (r, g, b) = cssparser::color::parse_named_color(&name).ok()?;
        Some(Self { name, rgb: [r, g, b] })
    }

    /// Look up a named color, falling back to black with a warning.
    pub fn resolve(name: &str, diagnostics: &mut Diagnostics) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            diagnostics.warn(format!("Bad color name: {name}"));
            Self::black()
        })
    }

    /// The default color.
    pub fn black() -> Self {
        Self {
            name: "black".to_string(),
            rgb: [0, 0, 0],
        }
    }

    /// Normalized (lower-case) color name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }
}

impl Default for IconColor {
    fn default() -> Self {
        Self::black()
    }
}

impl std::fmt::Display for IconColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
