//! Error types for the icon subsystem.

use std::path::PathBuf;

/// Result type alias for icon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the catalog or rendering glyphs.
///
/// Problems with individual icon requests never show up here; those are
/// reported as [`Warning`](crate::Warning)s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The font binary could not be parsed.
    #[error("Failed to parse font '{path}': {message}")]
    FontParse { path: PathBuf, message: String },

    /// The glyph is not mapped by the font.
    #[error("Font '{path}' has no glyph for U+{code_point:04X}")]
    MissingGlyph { path: PathBuf, code_point: u32 },

    /// Image encoding or processing error.
    #[error("Failed to write image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The collection registry could not be read or written.
    #[error("Invalid collection registry '{path}': {message}")]
    Registry { path: PathBuf, message: String },

    /// A registry change was refused.
    #[error("Collection '{collection}': {message}")]
    Collection { collection: String, message: String },

    /// Invalid raster parameters.
    #[error("Invalid value for '{parameter}': {message}")]
    InvalidValue { parameter: String, message: String },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a font parse error.
    pub fn font_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::FontParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an image error.
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }

    /// Create a registry error.
    pub fn registry(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Registry {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a refused-collection error.
    pub fn collection(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collection {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create a value error.
    pub fn invalid_value(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Whether the error means the file is simply not there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
