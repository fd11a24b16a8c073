//! Error types for the tip filter.

use std::path::PathBuf;

/// Result type alias for tip operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a document transform.
///
/// Bad rules, unknown icons and invalid sizes are not errors; they are
/// returned as warnings next to the output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Catalog, rasterizer or cache failure.
    #[error(transparent)]
    Icons(#[from] latex_tip_icons::Error),

    /// No data directory could be determined.
    #[error("No data directory available; set {variable}")]
    NoDataDir { variable: &'static str },

    /// File I/O error.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
