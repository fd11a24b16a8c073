//! Icon fonts, glyph rasterization and the rendered-image cache for latex-tip.
//!
//! This crate turns symbolic icon names such as `fa-comments` into PNG files
//! on disk:
//!
//! - **Stylesheets**: [`StylesheetIndex`] maps icon class names to code points
//! - **Catalog**: [`IconCatalog`] merges the core and user-registered collections
//! - **Rasterizer**: [`GlyphRasterizer`] draws a glyph as a cropped, centered, transparent PNG
//! - **Cache**: [`ImageCache`] renders each (color, name) pair once and reuses the file
//!
//! # Example
//!
//! ```ignore
//! use latex_tip_icons::prelude::*;
//!
//! let mut diagnostics = Diagnostics::new();
//! let catalog = IconCatalog::load(&data_dir, &mut diagnostics)?;
//! let mut cache = ImageCache::open(CacheConfig::default(), GlyphRasterizer::new());
//!
//! let entry = catalog.resolve("fa-comments").unwrap();
//! let path = cache.get_or_render("fa-comments", entry, &IconColor::black())?;
//! ```

pub mod cache;
pub mod catalog;
pub mod collection;
pub mod color;
pub mod font;
pub mod raster;
pub mod stylesheet;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

mod diagnostics;
mod error;

pub use cache::{CacheConfig, CacheKey, CacheLayout, CacheStats, ImageCache};
pub use catalog::{CatalogEntry, CollectionOrigin, IconCatalog};
pub use collection::{CORE_COLLECTION, CollectionRegistry, CollectionSpec};
pub use color::IconColor;
pub use diagnostics::{Diagnostics, Resolved, Warning};
pub use error::{Error, Result};
pub use font::IconFont;
pub use raster::{GlyphRasterizer, GlyphRenderer, GlyphScale};
pub use stylesheet::StylesheetIndex;

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::cache::{CacheConfig, CacheLayout, ImageCache};
    pub use crate::catalog::{CatalogEntry, IconCatalog};
    pub use crate::collection::{CollectionRegistry, CollectionSpec};
    pub use crate::color::IconColor;
    pub use crate::raster::{GlyphRasterizer, GlyphRenderer, GlyphScale};
    pub use crate::{Diagnostics, Resolved, Warning};
}
