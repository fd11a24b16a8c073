//! On-disk cache of rendered icon images.
//!
//! Every (color, name) pair is rendered once at [`BASE_SIZE`] and the PNG is
//! reused from then on; LaTeX scales it to the display size. Files are never
//! invalidated, resized or deleted here.
//!
//! # Example
//!
//! ```ignore
//! use latex_tip_icons::{CacheConfig, CacheLayout, GlyphRasterizer, ImageCache};
//!
//! let config = CacheConfig::default()
//!     .with_cache_dir("/tmp/icons")
//!     .with_layout(CacheLayout::CollectionQualified);
//!
//! let mut cache = ImageCache::open(config, GlyphRasterizer::new())?;
//! let path = cache.get_or_render("fa-comments", entry, &color)?;
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::catalog::CatalogEntry;
use crate::color::IconColor;
use crate::raster::{BASE_SIZE, GlyphRasterizer, GlyphRenderer};
use crate::{Error, Result};

/// How cached files are arranged below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheLayout {
    /// `<root>/<color>/<name>.png`
    #[default]
    Flat,
    /// `<root>/<collection>/<color>/<name>.png`
    CollectionQualified,
}

/// Configuration for the image cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Preferred root directory.
    /// Default: the per-user cache directory.
    pub cache_dir: Option<PathBuf>,
    /// File arrangement.
    /// Default: [`CacheLayout::Flat`].
    pub layout: CacheLayout,
    /// Pixel size of rendered images.
    /// Default: 512.
    pub base_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            layout: CacheLayout::default(),
            base_size: BASE_SIZE,
        }
    }
}

impl CacheConfig {
    /// Set the cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(path.into());
        self
    }

    /// Set the file layout.
    #[must_use]
    pub fn with_layout(mut self, layout: CacheLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the rendered image size.
    #[must_use]
    pub fn with_base_size(mut self, size: u32) -> Self {
        self.base_size = size;
        self
    }
}

/// Per-user cache directory for rendered icons.
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "latex-tip").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Identity of a cached image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Collection the icon came from.
    pub collection: String,
    /// Lower-case color name.
    pub color: String,
    /// Icon name.
    pub name: String,
}

impl CacheKey {
    /// Key for `name` from `entry` in `color`.
    pub fn new(name: &str, entry: &CatalogEntry, color: &IconColor) -> Self {
        Self {
            collection: entry.collection.clone(),
            color: color.name().to_string(),
            name: name.to_string(),
        }
    }

    /// Path of the image relative to the cache root.
    pub fn relative_path(&self, layout: CacheLayout) -> PathBuf {
        let file = format!("{}.png", self.name);
        match layout {
            CacheLayout::Flat => [self.color.as_str(), file.as_str()].iter().collect(),
            CacheLayout::CollectionQualified => {
                [self.collection.as_str(), self.color.as_str(), file.as_str()].iter().collect()
            }
        }
    }
}

/// Cache hit/render counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served from an existing file.
    pub hits: u64,
    /// Requests that invoked the renderer.
    pub renders: u64,
}

/// Rendered icon images, created lazily under a fixed root.
pub struct ImageCache<R: GlyphRenderer = GlyphRasterizer> {
    root: PathBuf,
    layout: CacheLayout,
    base_size: u32,
    renderer: R,
    stats: CacheStats,
}

impl<R: GlyphRenderer> ImageCache<R> {
    /// Open the cache.
    ///
    /// The configured directory is created and probed for writing. If that
    /// fails, a fresh temporary directory is used for the lifetime of this
    /// cache instead. It is kept on disk afterwards so generated documents
    /// can still reference the images.
    pub fn open(config: CacheConfig, renderer: R) -> Result<Self> {
        let root = choose_root(config.cache_dir.as_deref())?;
        tracing::debug!("icon cache root: {}", root.display());

        Ok(Self {
            root,
            layout: config.layout,
            base_size: config.base_size,
            renderer,
            stats: CacheStats::default(),
        })
    }

    /// The directory holding all cached images.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the image for `key` lives (whether or not it exists yet).
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.relative_path(self.layout))
    }

    /// Return the image for `name`, rendering it first if needed.
    pub fn get_or_render(
        &mut self,
        name: &str,
        entry: &CatalogEntry,
        color: &IconColor,
    ) -> Result<PathBuf> {
        let path = self.path_for(&CacheKey::new(name, entry, color));

        if path.is_file() {
            self.stats.hits += 1;
            return Ok(path);
        }

        let export_dir = path.parent().unwrap_or(&self.root).to_path_buf();
        let written = self
            .renderer
            .export(name, entry, color, self.base_size, &export_dir)?;
        self.stats.renders += 1;
        Ok(written)
    }

    /// Hit/render counters since the cache was opened.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The renderer used on misses.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: GlyphRenderer> std::fmt::Debug for ImageCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("root", &self.root)
            .field("layout", &self.layout)
            .field("base_size", &self.base_size)
            .field("stats", &self.stats)
            .finish()
    }
}

fn choose_root(preferred: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = preferred {
        match probe_writable(dir) {
            Ok(()) => return Ok(dir.to_path_buf()),
            Err(e) => tracing::warn!(
                "cache directory {} is not writable ({}), using a temporary directory",
                dir.display(),
                e
            ),
        }
    }

    let temp = tempfile::Builder::new()
        .prefix("latex_tip_")
        .suffix("_cache")
        .tempdir()
        .map_err(|e| Error::io(std::env::temp_dir(), e))?;
    Ok(temp.keep())
}

fn probe_writable(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    tempfile::NamedTempFile::new_in(dir)?;
    Ok(())
}
