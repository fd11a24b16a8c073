//! Per-document tip state.
//!
//! A [`TipSession`] is created once per document transform. It owns the icon
//! catalog, the image cache and the compiled class rules, and is dropped when
//! the document is done.
//!
//! ```ignore
//! let config = TipConfig::from_env()?;
//! let (mut session, warnings) =
//!     TipSession::prepare(&config, OutputFormat::Latex, metadata.get(METADATA_KEY))?.into_parts();
//!
//! for element in document.elements_mut() {
//!     if let Some(annotation) = session.annotate(&element.describe()).value {
//!         element.splice(annotation);
//!     }
//! }
//! header_includes.extend(session.header_includes());
//! ```

use std::ffi::OsString;
use std::path::PathBuf;

use latex_tip_icons::collection::default_data_dir;
use latex_tip_icons::{
    CacheConfig, Diagnostics, GlyphRasterizer, GlyphRenderer, IconCatalog, ImageCache, Resolved,
};
use serde_json::Value;

use crate::element::{Annotation, TipElement};
use crate::latex;
use crate::resolver::TipResolver;
use crate::rule::{TipDefinitions, TipRule, class_rules};
use crate::{Error, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LATEX_TIP_DATA_DIR";

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "LATEX_TIP_CACHE_DIR";

/// Target format of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Latex,
    Beamer,
    Other(String),
}

impl OutputFormat {
    /// Parse a writer name such as `latex` or `html`.
    pub fn parse(name: &str) -> Self {
        match name {
            "latex" => Self::Latex,
            "beamer" => Self::Beamer,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether tips are produced for this format.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Latex | Self::Beamer)
    }
}

/// Where collections live and how images are cached.
#[derive(Debug, Clone)]
pub struct TipConfig {
    /// Directory holding the collections and `config.toml`.
    pub data_dir: PathBuf,
    /// Image cache settings.
    pub cache: CacheConfig,
}

impl TipConfig {
    /// Configuration with the default cache settings.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: CacheConfig::default(),
        }
    }

    /// Configuration from the per-user directories, overridden by
    /// `LATEX_TIP_DATA_DIR` and `LATEX_TIP_CACHE_DIR`.
    pub fn from_env() -> Result<Self> {
        Self::from_overrides(
            std::env::var_os(DATA_DIR_ENV),
            std::env::var_os(CACHE_DIR_ENV),
        )
    }

    fn from_overrides(data_dir: Option<OsString>, cache_dir: Option<OsString>) -> Result<Self> {
        let data_dir = data_dir
            .map(PathBuf::from)
            .or_else(default_data_dir)
            .ok_or(Error::NoDataDir {
                variable: DATA_DIR_ENV,
            })?;

        let mut config = Self::new(data_dir);
        if let Some(cache_dir) = cache_dir {
            config.cache = config.cache.with_cache_dir(cache_dir);
        }
        Ok(config)
    }

    /// Replace the cache settings.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

/// Catalog, cache and class rules for one document.
pub struct TipSession<R: GlyphRenderer = GlyphRasterizer> {
    format: OutputFormat,
    catalog: IconCatalog,
    cache: ImageCache<R>,
    definitions: TipDefinitions,
}

impl TipSession<GlyphRasterizer> {
    /// Load the catalog, open the cache and compile the class rules found in
    /// the `pandoc-latex-tip` metadata value.
    pub fn prepare(
        config: &TipConfig,
        format: OutputFormat,
        metadata: Option<&Value>,
    ) -> Result<Resolved<Self>> {
        Self::prepare_with(config, GlyphRasterizer::new(), format, metadata)
    }
}

impl<R: GlyphRenderer> TipSession<R> {
    /// Like [`TipSession::prepare`] with a custom renderer.
    pub fn prepare_with(
        config: &TipConfig,
        renderer: R,
        format: OutputFormat,
        metadata: Option<&Value>,
    ) -> Result<Resolved<Self>> {
        let mut diagnostics = Diagnostics::new();
        let catalog = IconCatalog::load(&config.data_dir, &mut diagnostics)?;
        let cache = ImageCache::open(config.cache.clone(), renderer)?;

        let mut session = Self {
            format,
            catalog,
            cache,
            definitions: TipDefinitions::new(),
        };

        if let Some(metadata) = metadata
            && session.format.is_supported()
        {
            for (classes, rule) in class_rules(metadata, &mut diagnostics) {
                let (latex, warnings) = session.resolver().resolve(&rule).into_parts();
                diagnostics.extend(warnings);
                if let Some(latex) = latex {
                    session.definitions.push(classes, latex);
                }
            }
        }

        tracing::debug!(
            "tip session: {} icons, {} class rules",
            session.catalog.len(),
            session.definitions.len()
        );
        Ok(Resolved::new(session, diagnostics))
    }

    /// Compute the tip for one element, if any.
    ///
    /// `latex-tip-icon`/`latex-tip-image` attributes win over class rules.
    /// Nothing is produced for formats other than LaTeX and Beamer, and a
    /// div whose leading block cannot take a tip only gets a warning.
    pub fn annotate(&mut self, element: &TipElement) -> Resolved<Option<Annotation>> {
        let mut diagnostics = Diagnostics::new();
        if !self.format.is_supported() {
            return Resolved::new(None, diagnostics);
        }

        let latex = match TipRule::from_attributes(&element.attributes, &mut diagnostics) {
            Some(rule) => {
                let (latex, warnings) = self.resolver().resolve(&rule).into_parts();
                diagnostics.extend(warnings);
                latex
            }
            None => self
                .definitions
                .matching(element.classes.iter().map(String::as_str))
                .map(str::to_string),
        };

        let annotation = match (latex, element.kind.placement()) {
            (Some(latex), Some(placement)) => Some(Annotation { placement, latex }),
            (Some(_), None) => {
                diagnostics.warn("Bad usage: no place for a tip in this div");
                None
            }
            (None, _) => None,
        };
        Resolved::new(annotation, diagnostics)
    }

    /// Header lines to add to the document (empty for unsupported formats).
    pub fn header_includes(&self) -> Vec<String> {
        if self.format.is_supported() {
            latex::header_includes()
        } else {
            vec![]
        }
    }

    /// The icon catalog.
    pub fn catalog(&self) -> &IconCatalog {
        &self.catalog
    }

    /// The image cache.
    pub fn cache(&self) -> &ImageCache<R> {
        &self.cache
    }

    /// Compiled class rules.
    pub fn definitions(&self) -> &TipDefinitions {
        &self.definitions
    }

    fn resolver(&mut self) -> TipResolver<'_, R> {
        TipResolver::new(&self.catalog, &mut self.cache)
    }
}
