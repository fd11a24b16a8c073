//! Merged icon name lookup across collections.

use std::collections::BTreeMap;
use std::path::Path;

use crate::collection::{CollectionRegistry, CollectionSpec, core_collections};
use crate::font::IconFont;
use crate::stylesheet::StylesheetIndex;
use crate::{Diagnostics, Error, Result};

/// Where a collection was registered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOrigin {
    /// Built into the tool; an unreadable font is fatal.
    Core,
    /// Listed in the user registry; problems only warn.
    User,
}

/// What a catalog name resolves to.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Font holding the glyph (shared by all entries of a collection).
    pub font: IconFont,
    /// Collection directory name.
    pub collection: String,
    /// Code point of the glyph.
    pub character: char,
}

/// Icon name → glyph lookup built from every collection.
///
/// Collections are merged in registration order and the first collection to
/// define a name keeps it; later duplicates are dropped silently.
#[derive(Debug, Clone, Default)]
pub struct IconCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl IconCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog for a data directory: the core collections first,
    /// then the entries of `<data_dir>/config.toml` in file order.
    pub fn load(data_dir: &Path, diagnostics: &mut Diagnostics) -> Result<Self> {
        let mut catalog = Self::new();

        for spec in core_collections() {
            catalog.register(&spec, data_dir, CollectionOrigin::Core, diagnostics)?;
        }

        let registry_path = CollectionRegistry::path_in(data_dir);
        match CollectionRegistry::load(&registry_path, diagnostics) {
            Ok(registry) => {
                for spec in registry.entries() {
                    catalog.register(spec, data_dir, CollectionOrigin::User, diagnostics)?;
                }
            }
            Err(e) => diagnostics.warn(e.to_string()),
        }

        tracing::debug!("icon catalog: {} icons", catalog.len());
        Ok(catalog)
    }

    /// Add one collection, returning how many new names it contributed.
    ///
    /// A missing stylesheet or font only warns. A font that exists but does
    /// not parse is an error for [`CollectionOrigin::Core`] and a warning
    /// otherwise.
    pub fn register(
        &mut self,
        spec: &CollectionSpec,
        data_dir: &Path,
        origin: CollectionOrigin,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize> {
        let css_path = spec.css_path(data_dir);
        let ttf_path = spec.ttf_path(data_dir);

        for path in [&css_path, &ttf_path] {
            if !path.is_file() {
                diagnostics.warn(format!(
                    "Collection {}: {} not found",
                    spec.collection,
                    path.display()
                ));
                return Ok(0);
            }
        }

        let font = match IconFont::from_file(&ttf_path) {
            Ok(font) => font,
            Err(e @ Error::FontParse { .. }) if origin == CollectionOrigin::Core => return Err(e),
            Err(e) => {
                diagnostics.warn(format!("Collection {}: {}", spec.collection, e));
                return Ok(0);
            }
        };

        let index = match StylesheetIndex::from_file(&css_path, &font, Some(&spec.prefix)) {
            Ok(index) => index,
            Err(e) => {
                diagnostics.warn(format!("Collection {}: {}", spec.collection, e));
                return Ok(0);
            }
        };

        let mut added = 0;
        for (name, character) in index.iter() {
            if self.entries.contains_key(name) {
                tracing::trace!("{name} already defined, ignoring {}", spec.collection);
                continue;
            }
            self.entries.insert(
                name.to_string(),
                CatalogEntry {
                    font: font.clone(),
                    collection: spec.collection.clone(),
                    character,
                },
            );
            added += 1;
        }

        tracing::debug!(
            "collection {} ({}): {} of {} icons added",
            spec.collection,
            spec.prefix,
            added,
            index.len()
        );
        Ok(added)
    }

    /// Look up an icon.
    pub fn resolve(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Whether the icon exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// All names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of icons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestFont, write_collection, write_fontawesome};

    #[test]
    fn core_collections_with_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        write_fontawesome(dir.path()).unwrap();

        let mut diagnostics = Diagnostics::new();
        let catalog = IconCatalog::load(dir.path(), &mut diagnostics).unwrap();

        assert!(diagnostics.is_empty());
        assert!(catalog.contains("fa-comments"));
        assert!(catalog.contains("far-user"));
        assert!(catalog.contains("fab-github"));
        // Not in the regular font.
        assert!(!catalog.contains("far-balance-scale"));
        // Not in the brands font.
        assert!(!catalog.contains("fab-rust"));

        for (_, entry) in catalog.iter() {
            assert!(entry.font.has_unicode_char(entry.character));
        }
    }

    #[test]
    fn names_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_fontawesome(dir.path()).unwrap();
        let catalog = IconCatalog::load(dir.path(), &mut Diagnostics::new()).unwrap();

        let names: Vec<_> = catalog.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn first_registration_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_fontawesome(dir.path()).unwrap();
        write_collection(
            dir.path(),
            "shadow",
            "shadow.css",
            ".fa-user:before { content: \"\\f007\"; }\n.fa-zzz:before { content: \"\\f008\"; }",
            "shadow.ttf",
            &TestFont::new().square('\u{f007}', 500).square('\u{f008}', 500),
        )
        .unwrap();

        let mut registry =
            CollectionRegistry::load(CollectionRegistry::path_in(dir.path()), &mut Diagnostics::new())
                .unwrap();
        registry
            .add(CollectionSpec::new("shadow", "shadow.css", "shadow.ttf", "sh-"))
            .unwrap();
        registry.save().unwrap();

        // Registered directly, bypassing the registry's prefix check.
        let mut catalog = IconCatalog::load(dir.path(), &mut Diagnostics::new()).unwrap();
        let added = catalog
            .register(
                &CollectionSpec::new("shadow", "shadow.css", "shadow.ttf", "far-"),
                dir.path(),
                CollectionOrigin::User,
                &mut Diagnostics::new(),
            )
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(catalog.resolve("far-user").unwrap().collection, "fontawesome");
        assert_eq!(catalog.resolve("far-zzz").unwrap().collection, "shadow");
        assert_eq!(catalog.resolve("sh-user").unwrap().collection, "shadow");
    }

    #[test]
    fn missing_files_only_warn() {
        let dir = tempfile::tempdir().unwrap();
        let mut diagnostics = Diagnostics::new();

        let catalog = IconCatalog::load(dir.path(), &mut diagnostics).unwrap();

        assert!(catalog.is_empty());
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn broken_core_font_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_fontawesome(dir.path()).unwrap();
        std::fs::write(dir.path().join("fontawesome/fa-solid-900.ttf"), b"garbage").unwrap();

        let err = IconCatalog::load(dir.path(), &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, Error::FontParse { .. }));
    }

    #[test]
    fn broken_user_font_warns() {
        let dir = tempfile::tempdir().unwrap();
        let collection = dir.path().join("bad");
        std::fs::create_dir_all(&collection).unwrap();
        std::fs::write(collection.join("bad.css"), ".x-a:before { content: \"a\"; }").unwrap();
        std::fs::write(collection.join("bad.ttf"), b"garbage").unwrap();

        let mut catalog = IconCatalog::new();
        let mut diagnostics = Diagnostics::new();
        let added = catalog
            .register(
                &CollectionSpec::new("bad", "bad.css", "bad.ttf", "b-"),
                dir.path(),
                CollectionOrigin::User,
                &mut diagnostics,
            )
            .unwrap();

        assert_eq!(added, 0);
        assert_eq!(diagnostics.len(), 1);
    }
}
