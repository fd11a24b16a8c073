//! Icon collection descriptors and the user collection registry.
//!
//! A collection is one stylesheet plus one font file stored under
//! `<data-dir>/<collection>/`. The core collections are built in; additional
//! ones are listed in `<data-dir>/config.toml`:
//!
//! ```toml
//! [[collection]]
//! collection = "material"
//! css = "material.css"
//! ttf = "MaterialIcons-Regular.ttf"
//! prefix = "mi-"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Diagnostics, Error, Result};

/// Name of the built-in collection directory.
pub const CORE_COLLECTION: &str = "fontawesome";

/// File name of the user registry inside the data directory.
pub const REGISTRY_FILE: &str = "config.toml";

/// One stylesheet/font pair and the name prefix its icons get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Directory name under the data directory.
    pub collection: String,
    /// Stylesheet file name inside the collection directory.
    pub css: String,
    /// Font file name inside the collection directory.
    pub ttf: String,
    /// Prefix replacing the stylesheet's common name prefix.
    pub prefix: String,
}

impl CollectionSpec {
    /// Create a collection descriptor.
    pub fn new(
        collection: impl Into<String>,
        css: impl Into<String>,
        ttf: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            css: css.into(),
            ttf: ttf.into(),
            prefix: prefix.into(),
        }
    }

    /// Path of the stylesheet below `data_dir`.
    pub fn css_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.collection).join(&self.css)
    }

    /// Path of the font below `data_dir`.
    pub fn ttf_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.collection).join(&self.ttf)
    }
}

/// The built-in collections, in lookup priority order.
pub fn core_collections() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec::new(CORE_COLLECTION, "fontawesome.css", "fa-solid-900.ttf", "fa-"),
        CollectionSpec::new(CORE_COLLECTION, "fontawesome.css", "fa-regular-400.ttf", "far-"),
        CollectionSpec::new(CORE_COLLECTION, "brands.css", "fa-brands-400.ttf", "fab-"),
    ]
}

/// Whether `prefix` belongs to a core collection.
pub fn is_core_prefix(prefix: &str) -> bool {
    core_collections().iter().any(|spec| spec.prefix == prefix)
}

/// Per-user data directory holding the collections and the registry.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "latex-tip").map(|dirs| dirs.data_dir().to_path_buf())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    collection: Vec<CollectionSpec>,
}

/// The user-editable list of additional collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionRegistry {
    path: PathBuf,
    entries: Vec<CollectionSpec>,
}

impl CollectionRegistry {
    /// Registry stored in `<data_dir>/config.toml`.
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(REGISTRY_FILE)
    }

    /// Load the registry.
    ///
    /// A missing file is an empty registry. Entries without the four string
    /// keys are skipped with a warning; a file that is not TOML at all is an
    /// error.
    pub fn load(path: impl Into<PathBuf>, diagnostics: &mut Diagnostics) -> Result<Self> {
        let path = path.into();

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    entries: vec![],
                });
            }
            Err(e) => return Err(Error::io(&path, e)),
        };

        let table: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| Error::registry(&path, e.message()))?;

        let items = match table.get("collection") {
            None => vec![],
            Some(toml::Value::Array(items)) => items.clone(),
            Some(_) => {
                return Err(Error::registry(&path, "'collection' must be an array of tables"));
            }
        };

        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item.try_into::<CollectionSpec>() {
                Ok(spec) => entries.push(spec),
                Err(e) => diagnostics.warn(format!(
                    "{}: skipping collection entry {}: {}",
                    path.display(),
                    index + 1,
                    e.message()
                )),
            }
        }

        Ok(Self { path, entries })
    }

    /// Write the registry back to its file, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        let file = RegistryFile {
            collection: self.entries.clone(),
        };
        let text = toml::to_string_pretty(&file).map_err(|e| Error::registry(&self.path, e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::write(&self.path, text).map_err(|e| Error::io(&self.path, e))
    }

    /// Register a collection.
    ///
    /// The core collection name and any prefix already in use (core prefixes
    /// included) are refused.
    pub fn add(&mut self, spec: CollectionSpec) -> Result<()> {
        if spec.collection == CORE_COLLECTION {
            return Err(Error::collection(
                &spec.collection,
                "the core collection cannot be modified",
            ));
        }
        if spec.prefix.is_empty() {
            return Err(Error::collection(&spec.collection, "prefix must not be empty"));
        }
        if is_core_prefix(&spec.prefix) || self.entries.iter().any(|e| e.prefix == spec.prefix) {
            return Err(Error::collection(
                &spec.collection,
                format!("prefix '{}' is already used", spec.prefix),
            ));
        }

        tracing::info!("registering collection {} ({})", spec.collection, spec.prefix);
        self.entries.push(spec);
        Ok(())
    }

    /// Remove every entry with `prefix`, returning how many were removed.
    pub fn remove_prefix(&mut self, prefix: &str) -> Result<usize> {
        if is_core_prefix(prefix) {
            return Err(Error::collection(
                CORE_COLLECTION,
                format!("prefix '{prefix}' belongs to the core collection"),
            ));
        }

        let before = self.entries.len();
        self.entries.retain(|e| e.prefix != prefix);
        Ok(before - self.entries.len())
    }

    /// Registered collections in file order.
    pub fn entries(&self) -> &[CollectionSpec] {
        &self.entries
    }

    /// The registry file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(prefix: &str) -> CollectionSpec {
        CollectionSpec::new("extra", "extra.css", "extra.ttf", prefix)
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut diagnostics = Diagnostics::new();
        let registry =
            CollectionRegistry::load(CollectionRegistry::path_in(dir.path()), &mut diagnostics).unwrap();

        assert!(registry.entries().is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = CollectionRegistry::path_in(&dir.path().join("nested"));
        let mut diagnostics = Diagnostics::new();

        let mut registry = CollectionRegistry::load(&path, &mut diagnostics).unwrap();
        registry.add(spec("ex-")).unwrap();
        registry.add(spec("ey-")).unwrap();
        registry.save().unwrap();

        let reloaded = CollectionRegistry::load(&path, &mut diagnostics).unwrap();
        assert_eq!(reloaded.entries(), registry.entries());
        assert_eq!(reloaded.entries()[1].prefix, "ey-");
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = CollectionRegistry::path_in(dir.path());
        std::fs::write(
            &path,
            r#"
[[collection]]
collection = "broken"
css = "broken.css"

[[collection]]
collection = "good"
css = "good.css"
ttf = "good.ttf"
prefix = "g-"
"#,
        )
        .unwrap();

        let mut diagnostics = Diagnostics::new();
        let registry = CollectionRegistry::load(&path, &mut diagnostics).unwrap();

        assert_eq!(registry.entries().len(), 1);
        assert_eq!(registry.entries()[0].collection, "good");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = CollectionRegistry::path_in(dir.path());
        std::fs::write(&path, "[[collection\n").unwrap();

        let err = CollectionRegistry::load(&path, &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, Error::Registry { .. }));
    }

    #[test]
    fn add_refuses_core_and_duplicates() {
        let mut registry = CollectionRegistry::default();

        let core = CollectionSpec::new(CORE_COLLECTION, "x.css", "x.ttf", "x-");
        assert!(registry.add(core).is_err());
        assert!(registry.add(spec("far-")).is_err());

        registry.add(spec("ex-")).unwrap();
        assert!(registry.add(spec("ex-")).is_err());
        assert_eq!(registry.entries().len(), 1);
    }

    #[test]
    fn remove_by_prefix() {
        let mut registry = CollectionRegistry::default();
        registry.add(spec("ex-")).unwrap();
        registry.add(spec("ey-")).unwrap();

        assert!(registry.remove_prefix("fab-").is_err());
        assert_eq!(registry.remove_prefix("ex-").unwrap(), 1);
        assert_eq!(registry.remove_prefix("ex-").unwrap(), 0);
        assert_eq!(registry.entries().len(), 1);
    }

    #[test]
    fn collection_paths() {
        let spec = core_collections().remove(1);
        let root = Path::new("/data");

        assert_eq!(spec.css_path(root), Path::new("/data/fontawesome/fontawesome.css"));
        assert_eq!(spec.ttf_path(root), Path::new("/data/fontawesome/fa-regular-400.ttf"));
    }
}
