//! Tip rules from document metadata and element attributes.
//!
//! Rules come from two places. The `pandoc-latex-tip` metadata list binds a
//! rule to every element carrying a set of classes:
//!
//! ```yaml
//! pandoc-latex-tip:
//!   - classes: [warning]
//!     icons: [fa-exclamation-triangle, {name: fa-user, color: red}]
//!     position: outer
//!     size: 24
//! ```
//!
//! A single element can also carry its own rule as `latex-tip-*` attributes,
//! which take precedence over class rules.

use std::collections::{BTreeMap, BTreeSet};

use latex_tip_icons::Diagnostics;
use serde_json::{Map, Value};

use crate::icon_ref::{IconRef, scalar};
use crate::position::Position;
use crate::size::TipSize;

/// Metadata key holding the class rules.
pub const METADATA_KEY: &str = "pandoc-latex-tip";

/// Icon used when a rule names neither icons nor an image.
pub const DEFAULT_ICON: &str = "fa-exclamation-circle";

/// Default icon color.
pub const DEFAULT_COLOR: &str = "black";

/// Field names of a rule in one of its two sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleKeys {
    pub icon: &'static str,
    pub image: &'static str,
    pub position: &'static str,
    pub size: &'static str,
    pub color: &'static str,
    pub link: &'static str,
}

impl RuleKeys {
    /// Keys inside a `pandoc-latex-tip` metadata entry.
    pub const METADATA: Self = Self {
        icon: "icons",
        image: "image",
        position: "position",
        size: "size",
        color: "color",
        link: "link",
    };

    /// Element attribute names.
    pub const ATTRIBUTES: Self = Self {
        icon: "latex-tip-icon",
        image: "latex-tip-image",
        position: "latex-tip-position",
        size: "latex-tip-size",
        color: "latex-tip-color",
        link: "latex-tip-link",
    };
}

/// A parsed tip rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipRule {
    /// Requested icons, in output order.
    pub icons: Vec<IconRef>,
    /// Image used instead of a single icon name the catalog does not know.
    pub fallback_image: Option<String>,
    /// Color for icons that do not set their own.
    pub color: String,
    /// Link for icons that do not set their own.
    pub link: Option<String>,
    pub size: TipSize,
    pub position: Position,
}

impl TipRule {
    /// Parse a rule from a map, reading fields named by `keys`.
    ///
    /// Never fails: malformed parts are replaced by defaults or dropped, with
    /// warnings.
    pub fn from_map(map: &Map<String, Value>, keys: &RuleKeys, diagnostics: &mut Diagnostics) -> Self {
        let text = |key: &str| map.get(key).and_then(scalar);

        let link = text(keys.link).filter(|link| !link.is_empty());
        let color = text(keys.color).unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let size = TipSize::parse(&text(keys.size).unwrap_or_else(|| "18".to_string()), diagnostics);
        let position = Position::parse(&text(keys.position).unwrap_or_default(), diagnostics);
        let image = text(keys.image).filter(|path| !path.is_empty());

        let mut fallback_image = None;
        let icons = match map.get(keys.icon) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| IconRef::from_value(item, diagnostics))
                .collect(),
            Some(value) => match scalar(value) {
                Some(name) => {
                    fallback_image = image;
                    vec![IconRef::Literal(name)]
                }
                None => IconRef::from_value(value, diagnostics).into_iter().collect(),
            },
            None => match image {
                Some(path) => vec![IconRef::Image { path, link: None }],
                None => vec![IconRef::Literal(DEFAULT_ICON.to_string())],
            },
        };

        Self {
            icons,
            fallback_image,
            color,
            link,
            size,
            position,
        }
    }

    /// Parse a rule from `latex-tip-*` element attributes.
    ///
    /// Returns `None` when neither `latex-tip-icon` nor `latex-tip-image` is
    /// present, so class rules apply instead.
    pub fn from_attributes(
        attributes: &BTreeMap<String, String>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Self> {
        let keys = RuleKeys::ATTRIBUTES;
        if !attributes.contains_key(keys.icon) && !attributes.contains_key(keys.image) {
            return None;
        }

        let map: Map<String, Value> = attributes
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        Some(Self::from_map(&map, &keys, diagnostics))
    }
}

/// A class rule and its precompiled LaTeX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipDefinition {
    /// Classes an element must all carry.
    pub classes: BTreeSet<String>,
    /// LaTeX inserted for matching elements.
    pub latex: String,
}

/// Class rules in metadata order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TipDefinitions {
    definitions: Vec<TipDefinition>,
}

impl TipDefinitions {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition.
    pub fn push(&mut self, classes: BTreeSet<String>, latex: String) {
        self.definitions.push(TipDefinition { classes, latex });
    }

    /// LaTeX of the first definition whose classes are all in `classes`.
    pub fn matching<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> Option<&str> {
        let classes: BTreeSet<&str> = classes.into_iter().collect();
        self.definitions
            .iter()
            .find(|definition| definition.classes.iter().all(|c| classes.contains(c.as_str())))
            .map(|definition| definition.latex.as_str())
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether there are no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Extract (classes, rule) pairs from the `pandoc-latex-tip` metadata value.
///
/// Entries without a non-empty `classes` list are skipped with a warning.
pub fn class_rules(metadata: &Value, diagnostics: &mut Diagnostics) -> Vec<(BTreeSet<String>, TipRule)> {
    let Value::Array(entries) = metadata else {
        diagnostics.warn(format!("{METADATA_KEY} must be a list"));
        return vec![];
    };

    let mut rules = Vec::with_capacity(entries.len());
    for entry in entries {
        let classes = match entry {
            Value::Object(map) => match map.get("classes") {
                Some(Value::Array(classes)) => Some((
                    map,
                    classes
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect::<BTreeSet<_>>(),
                )),
                _ => None,
            },
            _ => None,
        };

        match classes {
            Some((map, classes)) if !classes.is_empty() => {
                let rule = TipRule::from_map(map, &RuleKeys::METADATA, diagnostics);
                rules.push((classes, rule));
            }
            _ => diagnostics.warn(format!("{METADATA_KEY} entry without classes ignored")),
        }
    }
    rules
}
