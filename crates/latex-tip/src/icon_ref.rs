//! Icon entries of a tip rule.

use latex_tip_icons::Diagnostics;
use serde_json::Value;

/// One requested icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    /// A catalog icon given as a map, possibly overriding color and link.
    Named {
        name: String,
        color: Option<String>,
        link: Option<String>,
    },
    /// A catalog icon given as a bare name; uses the rule's color and link.
    Literal(String),
    /// An external image file, included as is.
    Image { path: String, link: Option<String> },
}

impl IconRef {
    /// Parse one entry of an icon list.
    ///
    /// Returns `None`, with a warning, for entries that are neither a name
    /// nor a map with an `image` or `name` key.
    pub fn from_value(value: &Value, diagnostics: &mut Diagnostics) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self::Literal(name.clone())),
            Value::Object(map) => {
                let link = map.get("link").and_then(scalar);
                if let Some(path) = map.get("image").and_then(scalar) {
                    return Some(Self::Image { path, link });
                }
                match map.get("name").and_then(scalar) {
                    Some(name) => Some(Self::Named {
                        name,
                        color: map.get("color").and_then(scalar),
                        link,
                    }),
                    None => {
                        diagnostics.warn("Bad formed icon");
                        None
                    }
                }
            }
            _ => {
                diagnostics.warn("Bad formed icon");
                None
            }
        }
    }

    /// The catalog name, for named and literal icons.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } | Self::Literal(name) => Some(name.as_str()),
            Self::Image { .. } => None,
        }
    }
}

/// Read a scalar metadata value as text.
///
/// Metadata numbers and booleans are accepted so `size: 36` works like
/// `size: "36"`.
pub(crate) fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> (Option<IconRef>, usize) {
        let mut diagnostics = Diagnostics::new();
        let icon = IconRef::from_value(&value, &mut diagnostics);
        (icon, diagnostics.len())
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(
            parse(json!("fa-user")),
            (Some(IconRef::Literal("fa-user".into())), 0)
        );
    }

    #[test]
    fn test_named_with_overrides() {
        let (icon, warnings) = parse(json!({"name": "fa-user", "color": "Red"}));

        assert_eq!(warnings, 0);
        assert_eq!(
            icon,
            Some(IconRef::Named {
                name: "fa-user".into(),
                color: Some("Red".into()),
                link: None,
            })
        );
    }

    #[test]
    fn test_image_wins_over_name() {
        let (icon, _) = parse(json!({"image": "logo.pdf", "name": "fa-user", "link": "https://x"}));

        assert_eq!(
            icon,
            Some(IconRef::Image {
                path: "logo.pdf".into(),
                link: Some("https://x".into()),
            })
        );
        assert_eq!(icon.unwrap().name(), None);
    }

    #[test]
    fn test_malformed_entries_warn() {
        assert_eq!(parse(json!({"color": "red"})), (None, 1));
        assert_eq!(parse(json!([1, 2])), (None, 1));
        assert_eq!(parse(json!(null)), (None, 1));
    }

    #[test]
    fn test_scalar() {
        assert_eq!(scalar(&json!(36)), Some("36".to_string()));
        assert_eq!(scalar(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar(&json!({})), None);
    }
}
