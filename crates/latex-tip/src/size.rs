//! LaTeX lengths for icon sizes.

use std::fmt;
use std::sync::LazyLock;

use latex_tip_icons::Diagnostics;
use regex::Regex;

static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<length>\d+(\.\d*)?)(?P<unit>pt|mm|cm|in|ex|em|mu|sp)?$")
        .expect("length pattern is valid")
});

/// Displayed height of each icon, as a LaTeX length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipSize(String);

impl TipSize {
    /// Parse a size value.
    ///
    /// Accepts a positive number with an optional unit; a bare number is in
    /// points. Anything else becomes `18pt` with a warning.
    pub fn parse(value: &str, diagnostics: &mut Diagnostics) -> Self {
        let value = value.trim();
        let Some(captures) = LENGTH.captures(value) else {
            diagnostics.warn(format!(
                "size must be a correct LaTeX length ({value}); using 18"
            ));
            return Self::default();
        };

        let length = &captures["length"];
        if !length.parse::<f64>().is_ok_and(|length| length > 0.0) {
            diagnostics.warn("size must be greater than 0; using 18");
            return Self::default();
        }

        if captures.name("unit").is_some() {
            Self(value.to_string())
        } else {
            Self(format!("{value}pt"))
        }
    }

    /// The length as written into `\includegraphics`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TipSize {
    fn default() -> Self {
        Self("18pt".to_string())
    }
}

impl fmt::Display for TipSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
