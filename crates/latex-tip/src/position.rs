//! Margin side selection.

use latex_tip_icons::Diagnostics;

/// Which margin a tip goes into.
///
/// `Inner` and `Outer` follow the binding side in two-sided documents;
/// `Left` and `Right` are fixed on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Left,
    Right,
    Inner,
    Outer,
}

impl Position {
    /// Parse a position; empty means left, unknown values warn and use left.
    pub fn parse(value: &str, diagnostics: &mut Diagnostics) -> Self {
        match value {
            "" | "left" => Self::Left,
            "right" => Self::Right,
            "inner" => Self::Inner,
            "outer" => Self::Outer,
            other => {
                diagnostics.warn(format!("{other} is not a correct position; using left"));
                Self::Left
            }
        }
    }

    /// Macro selecting the margin on odd pages.
    pub fn odd_macro(self) -> &'static str {
        match self {
            Self::Left => r"\PandocLatexTipOddLeft",
            Self::Right => r"\PandocLatexTipOddRight",
            Self::Inner => r"\PandocLatexTipOddInner",
            Self::Outer => r"\PandocLatexTipOddOuter",
        }
    }

    /// Macro selecting the margin on even pages.
    pub fn even_macro(self) -> &'static str {
        match self {
            Self::Left => r"\PandocLatexTipEvenLeft",
            Self::Right => r"\PandocLatexTipEvenRight",
            Self::Inner => r"\PandocLatexTipEvenInner",
            Self::Outer => r"\PandocLatexTipEvenOuter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_positions() {
        let mut diagnostics = Diagnostics::new();

        assert_eq!(Position::parse("", &mut diagnostics), Position::Left);
        assert_eq!(Position::parse("right", &mut diagnostics), Position::Right);
        assert_eq!(Position::parse("inner", &mut diagnostics), Position::Inner);
        assert_eq!(Position::parse("outer", &mut diagnostics), Position::Outer);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_position_warns() {
        let mut diagnostics = Diagnostics::new();

        assert_eq!(Position::parse("top", &mut diagnostics), Position::Left);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_macros() {
        assert_eq!(Position::Outer.odd_macro(), r"\PandocLatexTipOddOuter");
        assert_eq!(Position::Left.even_macro(), r"\PandocLatexTipEvenLeft");
    }
}
