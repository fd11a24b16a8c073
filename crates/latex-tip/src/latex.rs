//! LaTeX text emitted for tips.
//!
//! A tip is a margin note whose side is chosen per page parity:
//!
//! ```latex
//! \checkoddpage%
//! \ifoddpage%
//! \PandocLatexTipOddLeft%
//! \else%
//! \PandocLatexTipEvenLeft%
//! \fi%
//! \marginnote{\includegraphics[height=18pt]{...}}[0pt]\vspace{0cm}%
//! ```
//!
//! The `\PandocLatexTip*` macros are defined once per document by
//! [`header_includes`].

use std::path::Path;

use crate::position::Position;
use crate::size::TipSize;

/// `\includegraphics` for one image, wrapped in `\href` when linked.
pub fn image(path: &str, size: &TipSize, link: Option<&str>) -> String {
    let graphic = format!(r"\includegraphics[height={size}]{{{path}}}");
    match link {
        Some(url) if !url.is_empty() => format!(r"\href{{{}}}{{{graphic}}}", escape_url(url)),
        _ => graphic,
    }
}

/// Path text for `\includegraphics`, with forward slashes.
pub fn graphics_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Escape the characters `\href` treats specially in its URL argument.
pub fn escape_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        if matches!(c, '#' | '%') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// The margin note holding `images`, placed according to `position`.
pub fn margin_note(position: Position, images: &[String]) -> String {
    format!(
        "\n\\checkoddpage%\n\\ifoddpage%\n{odd}%\n\\else%\n{even}%\n\\fi%\n\\marginnote{{{body}}}[0pt]\\vspace{{0cm}}%\n",
        odd = position.odd_macro(),
        even = position.even_macro(),
        body = images.concat(),
    )
}

/// Header lines a document with tips needs.
pub fn header_includes() -> Vec<String> {
    vec![
        r"\usepackage{graphicx,grffile}".to_string(),
        r"\usepackage{marginnote}".to_string(),
        r"\usepackage{etoolbox}".to_string(),
        r"\usepackage[strict]{changepage}".to_string(),
        MARGIN_MACROS.to_string(),
    ]
}

const MARGIN_MACROS: &str = r"
\makeatletter%
\newcommand{\PandocLatexTipOddInner}{\reversemarginpar}%
\newcommand{\PandocLatexTipEvenInner}{\reversemarginpar}%
\newcommand{\PandocLatexTipOddOuter}{\normalmarginpar}%
\newcommand{\PandocLatexTipEvenOuter}{\normalmarginpar}%
\newcommand{\PandocLatexTipOddLeft}{\reversemarginpar}%
\newcommand{\PandocLatexTipOddRight}{\normalmarginpar}%
\if@twoside%
\newcommand{\PandocLatexTipEvenRight}{\reversemarginpar}%
\newcommand{\PandocLatexTipEvenLeft}{\normalmarginpar}%
\else%
\newcommand{\PandocLatexTipEvenRight}{\normalmarginpar}%
\newcommand{\PandocLatexTipEvenLeft}{\reversemarginpar}%
\fi%
\makeatother%
\checkoddpage%
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_without_link() {
        let size = TipSize::default();
        assert_eq!(
            image("/cache/black/fa-comments.png", &size, None),
            r"\includegraphics[height=18pt]{/cache/black/fa-comments.png}"
        );
        assert_eq!(
            image("x.png", &size, Some("")),
            r"\includegraphics[height=18pt]{x.png}"
        );
    }

    #[test]
    fn test_image_with_link() {
        let size = TipSize::default();
        assert_eq!(
            image("x.png", &size, Some("https://example.com/a#b%20")),
            r"\href{https://example.com/a\#b\%20}{\includegraphics[height=18pt]{x.png}}"
        );
    }

    #[test]
    fn test_margin_note_layout() {
        let latex = margin_note(Position::Right, &["A".to_string(), "B".to_string()]);

        let lines: Vec<_> = latex.lines().collect();
        assert_eq!(
            lines,
            [
                "",
                r"\checkoddpage%",
                r"\ifoddpage%",
                r"\PandocLatexTipOddRight%",
                r"\else%",
                r"\PandocLatexTipEvenRight%",
                r"\fi%",
                r"\marginnote{AB}[0pt]\vspace{0cm}%",
            ]
        );
    }

    #[test]
    fn test_header_defines_every_macro() {
        let header = header_includes().concat();
        for position in [Position::Left, Position::Right, Position::Inner, Position::Outer] {
            assert!(header.contains(&format!(r"\newcommand{{{}}}", position.odd_macro())));
            assert!(header.contains(&format!(r"\newcommand{{{}}}", position.even_macro())));
        }
        assert!(header.contains(r"\usepackage[strict]{changepage}"));
    }

    #[test]
    fn test_graphics_path_uses_forward_slashes() {
        assert_eq!(graphics_path(Path::new(r"C:\cache\black\x.png")), "C:/cache/black/x.png");
    }
}
