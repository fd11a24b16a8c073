//! Icon stylesheet parsing using the `cssparser` crate.
//!
//! Icon fonts ship a stylesheet that binds each icon class to a private-use
//! code point through a `:before` pseudo-element:
//!
//! ```css
//! .fa-comments:before { content: "\f086"; }
//! ```
//!
//! [`parse_icon_rules`] extracts those bindings and [`StylesheetIndex`] keeps
//! the ones whose code point the collection's font actually maps.

use std::collections::BTreeMap;
use std::path::Path;

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

use crate::font::IconFont;
use crate::{Error, Result};

/// One `.name:before { content: "<char>" }` rule.
///
/// A selector list (`.fa-user:before, .fa-person:before`) yields one rule
/// with several names sharing the character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRule {
    /// Class names from the selector list, in source order.
    pub names: Vec<String>,
    /// The single character from the `content` declaration.
    pub character: char,
}

/// Extract all icon rules from a stylesheet.
///
/// Rules that do not have the expected shape are skipped: at-rules, selectors
/// other than `.<class>:before`/`.<class>::before`, and `content` values that
/// are not exactly one character. CSS escapes are decoded by the tokenizer,
/// so `"\f086"` yields U+F086.
pub fn parse_icon_rules(css: &str) -> Vec<IconRule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = vec![];

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let start = parser.state();
        match parser.next() {
            Ok(Token::AtKeyword(_)) => {
                skip_at_rule(&mut parser);
                continue;
            }
            Ok(Token::CDO) | Ok(Token::CDC) => continue,
            Err(_) => break,
            Ok(_) => parser.reset(&start),
        }

        if let Some(rule) = parse_rule(&mut parser) {
            rules.push(rule);
        }
    }

    rules
}

/// Parse a qualified rule, consuming it entirely.
fn parse_rule(parser: &mut Parser<'_, '_>) -> Option<IconRule> {
    let names = parser
        .parse_until_before(Delimiter::CurlyBracketBlock, |p| {
            Ok::<_, CssParseError<'_, ()>>(parse_prelude(p))
        })
        .ok()
        .flatten();

    // The block must be consumed even when the prelude is not interesting.
    match parser.next() {
        Ok(Token::CurlyBracketBlock) => {}
        _ => return None,
    }
    let names = names?;

    let character = parser
        .parse_nested_block(|p| Ok::<_, CssParseError<'_, ()>>(parse_content(p)))
        .ok()
        .flatten()?;

    Some(IconRule { names, character })
}

/// Parse `.<name>:before` selectors separated by commas.
///
/// Always drains the prelude; returns `None` if any selector has another shape.
fn parse_prelude(parser: &mut Parser<'_, '_>) -> Option<Vec<String>> {
    let mut names = vec![];
    let mut valid = true;

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        match parse_before_selector(parser) {
            Some(name) => names.push(name),
            None => {
                valid = false;
                break;
            }
        }

        parser.skip_whitespace();
        match parser.next_including_whitespace() {
            Ok(Token::Comma) => {}
            Err(_) => break,
            Ok(_) => {
                valid = false;
                break;
            }
        }
    }

    while parser.next_including_whitespace_and_comments().is_ok() {}

    (valid && !names.is_empty()).then_some(names)
}

/// Parse one `.<name>:before` (or `::before`) compound selector.
fn parse_before_selector(parser: &mut Parser<'_, '_>) -> Option<String> {
    match parser.next_including_whitespace() {
        Ok(Token::Delim('.')) => {}
        _ => return None,
    }
    let name = match parser.next_including_whitespace() {
        Ok(Token::Ident(name)) => name.to_string(),
        _ => return None,
    };
    match parser.next_including_whitespace() {
        Ok(Token::Colon) => {}
        _ => return None,
    }
    let pseudo = match parser.next_including_whitespace() {
        Ok(Token::Colon) => match parser.next_including_whitespace() {
            Ok(Token::Ident(pseudo)) => pseudo.to_string(),
            _ => return None,
        },
        Ok(Token::Ident(pseudo)) => pseudo.to_string(),
        _ => return None,
    };

    pseudo.eq_ignore_ascii_case("before").then_some(name)
}

/// Find a `content: "<char>"` declaration in a declaration block.
fn parse_content(parser: &mut Parser<'_, '_>) -> Option<char> {
    let mut found = None;

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let property = match parser.next() {
            Ok(Token::Ident(name)) => name.to_string(),
            Ok(_) => {
                skip_declaration(parser);
                continue;
            }
            Err(_) => break,
        };

        if parser.expect_colon().is_err() {
            skip_declaration(parser);
            continue;
        }

        if !property.eq_ignore_ascii_case("content") {
            skip_declaration(parser);
            continue;
        }

        let before_value = parser.state();
        let value = match parser.next() {
            Ok(Token::QuotedString(value)) => Some(value.to_string()),
            Ok(Token::Semicolon) => {
                parser.reset(&before_value);
                None
            }
            _ => None,
        };
        let terminated = match parser.next() {
            Ok(Token::Semicolon) | Err(_) => true,
            Ok(_) => {
                skip_declaration(parser);
                false
            }
        };

        if found.is_none() && terminated {
            found = value.as_deref().and_then(single_char);
        }
    }

    found
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Skip an at-rule: up to its `;` or past its block.
fn skip_at_rule(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::Semicolon) | Ok(Token::CurlyBracketBlock) | Err(_) => return,
            _ => {}
        }
    }
}

fn skip_declaration(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::Semicolon) | Err(_) => return,
            _ => {}
        }
    }
}

/// Longest common prefix of two names, on character boundaries.
fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

/// Cut a common name prefix back to its last `-`, so `fa-user` shared by
/// `fa-user` and `fa-users` yields `fa-` and a lone name keeps its stem.
fn class_prefix(common: &str) -> &str {
    common.rfind('-').map_or("", |i| &common[..=i])
}

/// Symbolic icon name to code point table for one collection.
///
/// Built from a stylesheet and the collection's font. Names whose character
/// is absent from every Unicode cmap subtable of the font are dropped during
/// construction; a stylesheet is often shared by several variant fonts that
/// each cover only part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylesheetIndex {
    /// Sorted name → character table.
    glyphs: BTreeMap<String, char>,
    /// Common prefix of the stylesheet names up to its last `-`.
    native_prefix: String,
}

impl StylesheetIndex {
    /// Build the index from a stylesheet file.
    pub fn from_file(
        css_path: impl AsRef<Path>,
        font: &IconFont,
        prefix: Option<&str>,
    ) -> Result<Self> {
        let css_path = css_path.as_ref();
        let css = std::fs::read_to_string(css_path).map_err(|e| Error::io(css_path, e))?;
        Ok(Self::build(&css, font, prefix))
    }

    /// Build the index from stylesheet text.
    ///
    /// When `prefix` is given, the prefix shared by every kept name (for
    /// example `fa-`) is replaced with it, so `fa-user` becomes `far-user`
    /// for `Some("far-")`.
    pub fn build(css: &str, font: &IconFont, prefix: Option<&str>) -> Self {
        let mut glyphs = BTreeMap::new();
        let mut common: Option<String> = None;

        for rule in parse_icon_rules(css) {
            if !font.has_unicode_char(rule.character) {
                tracing::trace!(
                    "{}: U+{:04X} not in font, skipping {:?}",
                    font.path().display(),
                    u32::from(rule.character),
                    rule.names
                );
                continue;
            }
            for name in rule.names {
                common = Some(match common {
                    None => name.clone(),
                    Some(c) => common_prefix(&c, &name).to_string(),
                });
                glyphs.insert(name, rule.character);
            }
        }

        let native_prefix = class_prefix(&common.unwrap_or_default()).to_string();

        if let Some(prefix) = prefix {
            glyphs = glyphs
                .into_iter()
                .map(|(name, character)| {
                    (format!("{}{}", prefix, &name[native_prefix.len()..]), character)
                })
                .collect();
        }

        tracing::debug!(
            "{}: {} icons (native prefix {:?})",
            font.path().display(),
            glyphs.len(),
            native_prefix
        );

        Self {
            glyphs,
            native_prefix,
        }
    }

    /// Look up the character for an icon name.
    pub fn get(&self, name: &str) -> Option<char> {
        self.glyphs.get(name).copied()
    }

    /// Whether the index has an icon.
    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    /// The prefix the stylesheet names shared before rewriting.
    pub fn native_prefix(&self) -> &str {
        &self.native_prefix
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char)> {
        self.glyphs.iter().map(|(name, c)| (name.as_str(), *c))
    }

    /// Icon names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.glyphs.keys().map(String::as_str)
    }

    /// Number of icons.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FONTAWESOME_CSS, TestFont};

    fn font(builder: TestFont) -> IconFont {
        IconFont::from_bytes("test.ttf", builder.build()).unwrap()
    }

    #[test]
    fn parse_simple_rule() {
        let rules = parse_icon_rules(r#".fa-comments:before { content: "\f086"; }"#);

        assert_eq!(
            rules,
            vec![IconRule {
                names: vec!["fa-comments".to_string()],
                character: '\u{f086}',
            }]
        );
    }

    #[test]
    fn parse_selector_list_and_double_colon() {
        let css = r#"
            .fa-user:before,
            .fa-person:before { content: "\f007"; }
            .fa-file::before { content: '\f15c' }
        "#;
        let rules = parse_icon_rules(css);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].names, ["fa-user", "fa-person"]);
        assert_eq!(rules[1].names, ["fa-file"]);
        assert_eq!(rules[1].character, '\u{f15c}');
    }

    #[test]
    fn skips_unrelated_rules() {
        let css = r#"
            @charset "UTF-8";
            @font-face { font-family: "X"; src: url(x.woff2); }
            .fa { display: inline-block; }
            .fa-spin:after { content: "\f110"; }
            .fa-two:before { content: "ab"; }
            div.fa-x:before { content: "\f111"; }
            .fa-ok:before { color: red; content: "\f00c"; }
        "#;
        let rules = parse_icon_rules(css);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].names, ["fa-ok"]);
        assert_eq!(rules[0].character, '\u{f00c}');
    }

    #[test]
    fn recovers_after_malformed_rule() {
        let css = r#"
            .broken:before { content: ; }
            .fa-good:before { content: "\f087"; }
        "#;
        let rules = parse_icon_rules(css);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].names, ["fa-good"]);
    }

    #[test]
    fn common_prefix_on_char_boundaries() {
        assert_eq!(common_prefix("fa-user", "fa-comments"), "fa-");
        assert_eq!(common_prefix("fa-user", "fa-user"), "fa-user");
        assert_eq!(common_prefix("été", "étais"), "ét");
        assert_eq!(common_prefix("abc", "xyz"), "");
    }

    #[test]
    fn empty_content_keeps_next_declaration() {
        let rules = parse_icon_rules(r#".fa-comments:before { content: ; content: "\f086"; }"#);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].character, '\u{f086}');
    }

    #[test]
    fn class_prefix_stops_at_separator() {
        assert_eq!(class_prefix("fa-"), "fa-");
        assert_eq!(class_prefix("fa-user"), "fa-");
        assert_eq!(class_prefix("fa-github"), "fa-");
        assert_eq!(class_prefix("mdi-arrow-"), "mdi-arrow-");
        assert_eq!(class_prefix("icon"), "");
    }

    #[test]
    fn prefix_rewrite_with_single_name() {
        let font = font(TestFont::new().square('\u{f09b}', 800));
        let index = StylesheetIndex::build(
            r#".fa-github:before { content: "\f09b"; }"#,
            &font,
            Some("fab-"),
        );

        assert_eq!(index.native_prefix(), "fa-");
        assert_eq!(index.names().collect::<Vec<_>>(), ["fab-github"]);
    }

    #[test]
    fn prefix_rewrite_with_nested_names() {
        let css = r#"
            .fa-user:before { content: "\f007"; }
            .fa-users:before { content: "\f0c0"; }
        "#;
        let font = font(TestFont::new().square('\u{f007}', 800).square('\u{f0c0}', 800));
        let index = StylesheetIndex::build(css, &font, Some("far-"));

        assert_eq!(index.names().collect::<Vec<_>>(), ["far-user", "far-users"]);
    }

    #[test]
    fn index_keeps_only_mapped_characters() {
        let font = font(
            TestFont::new()
                .square('\u{f086}', 800)
                .square('\u{f007}', 700)
                .symbol_glyph('\u{f06a}', 900),
        );
        let index = StylesheetIndex::build(FONTAWESOME_CSS, &font, None);

        let names: Vec<_> = index.names().collect();
        assert_eq!(names, ["fa-comments", "fa-person", "fa-user"]);
        for (_, character) in index.iter() {
            assert!(font.has_unicode_char(character));
        }
        assert!(!index.contains("fa-exclamation-circle"));
    }

    #[test]
    fn prefix_rewrite() {
        let font = font(TestFont::new().square('\u{f086}', 800).square('\u{f007}', 700));
        let index = StylesheetIndex::build(FONTAWESOME_CSS, &font, Some("far-"));

        assert_eq!(index.native_prefix(), "fa-");
        assert_eq!(index.get("far-user"), Some('\u{f007}'));
        assert_eq!(index.get("far-comments"), Some('\u{f086}'));
        assert!(!index.contains("fa-user"));
    }

    #[test]
    fn rebuilding_gives_same_names() {
        let font = font(TestFont::new().square('\u{f086}', 800).square('\u{f007}', 700));
        let first = StylesheetIndex::build(FONTAWESOME_CSS, &font, Some("fab-"));
        let second = StylesheetIndex::build(FONTAWESOME_CSS, &font, Some("fab-"));

        assert_eq!(first, second);
    }

    #[test]
    fn missing_stylesheet_file() {
        let font = font(TestFont::new().square('\u{f086}', 800));
        let err = StylesheetIndex::from_file("/nonexistent/icons.css", &font, None).unwrap_err();
        assert!(err.is_not_found());
    }
}
