//! Document-level behavior of tip sessions.

use std::path::Path;

use latex_tip::{ElementKind, LeadingBlock, OutputFormat, Placement, TipConfig, TipElement, TipSession};
use latex_tip_icons::CacheConfig;
use latex_tip_icons::testing::{TestFont, write_collection, write_fontawesome};
use serde_json::{Value, json};
use tempfile::TempDir;

struct Dirs {
    data: TempDir,
    cache: TempDir,
}

fn dirs() -> Dirs {
    let data = tempfile::tempdir().unwrap();
    write_fontawesome(data.path()).unwrap();
    Dirs {
        data,
        cache: tempfile::tempdir().unwrap(),
    }
}

fn config(dirs: &Dirs) -> TipConfig {
    TipConfig::new(dirs.data.path())
        .with_cache(CacheConfig::default().with_cache_dir(dirs.cache.path()).with_base_size(48))
}

fn session(dirs: &Dirs, metadata: Option<&Value>) -> TipSession {
    TipSession::prepare(&config(dirs), OutputFormat::Latex, metadata)
        .unwrap()
        .value
}

fn span_with_icon(icon: &str) -> TipElement {
    TipElement::new(ElementKind::Span).with_attribute("latex-tip-icon", icon)
}

#[test]
fn test_icon_is_rendered_once() {
    let dirs = dirs();
    let mut session = session(&dirs, None);
    let element = span_with_icon("fa-comments")
        .with_attribute("latex-tip-color", "black")
        .with_attribute("latex-tip-size", "18");

    let first = session.annotate(&element);
    let path = dirs.cache.path().join("black").join("fa-comments.png");
    assert!(path.is_file());
    assert_eq!(session.cache().stats().renders, 1);

    let second = session.annotate(&element);
    assert_eq!(session.cache().stats().renders, 1);
    assert_eq!(session.cache().stats().hits, 1);
    assert_eq!(first.value, second.value);

    let annotation = first.value.unwrap();
    assert_eq!(annotation.placement, Placement::InlineAfter);
    assert!(annotation.latex.contains("fa-comments.png"));
}

#[test]
fn test_unknown_icon_produces_nothing() {
    let dirs = dirs();
    let mut session = session(&dirs, None);

    let resolved = session.annotate(&span_with_icon("fa-not-an-icon"));

    assert_eq!(resolved.value, None);
    assert_eq!(resolved.diagnostics.len(), 1);
    assert_eq!(session.cache().stats().renders, 0);
}

#[test]
fn test_name_collision_keeps_core_icon() {
    let dirs = dirs();
    write_collection(
        dirs.data.path(),
        "extra",
        "extra.css",
        ".ex-user:before { content: \"\\f007\"; }\n.ex-zzz:before { content: \"\\f008\"; }",
        "extra.ttf",
        &TestFont::new().square('\u{f007}', 400).square('\u{f008}', 400),
    )
    .unwrap();
    std::fs::write(
        dirs.data.path().join("config.toml"),
        "[[collection]]\ncollection = \"extra\"\ncss = \"extra.css\"\nttf = \"extra.ttf\"\nprefix = \"far-\"\n",
    )
    .unwrap();

    let session = session(&dirs, None);

    assert_eq!(session.catalog().resolve("far-user").unwrap().collection, "fontawesome");
    assert_eq!(session.catalog().resolve("far-zzz").unwrap().collection, "extra");
}

#[test]
fn test_bare_size_is_points() {
    let dirs = dirs();
    let mut session = session(&dirs, None);

    let annotation = session
        .annotate(&span_with_icon("fa-user").with_attribute("latex-tip-size", "36"))
        .value
        .unwrap();

    assert!(annotation.latex.contains(r"\includegraphics[height=36pt]"));
}

#[test]
fn test_class_definitions() {
    let dirs = dirs();
    let metadata = json!([
        {"classes": ["warning", "big"], "icons": ["fa-exclamation-circle"], "position": "right"},
        {"classes": ["warning"], "icons": [{"name": "fab-github", "link": "https://github.com"}]},
        {"classes": ["broken"], "icons": ["fa-nope"]},
    ]);
    let resolved = TipSession::prepare(&config(&dirs), OutputFormat::Beamer, Some(&metadata)).unwrap();
    assert_eq!(resolved.diagnostics.len(), 1);
    let mut session = resolved.value;
    assert_eq!(session.definitions().len(), 2);

    let div = TipElement::new(ElementKind::Div(LeadingBlock::Paragraph))
        .with_class("big")
        .with_class("warning");
    let annotation = session.annotate(&div).value.unwrap();
    assert_eq!(annotation.placement, Placement::LeadingParagraph);
    assert!(annotation.latex.contains(r"\PandocLatexTipOddRight"));

    let code_block = TipElement::new(ElementKind::CodeBlock).with_class("warning");
    let annotation = session.annotate(&code_block).value.unwrap();
    assert_eq!(annotation.placement, Placement::BlockBefore);
    assert!(annotation.latex.contains(r"\href{https://github.com}"));

    let plain = TipElement::new(ElementKind::Code).with_class("note");
    assert_eq!(session.annotate(&plain).value, None);
}

#[test]
fn test_render_failure_is_a_warning() {
    let dirs = dirs();
    let mut session = session(&dirs, None);
    std::fs::write(dirs.cache.path().join("black"), b"").unwrap();

    let resolved = session.annotate(&span_with_icon("fa-comments"));

    assert_eq!(resolved.value, None);
    assert_eq!(resolved.diagnostics.len(), 1);
    assert_eq!(session.cache().stats().renders, 0);
}

#[test]
fn test_div_without_place_for_tip() {
    let dirs = dirs();
    let mut session = session(&dirs, None);

    let header_first = TipElement::new(ElementKind::Div(LeadingBlock::Unsupported))
        .with_attribute("latex-tip-icon", "fa-user");
    let resolved = session.annotate(&header_first);
    assert_eq!(resolved.value, None);
    assert_eq!(resolved.diagnostics.len(), 1);

    let rule_first = TipElement::new(ElementKind::Div(LeadingBlock::Block))
        .with_attribute("latex-tip-icon", "fa-user");
    let annotation = session.annotate(&rule_first).value.unwrap();
    assert_eq!(annotation.placement, Placement::DivStart);
}

#[test]
fn test_attributes_override_classes() {
    let dirs = dirs();
    let metadata = json!([{"classes": ["warning"], "icons": ["fab-github"]}]);
    let mut session = session(&dirs, Some(&metadata));

    let element = TipElement::new(ElementKind::Span)
        .with_class("warning")
        .with_attribute("latex-tip-image", "logo.png");
    let annotation = session.annotate(&element).value.unwrap();

    assert!(annotation.latex.contains("{logo.png}"));
    assert!(!annotation.latex.contains("fab-github"));
}

#[test]
fn test_other_formats_are_untouched() {
    let dirs = dirs();
    let metadata = json!([{"classes": ["warning"]}]);
    let mut session = TipSession::prepare(
        &config(&dirs),
        OutputFormat::parse("html"),
        Some(&metadata),
    )
    .unwrap()
    .value;

    let element = span_with_icon("fa-user").with_class("warning");
    assert_eq!(session.annotate(&element).value, None);
    assert!(session.header_includes().is_empty());
    assert!(session.definitions().is_empty());
    assert!(is_empty_dir(dirs.cache.path()));
}

#[test]
fn test_header_includes() {
    let dirs = dirs();
    let session = session(&dirs, None);

    let header = session.header_includes();
    assert_eq!(header[0], r"\usepackage{graphicx,grffile}");
    assert!(header.last().unwrap().contains(r"\if@twoside%"));
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}
