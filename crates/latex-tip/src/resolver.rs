//! Turning tip rules into LaTeX.

use latex_tip_icons::{Diagnostics, GlyphRenderer, IconCatalog, IconColor, ImageCache, Resolved};

use crate::icon_ref::IconRef;
use crate::latex;
use crate::rule::TipRule;

/// Resolves rules against a catalog, rendering icons through a cache.
pub struct TipResolver<'a, R: GlyphRenderer> {
    catalog: &'a IconCatalog,
    cache: &'a mut ImageCache<R>,
}

impl<'a, R: GlyphRenderer> TipResolver<'a, R> {
    /// Create a resolver.
    pub fn new(catalog: &'a IconCatalog, cache: &'a mut ImageCache<R>) -> Self {
        Self { catalog, cache }
    }

    /// Produce the margin-note LaTeX for `rule`.
    ///
    /// Unknown icons and images that cannot be rendered are dropped with a
    /// warning. The value is `None` when no image is left.
    pub fn resolve(&mut self, rule: &TipRule) -> Resolved<Option<String>> {
        let mut diagnostics = Diagnostics::new();
        let mut images = Vec::with_capacity(rule.icons.len());

        for icon in &rule.icons {
            let (name, color, link) = match icon {
                IconRef::Image { path, link } => {
                    let link = link.as_deref().or(rule.link.as_deref());
                    images.push(latex::image(path, &rule.size, link));
                    continue;
                }
                IconRef::Named { name, color, link } => (
                    name,
                    color.as_deref().unwrap_or(&rule.color),
                    link.as_deref().or(rule.link.as_deref()),
                ),
                IconRef::Literal(name) => (name, rule.color.as_str(), rule.link.as_deref()),
            };

            let color = IconColor::resolve(color, &mut diagnostics);

            let Some(entry) = self.catalog.resolve(name) else {
                match (&rule.fallback_image, icon) {
                    (Some(path), IconRef::Literal(_)) => {
                        images.push(latex::image(path, &rule.size, rule.link.as_deref()));
                    }
                    _ => diagnostics.warn(format!("{name} is not a correct icon name")),
                }
                continue;
            };

            let path = match self.cache.get_or_render(name, entry, &color) {
                Ok(path) => path,
                Err(e) => {
                    diagnostics.warn(format!("error in generating image for {name}: {e}"));
                    continue;
                }
            };
            images.push(latex::image(&latex::graphics_path(&path), &rule.size, link));
        }

        let latex = (!images.is_empty()).then(|| latex::margin_note(rule.position, &images));
        Resolved::new(latex, diagnostics)
    }
}
