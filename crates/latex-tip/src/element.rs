//! Document elements that can carry a tip, and where the tip goes.
//!
//! The document tree itself belongs to the caller. It describes each
//! candidate element with a [`TipElement`] and splices the returned
//! [`Annotation`] according to its [`Placement`].

use std::collections::BTreeMap;

/// First block inside a div, which decides where a tip can be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadingBlock {
    /// The div has no content.
    Empty,
    /// A paragraph, plain block, line block or list whose first inline can
    /// be followed by raw LaTeX.
    Paragraph,
    /// A horizontal rule, figure, raw block, definition list or code block;
    /// the tip goes in a raw block before it.
    Block,
    /// A header, table, block quote or other block with no place for a tip.
    Unsupported,
}

/// Kind of element a tip can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Span,
    Code,
    CodeBlock,
    /// A div, described by its first block after unwrapping nested divs.
    Div(LeadingBlock),
}

/// Where the caller must insert the tip LaTeX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Raw inline right after the element.
    InlineAfter,
    /// Raw block right before the element.
    BlockBefore,
    /// Raw block as the first child of the div.
    DivStart,
    /// Raw inline after the first inline of the div's leading block.
    LeadingParagraph,
}

impl ElementKind {
    /// Placement of a tip for this kind of element, if it can take one.
    pub fn placement(self) -> Option<Placement> {
        match self {
            Self::Span | Self::Code => Some(Placement::InlineAfter),
            Self::CodeBlock => Some(Placement::BlockBefore),
            Self::Div(LeadingBlock::Paragraph) => Some(Placement::LeadingParagraph),
            Self::Div(LeadingBlock::Empty | LeadingBlock::Block) => Some(Placement::DivStart),
            Self::Div(LeadingBlock::Unsupported) => None,
        }
    }
}

/// An element as seen by the tip filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipElement {
    pub kind: ElementKind,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

impl TipElement {
    /// Create an element without classes or attributes.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            classes: vec![],
            attributes: BTreeMap::new(),
        }
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// LaTeX to splice next to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub placement: Placement,
    pub latex: String,
}
