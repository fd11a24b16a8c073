//! Margin-note icon tips for LaTeX output.
//!
//! Document elements matched by class rules or carrying `latex-tip-*`
//! attributes get a margin note with one or more icons next to them:
//!
//! - **Rules**: [`TipRule`] and [`TipDefinitions`] parse metadata and attributes
//! - **Resolution**: [`TipResolver`] renders icons through the cache and builds the LaTeX
//! - **Session**: [`TipSession`] holds everything one document transform needs
//!
//! Icon fonts, rasterization and the image cache live in the
//! `latex-tip-icons` crate.

pub mod element;
pub mod icon_ref;
pub mod latex;
pub mod position;
pub mod resolver;
pub mod rule;
pub mod session;
pub mod size;

mod error;

pub use element::{Annotation, ElementKind, LeadingBlock, Placement, TipElement};
pub use error::{Error, Result};
pub use icon_ref::IconRef;
pub use position::Position;
pub use resolver::TipResolver;
pub use rule::{METADATA_KEY, RuleKeys, TipDefinitions, TipRule};
pub use session::{OutputFormat, TipConfig, TipSession};
pub use size::TipSize;
