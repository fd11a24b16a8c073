//! Warnings collected while resolving icons.
//!
//! Bad input data never aborts a document: each problem becomes a
//! [`Warning`], is logged through `tracing`, and travels back to the caller
//! next to whatever value could still be produced.

use std::fmt;

/// A single non-fatal problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    message: String,
}

impl Warning {
    /// Create a warning.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The warning text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered collection of warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, message: impl Into<String>) {
        let warning = Warning::new(message);
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Append all warnings from `other`, preserving order.
    ///
    /// The warnings were already logged when first recorded.
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    /// Number of warnings.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether nothing went wrong.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Iterate over the warnings.
    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }

    /// Consume into the underlying list.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A value together with the warnings produced while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// The (possibly partial) result.
    pub value: T,
    /// Problems encountered on the way.
    pub diagnostics: Diagnostics,
}

impl<T> Resolved<T> {
    /// Wrap a value with its diagnostics.
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }

    /// Split into value and diagnostics.
    pub fn into_parts(self) -> (T, Diagnostics) {
        (self.value, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_keep_order() {
        let mut diags = Diagnostics::new();
        diags.warn("first");
        diags.warn("second");

        let messages: Vec<_> = diags.iter().map(Warning::message).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn extend_appends() {
        let mut a = Diagnostics::new();
        a.warn("a");
        let mut b = Diagnostics::new();
        b.warn("b");

        a.extend(b);
        assert_eq!(a.len(), 2);
    }
}
