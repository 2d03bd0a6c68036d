use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Capability identifier.
///
/// Actions are modeled as opaque strings (e.g. "invoices.read").
/// A special wildcard action `"*"` can be recorded as a grant to mean
/// "allow all" — it is an explicitly stored grant, never an implicit
/// superuser bypass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(Cow<'static, str>);

impl Action {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }

    /// Whether a granted action covers a requested one.
    pub fn covers(&self, requested: &Action) -> bool {
        self.is_wildcard() || self == requested
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_covers_everything() {
        let star = Action::new("*");
        assert!(star.covers(&Action::new("invoices.read")));
        assert!(star.covers(&Action::new("cashboxes.read")));
    }

    #[test]
    fn exact_match_only_for_named_actions() {
        let read = Action::new("invoices.read");
        assert!(read.covers(&Action::new("invoices.read")));
        assert!(!read.covers(&Action::new("invoices.write")));
        // A named action never covers the wildcard itself.
        assert!(!read.covers(&Action::new("*")));
    }
}
