//! Subscription matchers over event names.
//!
//! A matcher is a predicate over the emitted event name. Structural rules cover the
//! naming scheme used by the storefront (`basket-changed`, `order.address:change`,
//! `contacts:submit`) without tying subscriptions to any pattern syntax.

use std::fmt;
use std::rc::Rc;

/// Rule deciding which emitted event names reach a handler.
#[derive(Clone)]
pub enum Matcher {
    /// Every event.
    Any,
    /// Exactly this name.
    Exact(String),
    /// Names starting with this prefix.
    Prefix(String),
    /// Names ending with this suffix.
    Suffix(String),
    /// `<namespace><suffix>` for any of the namespaces, e.g. `order:submit`.
    Scoped {
        namespaces: Vec<String>,
        suffix: String,
    },
    /// `<namespace>.<member><suffix>` with a non-empty member, e.g. `contacts.email:change`.
    Member {
        namespaces: Vec<String>,
        suffix: String,
    },
    /// Arbitrary predicate.
    Predicate(Rc<dyn Fn(&str) -> bool>),
}

impl Matcher {
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    #[must_use]
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    #[must_use]
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::Suffix(suffix.into())
    }

    #[must_use]
    pub fn scoped<I, S>(namespaces: I, suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Scoped {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
            suffix: suffix.into(),
        }
    }

    #[must_use]
    pub fn member<I, S>(namespaces: I, suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Member {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
            suffix: suffix.into(),
        }
    }

    #[must_use]
    pub fn predicate(f: impl Fn(&str) -> bool + 'static) -> Self {
        Self::Predicate(Rc::new(f))
    }

    /// Returns whether an event called `name` satisfies this matcher.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(exact) => name == exact,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => name.ends_with(suffix.as_str()),
            Self::Scoped { namespaces, suffix } => namespaces
                .iter()
                .any(|ns| name.strip_prefix(ns.as_str()) == Some(suffix.as_str())),
            Self::Member { namespaces, suffix } => namespaces.iter().any(|ns| {
                name.strip_prefix(ns.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .and_then(|rest| rest.strip_suffix(suffix.as_str()))
                    .is_some_and(|member| !member.is_empty())
            }),
            Self::Predicate(predicate) => predicate(name),
        }
    }
}

impl From<&str> for Matcher {
    fn from(name: &str) -> Self {
        Self::exact(name)
    }
}

impl From<String> for Matcher {
    fn from(name: String) -> Self {
        Self::Exact(name)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Exact(name) => f.debug_tuple("Exact").field(name).finish(),
            Self::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
            Self::Suffix(suffix) => f.debug_tuple("Suffix").field(suffix).finish(),
            Self::Scoped { namespaces, suffix } => f
                .debug_struct("Scoped")
                .field("namespaces", namespaces)
                .field("suffix", suffix)
                .finish(),
            Self::Member { namespaces, suffix } => f
                .debug_struct("Member")
                .field("namespaces", namespaces)
                .field("suffix", suffix)
                .finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_matches_field_changes_only() {
        let m = Matcher::suffix(":change");
        assert!(m.matches("order.address:change"));
        assert!(!m.matches("unrelated:event"));
    }

    #[test]
    fn member_requires_namespace_dot_member_suffix() {
        let m = Matcher::member(["order", "contacts"], ":change");
        assert!(m.matches("order.address:change"));
        assert!(m.matches("contacts.phone:change"));
        assert!(!m.matches("order:change"));
        assert!(!m.matches("order.:change"));
        assert!(!m.matches("basket.items:change"));
        assert!(!m.matches("xorder.address:change"));
    }

    #[test]
    fn scoped_matches_namespace_directly_followed_by_suffix() {
        let m = Matcher::scoped(["order", "contacts"], ":submit");
        assert!(m.matches("order:submit"));
        assert!(m.matches("contacts:submit"));
        assert!(!m.matches("order.email:submit"));
        assert!(!m.matches("basket:submit"));
    }

    #[test]
    fn predicate_and_prefix() {
        assert!(Matcher::prefix("product-").matches("product-add-to-basket"));
        let short = Matcher::predicate(|name| name.len() < 5);
        assert!(short.matches("abc"));
        assert!(!short.matches("abcdef"));
        assert_eq!(format!("{short:?}"), "Predicate(..)");
    }
}
