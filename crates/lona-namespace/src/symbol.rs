// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Symbols: a name with an optional namespace qualifier.

use core::fmt;
use std::sync::Arc;

/// A possibly namespace-qualified name such as `x` or `lona.core/map`.
///
/// Symbols compare and hash by content. Cloning is cheap (two `Arc<str>`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    ns: Option<Arc<str>>,
    name: Arc<str>,
}

impl Symbol {
    /// Parse `ns/name` or `name`.
    ///
    /// The first `/` separates the qualifier. The lone symbol `/` is a bare
    /// name.
    #[must_use]
    pub fn intern(text: &str) -> Self {
        match text.split_once('/') {
            Some((ns, name)) if text != "/" && !ns.is_empty() => Self::qualified(ns, name),
            _ => Self::simple(text),
        }
    }

    /// Build an unqualified symbol without parsing.
    #[must_use]
    pub fn simple(name: &str) -> Self {
        Self {
            ns: None,
            name: Arc::from(name),
        }
    }

    /// Build a qualified symbol.
    #[must_use]
    pub fn qualified(ns: &str, name: &str) -> Self {
        Self {
            ns: Some(Arc::from(ns)),
            name: Arc::from(name),
        }
    }

    /// The namespace qualifier, if any.
    #[must_use]
    pub fn ns(&self) -> Option<&str> {
        self.ns.as_deref()
    }

    /// The name part.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the symbol carries a namespace qualifier.
    #[must_use]
    pub const fn is_qualified(&self) -> bool {
        self.ns.is_some()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ns {
            Some(ns) => write!(f, "{ns}/{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{self}")
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Self::intern(text)
    }
}
