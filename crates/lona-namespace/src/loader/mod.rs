// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Dynamic-link activation of vars from precompiled initializer units.
//!
//! When a namespace is dynamically linked, each of its unbound vars is
//! offered to the configured [`VarLoader`] under a deterministic loader
//! name:
//!
//! ```text
//! #'my-app.core/valid?   →   my_app.core$valid_QMARK_
//! ```
//!
//! The namespace part has `-` replaced by `_`; the var name is [`munge`]d.
//! External tooling that produces initializer units relies on this format
//! byte for byte.
//!
//! Activation is best effort: a missing unit or a failing (or panicking)
//! initializer leaves the var unbound.

#[cfg(test)]
mod loader_test;

use core::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use dashmap::DashMap;

use crate::symbol::Symbol;
use crate::value::Value;
use crate::var::Var;

/// Character substitutions applied by [`munge`].
///
/// `.` is deliberately absent: it is kept in generated names.
const CHAR_MAP: [(char, &str); 24] = [
    ('-', "_"),
    (':', "_COLON_"),
    ('+', "_PLUS_"),
    ('>', "_GT_"),
    ('<', "_LT_"),
    ('=', "_EQ_"),
    ('~', "_TILDE_"),
    ('!', "_BANG_"),
    ('@', "_CIRCA_"),
    ('#', "_SHARP_"),
    ('\'', "_SINGLEQUOTE_"),
    ('"', "_DOUBLEQUOTE_"),
    ('%', "_PERCENT_"),
    ('^', "_CARET_"),
    ('&', "_AMPERSAND_"),
    ('*', "_STAR_"),
    ('|', "_BAR_"),
    ('{', "_LBRACE_"),
    ('}', "_RBRACE_"),
    ('[', "_LBRACK_"),
    (']', "_RBRACK_"),
    ('/', "_SLASH_"),
    ('\\', "_BSLASH_"),
    ('?', "_QMARK_"),
];

fn substitution(c: char) -> Option<&'static str> {
    CHAR_MAP
        .iter()
        .find_map(|&(from, to)| (from == c).then_some(to))
}

/// Replace every character of `name` found in the substitution table.
///
/// Characters outside the table pass through unchanged.
#[must_use]
pub fn munge(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match substitution(c) {
            Some(sub) => out.push_str(sub),
            None => out.push(c),
        }
    }
    out
}

/// Loader name for a qualified var symbol, or `None` if it has no namespace.
#[must_use]
pub fn loader_name(symbol: &Symbol) -> Option<String> {
    let ns = symbol.ns()?;
    Some(format!("{}${}", ns.replace('-', "_"), munge(symbol.name())))
}

/// Failure while instantiating a precompiled initializer unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The unit exists but could not be instantiated.
    #[error("failed to instantiate {name}: {reason}")]
    Instantiation {
        /// Loader name of the unit.
        name: String,
        /// Why instantiation failed.
        reason: String,
    },
}

/// Source of precompiled initializer units.
pub trait VarLoader: Send + Sync {
    /// Locate and instantiate the unit named `name`.
    ///
    /// `Ok(None)` means no such unit exists, which is the normal case for
    /// code that was never compiled ahead of time.
    fn load(&self, name: &str) -> Result<Option<Value>, LoadError>;
}

/// Loader that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLoader;

impl VarLoader for NoLoader {
    fn load(&self, _name: &str) -> Result<Option<Value>, LoadError> {
        Ok(None)
    }
}

/// Initializer producing the value of one precompiled var.
pub type Initializer = Arc<dyn Fn() -> Result<Value, LoadError> + Send + Sync>;

/// In-memory table of initializer units keyed by loader name.
///
/// A panicking initializer is reported as [`LoadError::Instantiation`].
#[derive(Default)]
pub struct StaticLoader {
    units: DashMap<String, Initializer>,
}

impl StaticLoader {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit under its loader name, replacing any previous one.
    pub fn register<F>(&self, name: impl Into<String>, init: F)
    where
        F: Fn() -> Result<Value, LoadError> + Send + Sync + 'static,
    {
        self.units.insert(name.into(), Arc::new(init));
    }

    /// Number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if no unit is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl VarLoader for StaticLoader {
    fn load(&self, name: &str) -> Result<Option<Value>, LoadError> {
        // Clone the initializer out so the shard lock is not held while it runs.
        let Some(init) = self.units.get(name).map(|entry| Arc::clone(entry.value())) else {
            return Ok(None);
        };
        match panic::catch_unwind(AssertUnwindSafe(|| init())) {
            Ok(result) => result.map(Some),
            Err(payload) => Err(LoadError::Instantiation {
                name: name.to_owned(),
                reason: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "initializer panicked".to_owned())
}

/// Bind `var` from its precompiled unit, if one exists.
///
/// No-op for bound vars. Every failure is swallowed.
pub(crate) fn activate(loader: &dyn VarLoader, var: &Var) {
    if var.is_bound() {
        return;
    }
    let Some(name) = loader_name(&var.to_symbol()) else {
        return;
    };
    match loader.load(&name) {
        Ok(Some(value)) => {
            tracing::debug!(var = %var, unit = %name, "activated var from precompiled unit");
            var.bind_root(value);
        }
        Ok(None) => {
            tracing::trace!(var = %var, unit = %name, "no precompiled unit");
        }
        Err(err) => {
            tracing::debug!(var = %var, unit = %name, error = %err, "ignoring failed activation");
        }
    }
}
