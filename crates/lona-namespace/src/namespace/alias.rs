// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Alias table: short names for other namespaces.

use std::sync::Arc;

use super::{Aliases, Namespace};
use crate::error::{Error, Result};
use crate::symbol::Symbol;

impl Namespace {
    /// Current alias snapshot.
    #[must_use]
    pub fn aliases(&self) -> Arc<Aliases> {
        self.aliases.get()
    }

    /// The namespace `alias` points to.
    #[must_use]
    pub fn lookup_alias(&self, alias: &Symbol) -> Option<Arc<Self>> {
        self.aliases.get().get(alias).cloned()
    }

    /// Make `alias` point to `target`.
    ///
    /// Adding the same alias for the same target again is a no-op. An alias
    /// can never be redirected to a different namespace; remove it first.
    pub fn add_alias(&self, alias: &Symbol, target: &Arc<Self>) -> Result<()> {
        if alias.name().is_empty() {
            return Err(Error::MissingAliasArgument);
        }

        let mut map = self.aliases.get();
        while !map.contains_key(alias) {
            let next = map.update(alias.clone(), Arc::clone(target));
            self.aliases.compare_and_set(&map, Arc::new(next));
            map = self.aliases.get();
        }

        match map.get(alias) {
            Some(existing) if !Arc::ptr_eq(existing, target) => Err(Error::AliasConflict {
                alias: alias.clone(),
                namespace: self.name.clone(),
                existing: existing.name().clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Remove `alias`, if present.
    pub fn remove_alias(&self, alias: &Symbol) {
        let mut map = self.aliases.get();
        while map.contains_key(alias) {
            let next = map.without(alias);
            self.aliases.compare_and_set(&map, Arc::new(next));
            map = self.aliases.get();
        }
    }
}
