// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Namespace registry.
//!
//! The registry maps namespace names to the single [`Namespace`] instance
//! for that name. Creation uses insert-if-absent on a concurrent table, so
//! racing `find_or_create` calls all observe the same instance.
//!
//! Every namespace created by a registry shares its [`Environment`]: the
//! core namespace, the default-imports baseline, the loader, the diagnostics
//! sink and the merge cache.


use core::fmt;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;

use crate::config::{Diagnostics, RegistryConfig};
use crate::error::{Error, Result};
use crate::loader::{self, VarLoader};
use crate::namespace::merge::MergeCache;
use crate::namespace::{Mappings, Namespace};
use crate::symbol::Symbol;
use crate::var::Var;

/// State shared by a registry and all of its namespaces.
pub(crate) struct Environment {
    core_name: Symbol,
    core: OnceCell<Weak<Namespace>>,
    default_imports: Arc<Mappings>,
    loader: Arc<dyn VarLoader>,
    diagnostics: Arc<dyn Diagnostics>,
    merge_cache: Mutex<MergeCache>,
}

impl Environment {
    fn new(config: RegistryConfig) -> Self {
        let default_imports: Mappings = config.default_imports.into_iter().collect();
        Self {
            core_name: config.core_name,
            core: OnceCell::new(),
            default_imports: Arc::new(default_imports),
            loader: config.loader,
            diagnostics: config.diagnostics,
            merge_cache: Mutex::new(MergeCache::default()),
        }
    }

    /// The snapshot every new namespace's mapping table starts as.
    pub(crate) const fn default_imports(&self) -> &Arc<Mappings> {
        &self.default_imports
    }

    pub(crate) const fn merge_cache(&self) -> &Mutex<MergeCache> {
        &self.merge_cache
    }

    /// True if `ns` is the core namespace.
    pub(crate) fn is_core(&self, ns: &Namespace) -> bool {
        self.core
            .get()
            .is_some_and(|core| core::ptr::eq(core.as_ptr(), ns))
    }

    /// True if `var` is owned by the core namespace.
    pub(crate) fn is_core_var(&self, var: &Var) -> bool {
        self.core.get().is_some_and(|core| var.owner_is(core))
    }

    pub(crate) fn activate(&self, var: &Var) {
        loader::activate(self.loader.as_ref(), var);
    }

    pub(crate) fn warn(&self, message: &str) {
        self.diagnostics.warn(message);
    }
}

static GLOBAL: Lazy<Registry> = Lazy::new(|| Registry::new(RegistryConfig::default()));

/// Table of all namespaces known to a runtime.
pub struct Registry {
    namespaces: DashMap<Symbol, Arc<Namespace>>,
    core: Arc<Namespace>,
    env: Arc<Environment>,
}

impl Registry {
    /// Create a registry with the core namespace pre-registered.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let env = Arc::new(Environment::new(config));
        let core = Namespace::new(env.core_name.clone(), Arc::clone(&env));
        env.core.get_or_init(|| Arc::downgrade(&core));

        let namespaces = DashMap::new();
        namespaces.insert(core.name().clone(), Arc::clone(&core));
        Self {
            namespaces,
            core,
            env,
        }
    }

    /// The process-wide registry, created with the default configuration.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// The core namespace.
    #[must_use]
    pub const fn core(&self) -> &Arc<Namespace> {
        &self.core
    }

    /// Find the namespace named `name`, creating it if needed.
    ///
    /// Returns the same instance for the same name, even when called
    /// concurrently.
    pub fn find_or_create(&self, name: &Symbol) -> Arc<Namespace> {
        if let Some(ns) = self.find(name) {
            return ns;
        }
        // A racing thread may have inserted first; its instance wins.
        match self.namespaces.entry(name.clone()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let fresh = Namespace::new(name.clone(), Arc::clone(&self.env));
                Arc::clone(entry.insert(fresh).value())
            }
        }
    }

    /// Find the namespace named `name`.
    #[must_use]
    pub fn find(&self, name: &Symbol) -> Option<Arc<Namespace>> {
        self.namespaces.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove the namespace named `name`.
    ///
    /// Vars that were referred elsewhere keep working; they still report the
    /// removed namespace as their owner.
    pub fn remove(&self, name: &Symbol) -> Result<Option<Arc<Namespace>>> {
        if *name == self.env.core_name {
            return Err(Error::CoreNamespaceRemoval { name: name.clone() });
        }
        let removed = self.namespaces.remove(name).map(|(_, ns)| ns);
        if removed.is_some() {
            tracing::debug!(ns = %name, "namespace removed");
        }
        Ok(removed)
    }

    /// Snapshot of all registered namespaces, in no particular order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<Namespace>> {
        self.namespaces
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Number of registered namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Always false: the core namespace is always registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Intern `name` in the namespace `ns`, creating both as needed.
    pub fn var(&self, ns: &str, name: &str) -> Result<Arc<Var>> {
        self.find_or_create(&Symbol::simple(ns))
            .intern(&Symbol::simple(name))
    }

    /// Resolve a restored namespace reference to the live instance.
    pub fn restore(&self, name: &Symbol) -> Arc<Namespace> {
        self.find_or_create(name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("core", &self.core.name())
            .field("namespaces", &self.namespaces.len())
            .finish_non_exhaustive()
    }
}
