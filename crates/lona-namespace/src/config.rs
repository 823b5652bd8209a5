// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Registry configuration.

use core::fmt;
use std::sync::Arc;

use crate::loader::{NoLoader, VarLoader};
use crate::symbol::Symbol;
use crate::value::{Mapping, TypeRef};

/// Name of the core namespace.
///
/// Vars owned by the core namespace may always be shadowed (with a warning)
/// and the namespace itself can never be removed.
pub const CORE_NS: &str = "lona.core";

/// Sink for non-fatal diagnostics such as replacement warnings.
pub trait Diagnostics: Send + Sync {
    /// Report one warning line.
    fn warn(&self, message: &str);
}

/// Emits diagnostics as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "lona_namespace::replace", "{message}");
    }
}

/// Configuration for a [`Registry`](crate::Registry).
///
/// ```
/// use lona_namespace::{Registry, RegistryConfig, TypeRef};
///
/// let registry = Registry::new(
///     RegistryConfig::default().with_default_type(TypeRef::new("lona.lang.Keyword")),
/// );
/// let ns = registry.find_or_create(&"user".into());
/// assert!(ns.get_mapping(&"Keyword".into()).is_some());
/// ```
#[derive(Clone)]
pub struct RegistryConfig {
    /// Name of the core namespace.
    pub core_name: Symbol,
    /// Entries every new namespace starts with.
    pub default_imports: Vec<(Symbol, Mapping)>,
    /// Source of precompiled initializer units.
    pub loader: Arc<dyn VarLoader>,
    /// Sink for replacement warnings.
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl RegistryConfig {
    /// Use a different core namespace name.
    #[must_use]
    pub fn with_core_name(mut self, name: &str) -> Self {
        self.core_name = Symbol::simple(name);
        self
    }

    /// Add a default import under an explicit name.
    #[must_use]
    pub fn with_default_import(mut self, name: Symbol, mapping: Mapping) -> Self {
        self.default_imports.push((name, mapping));
        self
    }

    /// Add a default type import under the type's simple name.
    #[must_use]
    pub fn with_default_type(self, ty: Arc<TypeRef>) -> Self {
        let name = Symbol::simple(ty.simple_name());
        self.with_default_import(name, Mapping::Type(ty))
    }

    /// Use `loader` for dynamic-link activation.
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn VarLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Send replacement warnings to `diagnostics`.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            core_name: Symbol::simple(CORE_NS),
            default_imports: Vec::new(),
            loader: Arc::new(NoLoader),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("core_name", &self.core_name)
            .field("default_imports", &self.default_imports.len())
            .finish_non_exhaustive()
    }
}
