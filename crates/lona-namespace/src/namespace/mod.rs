// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Namespaces: containers for var bindings, type imports and aliases.
//!
//! A namespace owns two tables, each an immutable persistent map held in an
//! atomically replaceable cell:
//!
//! ```text
//! Namespace 'my.app
//! ├── mappings: { 'x → #'my.app/x, 'map → #'lona.core/map, 'Keyword → type }
//! └── aliases:  { 'str → #<Namespace lona.string> }
//! ```
//!
//! Writers never lock. Each mutation reads the current snapshot, builds the
//! next one and publishes it with compare-and-set, retrying if another
//! thread published first. Readers see either the old or the new snapshot.

pub(crate) mod merge;

mod alias;


use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering, fence};
use std::sync::Arc;

use crate::cell::AtomicRef;
use crate::error::{Error, Result};
use crate::registry::Environment;
use crate::symbol::Symbol;
use crate::value::{Mapping, TypeRef};
use crate::var::Var;

/// Symbol → var, type or value.
pub type Mappings = im::HashMap<Symbol, Mapping>;

/// Symbol → aliased namespace.
pub type Aliases = im::HashMap<Symbol, Arc<Namespace>>;

/// A named container of mappings.
///
/// Obtain namespaces through [`Registry::find_or_create`](crate::Registry::find_or_create);
/// there is exactly one instance per name.
pub struct Namespace {
    name: Symbol,
    mappings: AtomicRef<Mappings>,
    aliases: AtomicRef<Aliases>,
    dynamically_linked: AtomicBool,
    env: Arc<Environment>,
}

fn ensure_unqualified(op: &'static str, sym: &Symbol) -> Result<()> {
    if sym.is_qualified() {
        return Err(Error::QualifiedSymbol {
            op,
            symbol: sym.clone(),
        });
    }
    Ok(())
}

impl Namespace {
    pub(crate) fn new(name: Symbol, env: Arc<Environment>) -> Arc<Self> {
        tracing::trace!(ns = %name, "creating namespace");
        Arc::new(Self {
            name,
            mappings: AtomicRef::new(Arc::clone(env.default_imports())),
            aliases: AtomicRef::new(Arc::new(Aliases::new())),
            dynamically_linked: AtomicBool::new(false),
            env,
        })
    }

    /// The namespace name.
    #[must_use]
    pub const fn name(&self) -> &Symbol {
        &self.name
    }

    /// True if this is the registry's core namespace.
    #[must_use]
    pub fn is_core(&self) -> bool {
        self.env.is_core(self)
    }

    /// Current mapping snapshot.
    #[must_use]
    pub fn mappings(&self) -> Arc<Mappings> {
        self.mappings.get()
    }

    /// Current mapping for `sym`.
    #[must_use]
    pub fn get_mapping(&self, sym: &Symbol) -> Option<Mapping> {
        self.mappings.get().get(sym).cloned()
    }

    // =========================================================================
    // Interning and referring
    // =========================================================================

    /// Ensure `sym` maps to a var owned by this namespace.
    ///
    /// Returns the existing var if there is one. If `sym` currently maps to
    /// something else (usually a var referred from another namespace), the
    /// replacement policy decides whether a new local var may shadow it.
    pub fn intern(self: &Arc<Self>, sym: &Symbol) -> Result<Arc<Var>> {
        ensure_unqualified("intern", sym)?;

        let mut map = self.mappings.get();
        let mut created: Option<Arc<Var>> = None;
        let mut checked: Option<Mapping> = None;
        loop {
            let current = map.get(sym);
            if let Some(Mapping::Var(var)) = current {
                if var.is_owned_by(self) {
                    return Ok(Arc::clone(var));
                }
            }

            let var = Arc::clone(created.get_or_insert_with(|| self.create_var(sym)));
            let replacement = Mapping::Var(Arc::clone(&var));
            if let Some(existing) = current {
                self.check_replace(sym, existing, &replacement, &mut checked)?;
            }

            let next = map.update(sym.clone(), replacement);
            if self.mappings.compare_and_set(&map, Arc::new(next)) {
                self.activate_if_linked(&var);
                return Ok(var);
            }
            tracing::trace!(ns = %self.name, sym = %sym, "intern lost race, retrying");
            map = self.mappings.get();
        }
    }

    /// Publish `value` under `sym`.
    ///
    /// Returns the mapping now in the table: `value` itself, or the existing
    /// entry if it is identical to `value`.
    pub fn reference(&self, sym: &Symbol, value: impl Into<Mapping>) -> Result<Mapping> {
        ensure_unqualified("refer", sym)?;
        let value = value.into();

        let mut map = self.mappings.get();
        let mut checked: Option<Mapping> = None;
        loop {
            if let Some(existing) = map.get(sym) {
                if existing.is_identical(&value) {
                    return Ok(existing.clone());
                }
                self.check_replace(sym, existing, &value, &mut checked)?;
            }

            let next = map.update(sym.clone(), value.clone());
            if self.mappings.compare_and_set(&map, Arc::new(next)) {
                return Ok(value);
            }
            map = self.mappings.get();
        }
    }

    /// Refer a var (usually from another namespace) under `sym`.
    pub fn refer(&self, sym: &Symbol, var: &Arc<Var>) -> Result<Arc<Var>> {
        self.reference(sym, Arc::clone(var))?;
        Ok(Arc::clone(var))
    }

    /// Import a type under `sym`.
    ///
    /// A different instance of a type with the same name (a reloaded type)
    /// is overwritten. Any other existing mapping is a collision.
    pub fn import_type(&self, sym: &Symbol, ty: &Arc<TypeRef>) -> Result<Arc<TypeRef>> {
        ensure_unqualified("import", sym)?;

        let mut map = self.mappings.get();
        let existing = loop {
            match map.get(sym) {
                None => {}
                Some(Mapping::Type(current)) if current.is_reload_of(ty) => {}
                Some(found) => break found.clone(),
            }
            let next = map.update(sym.clone(), Mapping::Type(Arc::clone(ty)));
            self.mappings.compare_and_set(&map, Arc::new(next));
            map = self.mappings.get();
        };

        match existing {
            Mapping::Type(current) if Arc::ptr_eq(&current, ty) => Ok(current),
            other => Err(Error::TypeCollision {
                symbol: sym.clone(),
                existing: other.to_string(),
                namespace: self.name.clone(),
            }),
        }
    }

    /// Import a type under its simple name.
    pub fn import_type_named(&self, ty: &Arc<TypeRef>) -> Result<Arc<TypeRef>> {
        self.import_type(&Symbol::simple(ty.simple_name()), ty)
    }

    /// Remove the mapping for `sym`, if any.
    pub fn unmap(&self, sym: &Symbol) -> Result<()> {
        ensure_unqualified("unintern", sym)?;

        let mut map = self.mappings.get();
        while map.contains_key(sym) {
            let next = map.without(sym);
            self.mappings.compare_and_set(&map, Arc::new(next));
            map = self.mappings.get();
        }
        Ok(())
    }

    /// Find a var interned in this namespace.
    ///
    /// Referred vars are never returned. A dynamically linked namespace
    /// interns `sym` on demand instead.
    pub fn find_interned(self: &Arc<Self>, sym: &Symbol) -> Result<Option<Arc<Var>>> {
        if self.is_dynamically_linked() {
            return self.intern(sym).map(Some);
        }
        Ok(self
            .mappings
            .get()
            .get(sym)
            .and_then(Mapping::as_var)
            .filter(|var| var.is_owned_by(self))
            .cloned())
    }

    // =========================================================================
    // Dynamic linking
    // =========================================================================

    /// True once [`Namespace::dynamically_linked`] has been called.
    #[must_use]
    pub fn is_dynamically_linked(&self) -> bool {
        self.dynamically_linked.load(Ordering::SeqCst)
    }

    /// Mark this namespace dynamically linked and activate its unbound vars.
    ///
    /// Vars interned afterwards, including ones whose publish races with
    /// this call, are activated by `intern`.
    pub fn dynamically_linked(&self) {
        self.dynamically_linked.store(true, Ordering::SeqCst);
        fence(Ordering::SeqCst);
        for mapping in self.mappings.get().values() {
            if let Mapping::Var(var) = mapping {
                if var.is_owned_by(self) && !var.is_bound() {
                    self.env.activate(var);
                }
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn create_var(self: &Arc<Self>, sym: &Symbol) -> Arc<Var> {
        let var = Var::new(self, sym.clone());
        if self.is_dynamically_linked() {
            self.env.activate(&var);
        }
        var
    }

    /// Activate a just-published `var` if the namespace is linked by now.
    ///
    /// Pairs with the flag store in `dynamically_linked`: every published
    /// var is either in that scan's snapshot or sees the flag here.
    fn activate_if_linked(&self, var: &Var) {
        fence(Ordering::SeqCst);
        if self.is_dynamically_linked() {
            self.env.activate(var);
        }
    }

    /// Run the replacement policy against `existing`, once per distinct
    /// existing entry across CAS retries.
    fn check_replace(
        &self,
        sym: &Symbol,
        existing: &Mapping,
        replacement: &Mapping,
        checked: &mut Option<Mapping>,
    ) -> Result<()> {
        if checked.as_ref().is_some_and(|seen| seen.is_identical(existing)) {
            return Ok(());
        }
        self.warn_or_fail_on_replace(sym, existing, replacement)?;
        *checked = Some(existing.clone());
        Ok(())
    }

    /// Decide whether `existing` may be replaced by `replacement`.
    ///
    /// - existing var owned by this namespace: allowed
    /// - replacement is a core var: allowed silently
    /// - existing var owned by a non-core namespace: collision error
    /// - anything else: allowed with a warning
    fn warn_or_fail_on_replace(
        &self,
        sym: &Symbol,
        existing: &Mapping,
        replacement: &Mapping,
    ) -> Result<()> {
        if let Mapping::Var(old) = existing {
            let replacement_is_core = replacement
                .as_var()
                .is_some_and(|new| self.env.is_core_var(new));
            if old.is_owned_by(self) || replacement_is_core {
                return Ok(());
            }
            if !self.env.is_core_var(old) {
                return Err(Error::AlreadyRefers {
                    symbol: sym.clone(),
                    existing: existing.to_string(),
                    namespace: self.name.clone(),
                });
            }
        }
        self.env.warn(&format!(
            "WARNING: {sym} already refers to: {existing} in namespace: {}, being replaced by: {replacement}",
            self.name
        ));
        Ok(())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", self.name)
    }
}
