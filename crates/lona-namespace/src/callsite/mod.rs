// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Call-site bootstrapping.
//!
//! Generated code refers to vars through call sites. A call site can be
//! specialized to the var's current value and still observe redefinition:
//! the specialization is guarded by the var's [`SwitchPoint`], which is
//! tripped when the root is rebound.
//!
//! | Shape | Fast path | Fallback |
//! |-------|-----------|----------|
//! | invoke | current function object | invoke through the var |
//! | static invoke | function's direct entry point | invoke through the var |
//! | deref | current root value | `Var::get` |
//! | acquire | the var itself | (never invalidated) |
//!
//! Invalidation is permanent per site. A site built against a tripped switch
//! point stays on its fallback; building a new site picks up the var's fresh
//! switch point and specializes again.


use core::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::registry::Registry;
use crate::value::{Function, StaticFn, Value};
use crate::var::{SwitchPoint, Var};

/// Dispatch state of a call site.
enum Target<T> {
    /// Specialized while `guard` is valid.
    Guarded { fast: T, guard: Arc<SwitchPoint> },
    /// Specialized permanently.
    Constant(T),
    /// Always takes the fallback.
    Generic,
}

impl<T> Target<T> {
    /// Specialize to `fast` under the var's guard.
    ///
    /// `guard` must have been read before the value `fast` was derived from,
    /// so a concurrent rebind leaves the site guarded by an already tripped
    /// switch point rather than a fresh one.
    fn guarded(fast: Option<T>, guard: Option<Arc<SwitchPoint>>) -> Self {
        match (fast, guard) {
            (Some(fast), Some(guard)) => Self::Guarded { fast, guard },
            (Some(fast), None) => Self::Constant(fast),
            (None, _) => Self::Generic,
        }
    }

    /// The fast-path target, if still usable.
    #[inline]
    fn fast(&self) -> Option<&T> {
        match self {
            Self::Guarded { fast, guard } if guard.is_valid() => Some(fast),
            Self::Constant(fast) => Some(fast),
            _ => None,
        }
    }
}

impl<T> fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guarded { guard, .. } => write!(f, "Guarded(valid: {})", guard.is_valid()),
            Self::Constant(_) => f.write_str("Constant"),
            Self::Generic => f.write_str("Generic"),
        }
    }
}

/// Generic invocation site specialized to a function object.
#[derive(Debug)]
pub struct InvokeSite {
    var: Arc<Var>,
    target: Target<Arc<dyn Function>>,
}

impl InvokeSite {
    /// Build an invoke site for `var`.
    #[must_use]
    pub fn new(var: &Arc<Var>) -> Self {
        let target = if var.is_dynamic() {
            Target::Generic
        } else {
            let guard = var.switch_point();
            let fast = var.root().and_then(|value| value.as_fn().cloned());
            Target::guarded(fast, guard)
        };
        Self {
            var: Arc::clone(var),
            target,
        }
    }

    /// Call the function with `args`.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        match self.target.fast() {
            Some(f) => f.invoke(args),
            None => self.var.invoke(args),
        }
    }

    /// True while the fast path is in use.
    #[must_use]
    pub fn is_specialized(&self) -> bool {
        self.target.fast().is_some()
    }
}

/// Invocation site preferring a function's direct entry point.
#[derive(Debug)]
pub struct StaticInvokeSite {
    var: Arc<Var>,
    target: Target<StaticFn>,
}

impl StaticInvokeSite {
    /// Build a static invoke site for `var`.
    ///
    /// Without a direct entry point the site is generic from the start.
    #[must_use]
    pub fn new(var: &Arc<Var>) -> Self {
        let target = if var.is_dynamic() {
            Target::Generic
        } else {
            let guard = var.switch_point();
            let fast = var
                .root()
                .and_then(|value| value.as_fn().and_then(|f| f.static_entry()));
            Target::guarded(fast, guard)
        };
        Self {
            var: Arc::clone(var),
            target,
        }
    }

    /// Call the function with `args`.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        match self.target.fast() {
            Some(entry) => entry(args),
            None => self.var.invoke(args),
        }
    }

    /// True while the direct entry point is in use.
    #[must_use]
    pub fn is_specialized(&self) -> bool {
        self.target.fast().is_some()
    }
}

/// Dereference site.
#[derive(Debug)]
pub struct DerefSite {
    var: Arc<Var>,
    target: Target<Value>,
}

impl DerefSite {
    /// Build a deref site for `var`.
    ///
    /// - dynamic var: always reads through the var
    /// - constant var: the current root, permanently
    /// - otherwise: the current root, until the var is rebound
    #[must_use]
    pub fn new(var: &Arc<Var>) -> Self {
        let target = if var.is_dynamic() {
            Target::Generic
        } else {
            let guard = var.switch_point();
            Target::guarded(var.root(), guard)
        };
        Self {
            var: Arc::clone(var),
            target,
        }
    }

    /// Current value of the var.
    pub fn deref(&self) -> Result<Value> {
        match self.target.fast() {
            Some(value) => Ok(value.clone()),
            None => self.var.get(),
        }
    }

    /// True while the cached value is in use.
    #[must_use]
    pub fn is_specialized(&self) -> bool {
        self.target.fast().is_some()
    }
}

/// Site that yields the var itself.
#[derive(Debug, Clone)]
pub struct AcquireSite {
    var: Arc<Var>,
}

impl AcquireSite {
    /// Build an acquire site for `var`.
    #[must_use]
    pub fn new(var: &Arc<Var>) -> Self {
        Self {
            var: Arc::clone(var),
        }
    }

    /// The var this site is bound to.
    #[must_use]
    pub const fn acquire(&self) -> &Arc<Var> {
        &self.var
    }
}

/// Builds call sites for vars named by `(namespace, name)`.
///
/// Names are resolved through the registry, creating the namespace and
/// interning the var if needed.
#[derive(Debug, Clone, Copy)]
pub struct Bootstrap<'r> {
    registry: &'r Registry,
}

impl<'r> Bootstrap<'r> {
    /// Bootstrap against `registry`.
    #[must_use]
    pub const fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Generic invoke site.
    pub fn invoke(&self, ns: &str, name: &str) -> Result<InvokeSite> {
        Ok(InvokeSite::new(&self.registry.var(ns, name)?))
    }

    /// Static invoke site.
    pub fn invoke_static(&self, ns: &str, name: &str) -> Result<StaticInvokeSite> {
        Ok(StaticInvokeSite::new(&self.registry.var(ns, name)?))
    }

    /// Deref site.
    pub fn deref(&self, ns: &str, name: &str) -> Result<DerefSite> {
        Ok(DerefSite::new(&self.registry.var(ns, name)?))
    }

    /// Acquire site.
    pub fn acquire(&self, ns: &str, name: &str) -> Result<AcquireSite> {
        Ok(AcquireSite::new(&self.registry.var(ns, name)?))
    }
}
