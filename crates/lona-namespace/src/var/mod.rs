// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Vars: named, namespace-owned bindings.
//!
//! A var has a root value shared by all threads. Dynamic vars can
//! additionally be rebound per thread with [`Var::with_binding`]. Every
//! non-constant var carries a [`SwitchPoint`] that is tripped whenever the
//! root is rebound, so call sites specialized to the old root fall back to
//! reading through the var.

mod switch_point;


use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;

pub use switch_point::SwitchPoint;

use crate::error::{Error, Result};
use crate::namespace::Namespace;
use crate::symbol::Symbol;
use crate::value::{Function, Value};

/// Var flags for metadata and behavior.
pub mod var_flags {
    /// Var can be rebound per thread.
    pub const DYNAMIC: u32 = 0x0001;
    /// Var is private (not re-exported by `init_with`).
    pub const PRIVATE: u32 = 0x0002;
    /// Var is a macro.
    pub const MACRO: u32 = 0x0004;
    /// Var has no switch point; call sites may treat its root as immutable.
    pub const CONSTANT: u32 = 0x0008;
}

/// A named binding owned by exactly one namespace.
pub struct Var {
    ns: Weak<Namespace>,
    ns_name: Symbol,
    name: Symbol,
    root: ArcSwapOption<Value>,
    flags: AtomicU32,
    switch_point: ArcSwapOption<SwitchPoint>,
}

impl Var {
    /// Create an unbound var owned by `ns`.
    pub(crate) fn new(ns: &Arc<Namespace>, name: Symbol) -> Arc<Self> {
        tracing::trace!(ns = %ns.name(), name = %name, "creating var");
        Arc::new(Self {
            ns: Arc::downgrade(ns),
            ns_name: ns.name().clone(),
            name,
            root: ArcSwapOption::empty(),
            flags: AtomicU32::new(0),
            switch_point: ArcSwapOption::from_pointee(SwitchPoint::new()),
        })
    }

    /// The var's unqualified name.
    #[must_use]
    pub const fn name(&self) -> &Symbol {
        &self.name
    }

    /// Name of the owning namespace.
    #[must_use]
    pub const fn ns_name(&self) -> &Symbol {
        &self.ns_name
    }

    /// The owning namespace, unless it has been removed and dropped.
    #[must_use]
    pub fn ns(&self) -> Option<Arc<Namespace>> {
        self.ns.upgrade()
    }

    /// True if `ns` is the namespace this var was created in.
    #[must_use]
    pub fn is_owned_by(&self, ns: &Namespace) -> bool {
        core::ptr::eq(self.ns.as_ptr(), ns)
    }

    /// True if `ns` refers to this var's owning namespace.
    pub(crate) fn owner_is(&self, ns: &Weak<Namespace>) -> bool {
        Weak::ptr_eq(&self.ns, ns)
    }

    /// Fully-qualified symbol `ns/name`.
    #[must_use]
    pub fn to_symbol(&self) -> Symbol {
        Symbol::qualified(self.ns_name.name(), self.name.name())
    }

    // =========================================================================
    // Root value
    // =========================================================================

    /// True if the var has a root value or a binding on this thread.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.root.load().is_some() || (self.is_dynamic() && thread_value(self).is_some())
    }

    /// The root value, ignoring thread bindings.
    #[must_use]
    pub fn root(&self) -> Option<Value> {
        self.root.load_full().map(|value| Value::clone(&value))
    }

    /// Set the root value.
    ///
    /// Trips the current switch point and installs a fresh one, unless the
    /// var is constant.
    pub fn bind_root(&self, value: Value) {
        self.root.store(Some(Arc::new(value)));
        if self.is_constant() {
            return;
        }
        if let Some(previous) = self.switch_point.swap(Some(Arc::new(SwitchPoint::new()))) {
            previous.invalidate();
        }
        tracing::trace!(var = %self, "root rebound");
    }

    /// Current value: the thread binding for dynamic vars, else the root.
    pub fn get(&self) -> Result<Value> {
        if self.is_dynamic() {
            if let Some(value) = thread_value(self) {
                return Ok(value);
            }
        }
        self.root().ok_or_else(|| Error::Unbound {
            var: self.to_string(),
        })
    }

    /// Current value as a function.
    pub fn fn_value(&self) -> Result<Arc<dyn Function>> {
        match self.get()? {
            Value::Fn(f) => Ok(f),
            _ => Err(Error::NotCallable {
                var: self.to_string(),
            }),
        }
    }

    /// Generic invocation: resolve the current value, then call it.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.fn_value()?.invoke(args)
    }

    /// The switch point guarding call sites specialized to the current root.
    ///
    /// `None` for constant vars.
    #[must_use]
    pub fn switch_point(&self) -> Option<Arc<SwitchPoint>> {
        self.switch_point.load_full()
    }

    // =========================================================================
    // Flags
    // =========================================================================

    fn has_flag(&self, flag: u32) -> bool {
        self.flags.load(Ordering::Acquire) & flag != 0
    }

    fn set_flag(&self, flag: u32, on: bool) {
        if on {
            self.flags.fetch_or(flag, Ordering::AcqRel);
        } else {
            self.flags.fetch_and(!flag, Ordering::AcqRel);
        }
    }

    /// Current flag bits (see [`var_flags`]).
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.flags.load(Ordering::Acquire)
    }

    /// True unless the var is private.
    #[must_use]
    pub fn is_public(&self) -> bool {
        !self.has_flag(var_flags::PRIVATE)
    }

    /// True if the var can be rebound per thread.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.has_flag(var_flags::DYNAMIC)
    }

    /// True if the var is a macro.
    #[must_use]
    pub fn is_macro(&self) -> bool {
        self.has_flag(var_flags::MACRO)
    }

    /// True if the var has no switch point.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.has_flag(var_flags::CONSTANT)
    }

    /// Mark the var dynamic (or static again).
    pub fn set_dynamic(&self, dynamic: bool) {
        self.set_flag(var_flags::DYNAMIC, dynamic);
    }

    /// Mark the var private (or public again).
    pub fn set_private(&self, private: bool) {
        self.set_flag(var_flags::PRIVATE, private);
    }

    /// Mark the var as a macro.
    pub fn set_macro(&self, is_macro: bool) {
        self.set_flag(var_flags::MACRO, is_macro);
    }

    /// Mark the var constant and drop its switch point.
    ///
    /// Sites guarded by the dropped switch point are invalidated. Sites built
    /// afterwards specialize to the root permanently.
    pub fn set_constant(&self) {
        self.set_flag(var_flags::CONSTANT, true);
        if let Some(previous) = self.switch_point.swap(None) {
            previous.invalidate();
        }
    }

    // =========================================================================
    // Thread bindings
    // =========================================================================

    /// Run `f` with this var bound to `value` on the current thread.
    ///
    /// Only dynamic vars can be bound. The binding is popped when `f`
    /// returns or unwinds.
    pub fn with_binding<R>(self: &Arc<Self>, value: Value, f: impl FnOnce() -> R) -> Result<R> {
        if !self.is_dynamic() {
            return Err(Error::NotDynamic {
                var: self.to_string(),
            });
        }
        THREAD_BINDINGS.with(|frames| {
            frames.borrow_mut().push(Frame {
                var: Arc::clone(self),
                value,
            });
        });
        let _frame = FrameGuard;
        Ok(f())
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#'{}/{}", self.ns_name, self.name)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Var({self})")
    }
}

/// One thread-local binding of a dynamic var.
struct Frame {
    var: Arc<Var>,
    value: Value,
}

thread_local! {
    static THREAD_BINDINGS: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Pops the innermost frame on drop.
struct FrameGuard;

impl Drop for FrameGuard {
    fn drop(&mut self) {
        THREAD_BINDINGS.with(|frames| {
            frames.borrow_mut().pop();
        });
    }
}

/// Innermost thread binding of `var`, if any.
fn thread_value(var: &Var) -> Option<Value> {
    THREAD_BINDINGS.with(|frames| {
        frames
            .borrow()
            .iter()
            .rev()
            .find(|frame| core::ptr::eq(Arc::as_ptr(&frame.var), var))
            .map(|frame| frame.value.clone())
    })
}
