// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Values held by vars and namespace mapping tables.
//!
//! A namespace maps a symbol to one of three things (see [`Mapping`]):
//! - a var (interned locally or referred from another namespace)
//! - an imported type reference
//! - any other value published with `reference`
//!
//! Reference-typed values (functions, vars, namespaces, types) compare by
//! identity. Immediates compare by value.

use core::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::namespace::Namespace;
use crate::var::Var;

#[cfg(test)]
mod mod_test;

/// Direct entry point of a precompiled function.
pub type StaticFn = fn(&[Value]) -> Result<Value>;

/// A callable runtime object.
pub trait Function: Send + Sync + fmt::Debug {
    /// Generic (boxed) invocation.
    fn invoke(&self, args: &[Value]) -> Result<Value>;

    /// Direct entry point, if this function was precompiled with one.
    ///
    /// Call sites prefer it over [`Function::invoke`] while the var they were
    /// built against has not been rebound.
    fn static_entry(&self) -> Option<StaticFn> {
        None
    }

    /// Name used when printing the function.
    fn name(&self) -> &str {
        "fn"
    }
}

/// Native function backed by a plain function pointer.
///
/// Its entry point doubles as the direct invocation handle.
#[derive(Clone, Copy)]
pub struct NativeFn {
    name: &'static str,
    entry: StaticFn,
}

impl NativeFn {
    /// Wrap a function pointer.
    #[must_use]
    pub const fn new(name: &'static str, entry: StaticFn) -> Self {
        Self { name, entry }
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

impl Function for NativeFn {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        (self.entry)(args)
    }

    fn static_entry(&self) -> Option<StaticFn> {
        Some(self.entry)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// The nil value.
    Nil,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// Immutable string.
    Str(Arc<str>),
    /// Keyword (printed with a leading colon).
    Keyword(Arc<str>),
    /// Callable object.
    Fn(Arc<dyn Function>),
    /// A var as a first-class value.
    Var(Arc<Var>),
    /// A namespace as a first-class value.
    Namespace(Arc<Namespace>),
}

impl Value {
    /// Build a string value.
    #[must_use]
    pub fn string(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }

    /// Build a keyword value.
    #[must_use]
    pub fn keyword(name: &str) -> Self {
        Self::Keyword(Arc::from(name))
    }

    /// Build a native function value.
    #[must_use]
    pub fn native(name: &'static str, entry: StaticFn) -> Self {
        Self::Fn(Arc::new(NativeFn::new(name, entry)))
    }

    /// Wrap any [`Function`] implementation.
    #[must_use]
    pub fn function<F: Function + 'static>(f: F) -> Self {
        Self::Fn(Arc::new(f))
    }

    /// Returns the function if this value is callable.
    #[must_use]
    pub const fn as_fn(&self) -> Option<&Arc<dyn Function>> {
        match self {
            Self::Fn(f) => Some(f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) | (Self::Keyword(a), Self::Keyword(b)) => a == b,
            (Self::Fn(a), Self::Fn(b)) => Arc::ptr_eq(a, b),
            (Self::Var(a), Self::Var(b)) => Arc::ptr_eq(a, b),
            (Self::Namespace(a), Self::Namespace(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Keyword(k) => write!(f, ":{k}"),
            Self::Fn(func) => write!(f, "#<fn {}>", func.name()),
            Self::Var(var) => write!(f, "{var}"),
            Self::Namespace(ns) => write!(f, "#<Namespace {}>", ns.name()),
        }
    }
}

/// Runtime type descriptor imported into a namespace.
///
/// Identity is the allocation: reloading a type produces a new `TypeRef`
/// with the same fully-qualified name.
#[derive(Debug)]
pub struct TypeRef {
    name: Arc<str>,
}

impl TypeRef {
    /// Create a new type descriptor instance.
    #[must_use]
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: Arc::from(name),
        })
    }

    /// Fully-qualified name, e.g. `lona.lang.Keyword`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name segment after the last `.`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// True if both are distinct instances of the same named type.
    #[must_use]
    pub fn is_reload_of(self: &Arc<Self>, other: &Arc<Self>) -> bool {
        !Arc::ptr_eq(self, other) && self.name == other.name
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {}", self.name)
    }
}

/// What a symbol maps to in a namespace.
#[derive(Clone, Debug)]
pub enum Mapping {
    /// A var, owned by this or another namespace.
    Var(Arc<Var>),
    /// An imported type.
    Type(Arc<TypeRef>),
    /// Any other published value.
    Value(Value),
}

impl Mapping {
    /// The var, if this mapping is one.
    #[must_use]
    pub const fn as_var(&self) -> Option<&Arc<Var>> {
        match self {
            Self::Var(var) => Some(var),
            _ => None,
        }
    }

    /// The type, if this mapping is one.
    #[must_use]
    pub const fn as_type(&self) -> Option<&Arc<TypeRef>> {
        match self {
            Self::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Identity comparison used by the CAS loops and the merge cache.
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Var(a), Self::Var(b)) => Arc::ptr_eq(a, b),
            (Self::Type(a), Self::Type(b)) => Arc::ptr_eq(a, b),
            (Self::Value(a), Self::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Arc<Var>> for Mapping {
    fn from(var: Arc<Var>) -> Self {
        Self::Var(var)
    }
}

impl From<Arc<TypeRef>> for Mapping {
    fn from(ty: Arc<TypeRef>) -> Self {
        Self::Type(ty)
    }
}

impl From<Value> for Mapping {
    fn from(value: Value) -> Self {
        match value {
            Value::Var(var) => Self::Var(var),
            other => Self::Value(other),
        }
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(var) => write!(f, "{var}"),
            Self::Type(ty) => write!(f, "{ty}"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}
