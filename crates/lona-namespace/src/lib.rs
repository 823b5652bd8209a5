// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # Lona Namespace
//!
//! Symbolic namespaces and var binding resolution for the Lona runtime.
//!
//! This crate provides:
//! - A process-wide, lock-free namespace registry (`Registry`)
//! - Per-namespace mapping and alias tables published as immutable snapshots
//! - The replacement policy for shadowing names referred from `lona.core`
//! - Dynamic-link activation of vars from precompiled initializer units
//! - The merge cache used to re-export one namespace into many others
//! - Call-site bootstrapping with switch-point guards (`callsite`)
//!
//! Every mutation is a read-modify-compare-and-swap loop over a persistent
//! map. Readers never block. The only lock is the one guarding the merge
//! cache.
//!
//! ```text
//! Registry ──► Namespace ──► mappings: Symbol → Var | TypeRef | Value
//!                       └──► aliases:  Symbol → Namespace
//!
//! Bootstrap ──► Var ──► SwitchPoint (tripped on rebind)
//! ```

pub mod callsite;
pub mod config;
pub mod error;
pub mod loader;
pub mod namespace;
pub mod registry;
pub mod symbol;
pub mod value;
pub mod var;

mod cell;

pub use callsite::{AcquireSite, Bootstrap, DerefSite, InvokeSite, StaticInvokeSite};
pub use config::{CORE_NS, Diagnostics, RegistryConfig, TracingDiagnostics};
pub use error::{Error, ErrorKind, Result};
pub use loader::{LoadError, NoLoader, StaticLoader, VarLoader, loader_name, munge};
pub use namespace::{Aliases, Mappings, Namespace};
pub use registry::Registry;
pub use symbol::Symbol;
pub use value::{Function, Mapping, NativeFn, StaticFn, TypeRef, Value};
pub use var::{SwitchPoint, Var, var_flags};

#[cfg(test)]
mod lib_test;
#[cfg(test)]
mod test_support;
