// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Errors raised by the namespace core.

use crate::symbol::Symbol;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed an argument the operation never accepts.
    InvalidArgument,
    /// The operation conflicts with the current state of a table.
    IllegalState,
    /// A generic dispatch path failed at run time.
    Runtime,
}

/// Error returned by namespace, registry and call-site operations.
///
/// A mutating operation that fails has not published anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A namespace-qualified symbol was passed where only a bare name is valid.
    #[error("Can't {op} namespace-qualified symbol: {symbol}")]
    QualifiedSymbol {
        /// Operation that rejected the symbol (e.g. "intern").
        op: &'static str,
        /// The offending symbol.
        symbol: Symbol,
    },
    /// An alias was added without a usable alias name.
    #[error("Expecting Symbol + Namespace")]
    MissingAliasArgument,
    /// Attempt to remove the core namespace from the registry.
    #[error("Cannot remove {name} namespace")]
    CoreNamespaceRemoval {
        /// Name of the core namespace.
        name: Symbol,
    },
    /// A name already maps to a var owned by another (non-core) namespace.
    #[error("{symbol} already refers to: {existing} in namespace: {namespace}")]
    AlreadyRefers {
        /// Name being interned or referred.
        symbol: Symbol,
        /// Printed form of the current mapping.
        existing: String,
        /// Namespace whose table holds the mapping.
        namespace: Symbol,
    },
    /// A type import collides with a differently named mapping.
    #[error("{symbol} already refers to: {existing} in namespace: {namespace}")]
    TypeCollision {
        /// Name the type was imported under.
        symbol: Symbol,
        /// Printed form of the current mapping.
        existing: String,
        /// Namespace whose table holds the mapping.
        namespace: Symbol,
    },
    /// An alias is already bound to a different namespace.
    #[error("Alias {alias} already exists in namespace {namespace}, aliasing {existing}")]
    AliasConflict {
        /// The alias name.
        alias: Symbol,
        /// Namespace owning the alias table.
        namespace: Symbol,
        /// Namespace the alias currently points to.
        existing: Symbol,
    },
    /// A var was dereferenced or called without a value.
    #[error("Var {var} is unbound.")]
    Unbound {
        /// Printed form of the var.
        var: String,
    },
    /// A var's value is not a function.
    #[error("{var} is not a function")]
    NotCallable {
        /// Printed form of the var.
        var: String,
    },
    /// Thread binding attempted on a var that is not dynamic.
    #[error("Can't dynamically bind non-dynamic var: {var}")]
    NotDynamic {
        /// Printed form of the var.
        var: String,
    },
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::QualifiedSymbol { .. }
            | Self::MissingAliasArgument
            | Self::CoreNamespaceRemoval { .. } => ErrorKind::InvalidArgument,
            Self::AlreadyRefers { .. } | Self::TypeCollision { .. } | Self::AliasConflict { .. } => {
                ErrorKind::IllegalState
            }
            Self::Unbound { .. }
            | Self::NotCallable { .. }
            | Self::NotDynamic { .. } => ErrorKind::Runtime,
        }
    }
}
