// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Shared helpers for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{Diagnostics, RegistryConfig};
use crate::error::Result;
use crate::registry::Registry;
use crate::symbol::Symbol;
use crate::value::Value;

/// Diagnostics sink that records every warning.
#[derive(Default)]
pub struct CapturedWarnings {
    lines: Mutex<Vec<String>>,
}

impl CapturedWarnings {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Diagnostics for CapturedWarnings {
    fn warn(&self, message: &str) {
        self.lines.lock().push(message.to_owned());
    }
}

/// Fresh registry whose warnings are captured.
pub fn setup() -> (Registry, Arc<CapturedWarnings>) {
    setup_with(RegistryConfig::default())
}

/// Fresh registry from `config`, with warnings captured.
pub fn setup_with(config: RegistryConfig) -> (Registry, Arc<CapturedWarnings>) {
    let warnings = Arc::new(CapturedWarnings::default());
    let registry = Registry::new(config.with_diagnostics(Arc::clone(&warnings) as Arc<dyn Diagnostics>));
    (registry, warnings)
}

pub fn sym(text: &str) -> Symbol {
    Symbol::intern(text)
}

pub fn one(_args: &[Value]) -> Result<Value> {
    Ok(Value::Int(1))
}

pub fn two(_args: &[Value]) -> Result<Value> {
    Ok(Value::Int(2))
}

/// Sums integer arguments, ignoring everything else.
pub fn sum(args: &[Value]) -> Result<Value> {
    Ok(Value::Int(
        args.iter()
            .map(|arg| match arg {
                Value::Int(n) => *n,
                _ => 0,
            })
            .sum(),
    ))
}
