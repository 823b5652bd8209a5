// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use super::{Function, Mapping, TypeRef, Value};
use crate::error::Result;
use crate::test_support::{one, setup, sum};

/// Function without a direct entry point.
#[derive(Debug)]
struct Adder;

impl Function for Adder {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        match args {
            [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a + b)),
            _ => Ok(Value::Nil),
        }
    }
}

#[test]
fn immediates_compare_by_value() {
    assert_eq!(Value::Int(3), Value::Int(3));
    assert_eq!(Value::string("a"), Value::string("a"));
    assert_eq!(Value::keyword("k"), Value::keyword("k"));
    assert_ne!(Value::string("k"), Value::keyword("k"));
    assert_ne!(Value::Nil, Value::Bool(false));
}

#[test]
fn functions_compare_by_identity() {
    let a = Value::native("one", one);
    let b = Value::native("one", one);
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
}

#[test]
fn display_formats() {
    let (registry, _) = setup();
    let var = registry.var("user", "x").unwrap();

    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Int(-7).to_string(), "-7");
    assert_eq!(Value::string("hi").to_string(), "\"hi\"");
    assert_eq!(Value::keyword("k").to_string(), ":k");
    assert_eq!(Value::native("sum", sum).to_string(), "#<fn sum>");
    assert_eq!(Value::function(Adder).to_string(), "#<fn fn>");
    assert_eq!(Value::Var(var).to_string(), "#'user/x");
    assert_eq!(
        Value::Namespace(Arc::clone(registry.core())).to_string(),
        "#<Namespace lona.core>"
    );
}

#[test]
fn native_fn_exposes_static_entry() {
    let value = Value::native("sum", sum);
    let f = value.as_fn().unwrap();
    let entry = f.static_entry().unwrap();

    assert_eq!(entry(&[Value::Int(2), Value::Int(3)]).unwrap(), Value::Int(5));
    assert_eq!(f.name(), "sum");
}

#[test]
fn custom_function_has_no_static_entry() {
    let value = Value::function(Adder);
    let f = value.as_fn().unwrap();

    assert!(f.static_entry().is_none());
    assert_eq!(
        f.invoke(&[Value::Int(1), Value::Int(2)]).unwrap(),
        Value::Int(3)
    );
    assert_eq!(f.invoke(&[]).unwrap(), Value::Nil);
}

#[test]
fn type_ref_names() {
    let ty = TypeRef::new("lona.lang.Keyword");
    assert_eq!(ty.name(), "lona.lang.Keyword");
    assert_eq!(ty.simple_name(), "Keyword");
    assert_eq!(TypeRef::new("Plain").simple_name(), "Plain");
    assert_eq!(ty.to_string(), "type lona.lang.Keyword");
}

#[test]
fn type_ref_reload_detection() {
    let ty = TypeRef::new("lona.lang.Keyword");
    let reloaded = TypeRef::new("lona.lang.Keyword");
    let other = TypeRef::new("lona.lang.Symbol");

    assert!(reloaded.is_reload_of(&ty));
    assert!(!ty.is_reload_of(&ty));
    assert!(!other.is_reload_of(&ty));
}

#[test]
fn var_values_become_var_mappings() {
    let (registry, _) = setup();
    let var = registry.var("user", "x").unwrap();

    let mapping = Mapping::from(Value::Var(Arc::clone(&var)));
    assert!(Arc::ptr_eq(mapping.as_var().unwrap(), &var));
    assert!(mapping.is_identical(&Mapping::from(var)));

    let plain = Mapping::from(Value::Int(1));
    assert!(plain.as_var().is_none());
    assert!(plain.is_identical(&Mapping::Value(Value::Int(1))));
}

#[test]
fn type_mappings_compare_by_identity() {
    let ty = TypeRef::new("lona.lang.Keyword");
    let reloaded = TypeRef::new("lona.lang.Keyword");

    let mapping = Mapping::from(Arc::clone(&ty));
    assert!(mapping.is_identical(&Mapping::Type(ty)));
    assert!(!mapping.is_identical(&Mapping::Type(reloaded)));
}
