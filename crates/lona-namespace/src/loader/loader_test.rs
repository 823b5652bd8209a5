// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use proptest::prelude::*;

use super::{CHAR_MAP, LoadError, NoLoader, StaticLoader, VarLoader, activate, loader_name, munge};
use crate::test_support::{setup, sym};
use crate::value::Value;

// =============================================================================
// munge
// =============================================================================

#[test]
fn munge_examples() {
    // Each character is substituted on its own
    assert_eq!(munge("foo->bar?"), "foo__GT_bar_QMARK_");
    assert_eq!(munge("a-b"), "a_b");
    assert_eq!(munge("swap!"), "swap_BANG_");
    assert_eq!(munge("*out*"), "_STAR_out_STAR_");
    assert_eq!(munge("plain"), "plain");
    assert_eq!(munge(""), "");
}

#[test]
fn munge_keeps_dots_and_unmapped_chars() {
    assert_eq!(munge("a.b"), "a.b");
    assert_eq!(munge("λ_x1"), "λ_x1");
}

#[test]
fn munge_covers_whole_table() {
    for (from, to) in CHAR_MAP {
        assert_eq!(munge(&from.to_string()), to, "substitution for {from:?}");
    }
}

proptest! {
    #[test]
    fn munged_names_contain_no_special_chars(name in "\\PC*") {
        let munged = munge(&name);
        for (from, _) in CHAR_MAP {
            prop_assert!(!munged.contains(from));
        }
    }

    #[test]
    fn munge_is_per_character(a in "\\PC{0,12}", b in "\\PC{0,12}") {
        prop_assert_eq!(munge(&format!("{a}{b}")), format!("{}{}", munge(&a), munge(&b)));
    }
}

// =============================================================================
// loader_name
// =============================================================================

#[test]
fn loader_name_format() {
    assert_eq!(
        loader_name(&sym("my-app.core/valid?")).unwrap(),
        "my_app.core$valid_QMARK_"
    );
    assert_eq!(loader_name(&sym("user/x")).unwrap(), "user$x");
    assert!(loader_name(&sym("x")).is_none());
}

// =============================================================================
// Loaders
// =============================================================================

#[test]
fn no_loader_finds_nothing() {
    assert_eq!(NoLoader.load("user$x"), Ok(None));
}

#[test]
fn static_loader_lookup() {
    let loader = StaticLoader::new();
    assert!(loader.is_empty());

    loader.register("user$x", || Ok(Value::Int(1)));
    loader.register("user$broken", || {
        Err(LoadError::Instantiation {
            name: "user$broken".to_owned(),
            reason: "missing dependency".to_owned(),
        })
    });
    assert_eq!(loader.len(), 2);

    assert_eq!(loader.load("user$x"), Ok(Some(Value::Int(1))));
    assert_eq!(loader.load("user$y"), Ok(None));
    let err = loader.load("user$broken").unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to instantiate user$broken: missing dependency"
    );
}

#[test]
fn static_loader_register_replaces() {
    let loader = StaticLoader::new();
    loader.register("user$x", || Ok(Value::Int(1)));
    loader.register("user$x", || Ok(Value::Int(2)));

    assert_eq!(loader.len(), 1);
    assert_eq!(loader.load("user$x"), Ok(Some(Value::Int(2))));
}

// =============================================================================
// activate
// =============================================================================

#[test]
fn activate_binds_unbound_var() {
    let (registry, _) = setup();
    let var = registry.var("my-app", "answer?").unwrap();
    let loader = StaticLoader::new();
    loader.register("my_app$answer_QMARK_", || Ok(Value::Int(42)));

    activate(&loader, &var);
    assert_eq!(var.root(), Some(Value::Int(42)));
}

#[test]
fn activate_skips_bound_var() {
    let (registry, _) = setup();
    let var = registry.var("user", "x").unwrap();
    var.bind_root(Value::Int(0));
    let loader = StaticLoader::new();
    loader.register("user$x", || Ok(Value::Int(1)));

    activate(&loader, &var);
    assert_eq!(var.root(), Some(Value::Int(0)));
}

#[test]
fn activate_swallows_failures() {
    let (registry, _) = setup();
    let var = registry.var("user", "x").unwrap();
    let loader = Arc::new(StaticLoader::new());
    loader.register("user$x", || {
        Err(LoadError::Instantiation {
            name: "user$x".to_owned(),
            reason: "boom".to_owned(),
        })
    });

    activate(loader.as_ref(), &var);
    assert!(!var.is_bound());

    activate(&NoLoader, &var);
    assert!(!var.is_bound());
}

#[test]
fn panicking_initializer_is_a_load_error() {
    let loader = StaticLoader::new();
    loader.register("user$boom", || panic!("initializer exploded"));

    let err = loader.load("user$boom").unwrap_err();
    assert_eq!(
        err,
        LoadError::Instantiation {
            name: "user$boom".to_owned(),
            reason: "initializer exploded".to_owned(),
        }
    );
}

#[test]
fn activate_swallows_panics() {
    let (registry, _) = setup();
    let var = registry.var("user", "boom").unwrap();
    let loader = StaticLoader::new();
    loader.register("user$boom", || panic!("initializer exploded"));

    activate(&loader, &var);
    assert!(!var.is_bound());
}
