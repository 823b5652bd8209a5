// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! End-to-end scenarios across registry, namespaces and call sites.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use crate::test_support::{one, setup, setup_with, sum, sym, two};
use crate::{Bootstrap, RegistryConfig, StaticLoader, TypeRef, Value};

#[test]
fn core_function_redefined_under_running_code() {
    let (registry, warnings) = setup();
    let core = registry.core();
    let plus = core.intern(&sym("+")).unwrap();
    plus.bind_root(Value::native("+", sum));

    let user = registry.find_or_create(&sym("user"));
    assert!(user.init_with(core));
    let resolved = user.get_mapping(&sym("+")).unwrap();
    assert!(Arc::ptr_eq(resolved.as_var().unwrap(), &plus));

    let site = Bootstrap::new(&registry)
        .invoke_static(core.name().name(), "+")
        .unwrap();
    assert_eq!(
        site.invoke(&[Value::Int(1), Value::Int(2)]).unwrap(),
        Value::Int(3)
    );

    plus.bind_root(Value::native("+", one));
    assert_eq!(
        site.invoke(&[Value::Int(1), Value::Int(2)]).unwrap(),
        Value::Int(1)
    );

    // The user shadows + locally and is warned about it
    let local = user.intern(&sym("+")).unwrap();
    local.bind_root(Value::native("+", two));
    assert_eq!(warnings.lines().len(), 1);
    assert_eq!(local.invoke(&[]).unwrap(), Value::Int(2));
    assert_eq!(plus.invoke(&[]).unwrap(), Value::Int(1));
}

#[test]
fn linked_namespace_with_default_imports() {
    let keyword = TypeRef::new("lona.lang.Keyword");
    let loader = Arc::new(StaticLoader::new());
    loader.register("my_app.core$greeting", || Ok(Value::string("hello")));
    let (registry, _) = setup_with(
        RegistryConfig::default()
            .with_default_type(Arc::clone(&keyword))
            .with_loader(loader),
    );

    let ns = registry.find_or_create(&sym("my-app.core"));
    ns.dynamically_linked();

    let deref = Bootstrap::new(&registry)
        .deref("my-app.core", "greeting")
        .unwrap();
    assert!(deref.is_specialized());
    assert_eq!(deref.deref().unwrap(), Value::string("hello"));
    assert!(Arc::ptr_eq(
        ns.get_mapping(&sym("Keyword")).unwrap().as_type().unwrap(),
        &keyword
    ));
}
