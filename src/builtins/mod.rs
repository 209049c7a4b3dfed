//! # Built-in Functions Module
//!
//! The fixed set of built-in functions for the Monkey interpreter, organized
//! into two categories:
//!
//! - **[collections]** (5): `len`, `first`, `last`, `rest`, `push`
//! - **[console]** (3): `puts`, `print`, `println`
//!
//! Builtins live in a process-wide immutable table, not in any environment:
//! identifier resolution consults the table only after the environment chain
//! has no binding for the name, so `let len = ...` shadows the builtin in the
//! scope it binds without mutating the table.

use crate::value::{BuiltinFn, Value};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub mod collections;
pub mod console;

static BUILTINS: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    HashMap::from([
        ("len", collections::builtin_len as BuiltinFn),
        ("first", collections::builtin_first as BuiltinFn),
        ("last", collections::builtin_last as BuiltinFn),
        ("rest", collections::builtin_rest as BuiltinFn),
        ("push", collections::builtin_push as BuiltinFn),
        ("puts", console::builtin_puts as BuiltinFn),
        ("print", console::builtin_print as BuiltinFn),
        ("println", console::builtin_println as BuiltinFn),
    ])
});

/// Resolves a builtin by name, returning it wrapped as a callable value.
pub fn lookup(name: &str) -> Option<Value> {
    BUILTINS.get(name).map(|function| Value::Builtin(*function))
}
