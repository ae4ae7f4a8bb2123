//! Variable environments.
//!
//! An [`Env`] is a single flat scope backed by a persistent map, so taking a
//! snapshot for `let` bodies is cheap. The check runner builds one fresh
//! environment per script file, which is the whole isolation story: nothing
//! defined in one file can be observed by the next.

use im::HashMap;

use crate::runtime::value::Value;

/// The binding injected into a fresh entry-point environment so scripts
/// guarded with `(when main? ...)` behave as if invoked directly.
pub const ENTRY_POINT_BINDING: &str = "main?";

#[derive(Debug, Clone)]
pub struct Env {
    bindings: HashMap<String, Value>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    /// An environment with only the base bindings (`nil`).
    pub fn new() -> Self {
        let mut env = Self {
            bindings: HashMap::new(),
        };
        env.define("nil", Value::Nil);
        env
    }

    /// A fresh environment seeded with the entry-point marker. This is what
    /// each check script is evaluated in.
    pub fn entry_point() -> Self {
        let mut env = Self::new();
        env.define(ENTRY_POINT_BINDING, Value::Bool(true));
        env
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }
}
