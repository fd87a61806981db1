//! Process-wide symbol interner backing the `symbol` argument type.
//!
//! Interning has two modes, mirroring safe/unsafe atom creation: a "safe"
//! conversion only resolves symbols that already exist in the table, while an
//! "unsafe" conversion interns new names on demand. Symbols are cheap copyable
//! handles; resolution goes back through the table.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A handle to an interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(u32);

#[derive(Default)]
struct Interner {
    names: Vec<String>,
    index: HashMap<String, u32>,
}

static TABLE: Lazy<RwLock<Interner>> = Lazy::new(|| RwLock::new(Interner::default()));

/// Intern `name`, creating it if it does not exist yet.
pub fn intern(name: &str) -> Symbol {
    if let Some(sym) = lookup(name) {
        return sym;
    }
    let mut table = TABLE.write().expect("symbol table lock poisoned");
    // Racing callers may have interned it between the read and the write.
    if let Some(&id) = table.index.get(name) {
        return Symbol(id);
    }
    let id = table.names.len() as u32;
    table.names.push(name.to_string());
    table.index.insert(name.to_string(), id);
    Symbol(id)
}

/// Resolve `name` only if it was interned before; never creates.
pub fn lookup(name: &str) -> Option<Symbol> {
    let table = TABLE.read().expect("symbol table lock poisoned");
    table.index.get(name).copied().map(Symbol)
}

/// The name behind a symbol handle.
pub fn resolve(sym: Symbol) -> String {
    let table = TABLE.read().expect("symbol table lock poisoned");
    table
        .names
        .get(sym.0 as usize)
        .cloned()
        .unwrap_or_default()
}

impl Symbol {
    pub fn name(&self) -> String {
        resolve(*self)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", resolve(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = intern("argot-test-symbol");
        let b = intern("argot-test-symbol");
        assert_eq!(a, b);
        assert_eq!(a.name(), "argot-test-symbol");
    }

    #[test]
    fn lookup_never_creates() {
        assert!(lookup("argot-never-interned").is_none());
        intern("argot-now-interned");
        assert!(lookup("argot-now-interned").is_some());
    }
}
