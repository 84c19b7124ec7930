//! The host's variable store.

use std::collections::HashMap;

/// String variables shared between the host and the callout.
pub trait VariableContext {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: String);
    fn remove(&mut self, name: &str);
}

/// An in-memory context.
#[derive(Clone, Debug, Default)]
pub struct MemoryContext {
    variables: HashMap<String, String>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrowing lookup, handy in assertions.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl VariableContext for MemoryContext {
    fn get(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: String) {
        self.variables.insert(name.to_string(), value);
    }

    fn remove(&mut self, name: &str) {
        self.variables.remove(name);
    }
}
