use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use super::object::Object;

pub type Env = Rc<RefCell<Environment>>;

/// One lexical scope: its own bindings plus the scope it is nested in.
#[derive(Debug, Default)]
pub struct Environment {
    store: IndexMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    /// Creates a global scope.
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates a scope nested in `outer`, as used for a function call.
    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            store: IndexMap::new(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    /// Looks `name` up in this scope, then outward through the chain.
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.store.get(name) {
            return Some(value.clone());
        }

        self.outer.as_ref()?.borrow().get(name)
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Object) -> Object {
        self.store.insert(name.into(), value.clone());
        value
    }
}
