use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use crate::Value;

/// Variables of a block, chained to the enclosing block.
#[derive(Default)]
pub(crate) struct Scope {
    vars: RefCell<HashMap<Rc<str>, Value>>,
    parent: Option<Rc<Scope>>,
    captured: Cell<bool>,
}

impl Scope {
    pub(crate) fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.vars.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.get(name)
    }

    /// `let`, shadows any previous declaration.
    pub(crate) fn declare(&self, name: Rc<str>, value: Value) {
        self.vars.borrow_mut().insert(name, value);
    }

    /// Assign to the nearest declaration, returns `false` if there is none.
    pub(crate) fn assign(&self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.vars.borrow_mut().get_mut(name) {
            *slot = value;
            return true;
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => false,
        }
    }
}

/// Scopes captured by closures in a session, and the closure call depth.
///
/// Only a scope reachable from a closure can be part of a reference cycle, other scopes drop
/// when their block ends.
#[derive(Default)]
pub(crate) struct Arena {
    scopes: RefCell<Vec<Rc<Scope>>>,
    depth: Cell<usize>,
}

impl Arena {
    /// Maximum nested closure calls.
    pub(crate) const RECURSION_LIMIT: usize = 64;

    pub(crate) fn root(&self) -> Rc<Scope> {
        let root = Rc::new(Scope::default());
        self.capture(&root);
        root
    }

    pub(crate) fn child(&self, parent: &Rc<Scope>) -> Rc<Scope> {
        Rc::new(Scope {
            parent: Some(parent.clone()),
            ..Scope::default()
        })
    }

    /// Register scope and its ancestors, to be cleared when the session ends.
    pub(crate) fn capture(&self, scope: &Rc<Scope>) {
        let mut next = Some(scope);
        while let Some(scope) = next {
            if scope.captured.replace(true) {
                break;
            }
            self.scopes.borrow_mut().push(scope.clone());
            next = scope.parent.as_ref();
        }
    }

    /// Enter a closure call, returns `None` when [`Arena::RECURSION_LIMIT`] is reached.
    ///
    /// The depth is restored when the returned guard drops.
    pub(crate) fn enter(&self) -> Option<CallGuard<'_>> {
        let depth = self.depth.get();
        if depth >= Self::RECURSION_LIMIT {
            return None;
        }
        self.depth.set(depth + 1);
        Some(CallGuard(self))
    }

    /// Drop all variables.
    pub(crate) fn clear(&self) {
        let scopes = std::mem::take(&mut *self.scopes.borrow_mut());
        for scope in scopes {
            let vars = std::mem::take(&mut *scope.vars.borrow_mut());
            drop(vars);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.scopes.borrow().len()
    }
}

pub(crate) struct CallGuard<'a>(&'a Arena);

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.0.depth.set(self.0.depth.get() - 1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chain() {
        let arena = Arena::default();
        let root = arena.root();
        root.declare("a".into(), Value::Int(1));
        let child = arena.child(&root);
        child.declare("b".into(), Value::Int(2));

        assert_eq!(child.get("a"), Some(Value::Int(1)));
        assert_eq!(root.get("b"), None);

        assert!(child.assign("a", Value::Int(3)));
        assert_eq!(root.get("a"), Some(Value::Int(3)));
        assert!(!child.assign("c", Value::Null));
    }

    #[test]
    fn capture_registers_ancestors_once() {
        let arena = Arena::default();
        let root = arena.root();
        let a = arena.child(&root);
        let b = arena.child(&a);
        let _ = arena.child(&b);
        assert_eq!(arena.len(), 1);

        arena.capture(&b);
        assert_eq!(arena.len(), 3);
        arena.capture(&a);
        arena.capture(&b);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn call_depth() {
        let arena = Arena::default();
        let guards = (0..Arena::RECURSION_LIMIT)
            .map(|_| arena.enter().unwrap())
            .collect::<Vec<_>>();
        assert!(arena.enter().is_none());
        drop(guards);
        assert!(arena.enter().is_some());
    }

    #[test]
    fn clear() {
        let arena = Arena::default();
        let root = arena.root();
        root.declare("a".into(), Value::Int(1));
        arena.clear();
        assert_eq!(root.get("a"), None);
    }
}
