use std::collections::{HashMap, HashSet};

use gc::{Finalize, Gc, GcCell, Trace};
use thiserror::Error;

use crate::object::Value;

#[derive(Debug, Trace, Finalize)]
pub struct EnvironmentCore {
    bindings: HashMap<String, Gc<Value>>,
    constants: HashSet<String>,
    parent: Option<Environment>,
}

/// One lexical scope in the chain. Cheap to clone; closures keep the scope
/// they captured alive, and `gc` collects the cycles that a function stored
/// in its own captured scope would otherwise leak.
#[derive(Debug, Clone, Trace, Finalize)]
pub struct Environment {
    inner: Gc<GcCell<EnvironmentCore>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum EnvironmentError {
    #[error("{0:?} is already declared in this scope")]
    AlreadyDeclared(String),
    #[error("{0:?} is not declared")]
    Unbound(String),
    #[error("{0:?} is a constant")]
    Constant(String),
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            inner: Gc::new(GcCell::new(EnvironmentCore {
                bindings: HashMap::new(),
                constants: HashSet::new(),
                parent: None,
            })),
        }
    }

    pub fn new_enclosed(parent: Environment) -> Self {
        Environment {
            inner: Gc::new(GcCell::new(EnvironmentCore {
                bindings: HashMap::new(),
                constants: HashSet::new(),
                parent: Some(parent),
            })),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(&*self.inner, &*other.inner)
    }

    /// Inserts a new binding in this scope. Redeclaring a name present in
    /// this scope's own bindings is an error; shadowing outer scopes is not.
    pub fn declare(
        &self,
        name: &str,
        value: Gc<Value>,
        constant: bool,
    ) -> Result<Gc<Value>, EnvironmentError> {
        let mut core = self.inner.borrow_mut();
        if core.bindings.contains_key(name) {
            return Err(EnvironmentError::AlreadyDeclared(name.to_owned()));
        }
        core.bindings.insert(name.to_owned(), value.clone());
        if constant {
            core.constants.insert(name.to_owned());
        }
        Ok(value)
    }

    /// Overwrites the nearest scope that holds `name` in its own bindings,
    /// walking innermost-out.
    pub fn assign(&self, name: &str, value: Gc<Value>) -> Result<Gc<Value>, EnvironmentError> {
        let mut core = self.inner.borrow_mut();
        if core.bindings.contains_key(name) {
            if core.constants.contains(name) {
                return Err(EnvironmentError::Constant(name.to_owned()));
            }
            core.bindings.insert(name.to_owned(), value.clone());
            return Ok(value);
        }
        match &core.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(EnvironmentError::Unbound(name.to_owned())),
        }
    }

    /// Read-only resolution, innermost-out.
    pub fn lookup(&self, name: &str) -> Option<Gc<Value>> {
        let core = self.inner.borrow();
        core.bindings
            .get(name)
            .cloned()
            .or_else(|| core.parent.as_ref().and_then(|parent| parent.lookup(name)))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let env = Environment::new();
        env.declare("x", Value::number(1.0), false).unwrap();
        assert_eq!(env.lookup("x"), Some(Value::number(1.0)));
        assert_eq!(env.lookup("y"), None);
    }

    #[test]
    fn test_redeclaration_in_same_scope_fails() {
        let env = Environment::new();
        env.declare("x", Value::number(1.0), false).unwrap();
        assert_eq!(
            env.declare("x", Value::number(2.0), false),
            Err(EnvironmentError::AlreadyDeclared("x".to_owned()))
        );
        assert_eq!(env.lookup("x"), Some(Value::number(1.0)));
    }

    #[test]
    fn test_shadowing_across_scopes() {
        let outer = Environment::new();
        outer.declare("x", Value::number(1.0), false).unwrap();

        let inner = Environment::new_enclosed(outer.clone());
        inner.declare("x", Value::number(2.0), false).unwrap();

        assert_eq!(inner.lookup("x"), Some(Value::number(2.0)));
        assert_eq!(outer.lookup("x"), Some(Value::number(1.0)));
    }

    #[test]
    fn test_assign_resolves_innermost_out() {
        let outer = Environment::new();
        outer.declare("x", Value::number(1.0), false).unwrap();

        let inner = Environment::new_enclosed(outer.clone());
        inner.assign("x", Value::number(5.0)).unwrap();

        assert_eq!(outer.lookup("x"), Some(Value::number(5.0)));
        assert_eq!(
            inner.assign("y", Value::number(1.0)),
            Err(EnvironmentError::Unbound("y".to_owned()))
        );
    }

    #[test]
    fn test_constants_cannot_be_assigned() {
        let env = Environment::new();
        env.declare("x", Value::number(1.0), true).unwrap();
        assert_eq!(
            env.assign("x", Value::number(2.0)),
            Err(EnvironmentError::Constant("x".to_owned()))
        );
        assert_eq!(env.lookup("x"), Some(Value::number(1.0)));
    }
}
