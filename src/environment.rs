//! Lexical scopes as a parent‑linked chain of shared, mutable maps.
//!
//! Every scope lives behind `Rc<RefCell<_>>`: a closure and the block that
//! created it hold the *same* scope, so an assignment through one is seen by
//! the other.

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A root scope (the globals).
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap into a fresh shared handle.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in *this* scope, overwriting any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Value bound in *this* scope only.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    /// Dynamic lookup walking the whole chain.  Only used for globals, where
    /// the chain has length one.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Dynamic assignment walking the whole chain; fails if `name` was never
    /// defined.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// The scope exactly `distance` parent links above `env`.
    pub fn ancestor(env: &EnvRef, distance: usize) -> EnvRef {
        let mut current: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let parent: Option<EnvRef> = current.borrow().enclosing.clone();
            match parent {
                Some(parent) => current = parent,
                // The resolver never produces a distance past the root.
                None => break,
            }
        }

        current
    }

    /// Read `name` from the scope `distance` hops up, without searching any
    /// further: the distance is exact.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        debug!("get_at '{}' distance {}", name.lexeme, distance);

        let scope: EnvRef = Self::ancestor(env, distance);
        let value: Option<Value> = scope.borrow().values.get(&name.lexeme).cloned();

        value.ok_or_else(|| {
            LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
        })
    }

    /// Write `name` in the scope `distance` hops up.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) {
        debug!("assign_at '{}' distance {}", name.lexeme, distance);

        Self::ancestor(env, distance)
            .borrow_mut()
            .define(&name.lexeme, value);
    }
}
