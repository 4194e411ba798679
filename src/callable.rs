//! Runtime object model: everything that can sit on the left of `(...)`,
//! plus class instances.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, info};

use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::interpreter::{Flow, Interpreter};
use crate::stmt::FunctionDecl;
use crate::token::Token;
use crate::value::Value;

/// Name of the method run on instantiation.
pub const INITIALIZER: &str = "init";

/// Native functions, user functions and classes.
pub trait Callable {
    /// Number of arguments a call must supply.
    fn arity(&self) -> usize;

    /// Invoke with already‑evaluated arguments.  `arguments.len()` has been
    /// checked against [`arity`](Callable::arity) by the caller; `paren` is
    /// the call's closing parenthesis, used to place errors.
    fn call(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Native functions
// ─────────────────────────────────────────────────────────────────────────────

pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: fn(&[Value]) -> std::result::Result<Value, String>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        self: Rc<Self>,
        _interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        debug!("Calling native function '{}'", self.name);

        let result: Value =
            (self.func)(&arguments).map_err(|message| LoxError::runtime(paren, message))?;

        info!("Native function '{}' returned: {}", self.name, result);

        Ok(result)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User functions
// ─────────────────────────────────────────────────────────────────────────────

/// A function declaration paired with the scope it was declared in.
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
    is_initializer: bool,
}

impl fmt::Debug for LoxFunction {
    // The closure may contain this very function; never print it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoxFunction({})", self.declaration.name.lexeme)
    }
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// A copy of this method whose closure additionally binds `this` to
    /// `instance`, and `super` to `superclass` when the owning class has one.
    pub fn bind(
        &self,
        instance: &Rc<RefCell<LoxInstance>>,
        superclass: Option<&Rc<LoxClass>>,
    ) -> LoxFunction {
        debug!("Binding method '{}'", self.name());

        let mut env: Environment = Environment::with_enclosing(Rc::clone(&self.closure));
        env.define("this", Value::Instance(Rc::clone(instance)));
        if let Some(superclass) = superclass {
            env.define("super", Value::Class(Rc::clone(superclass)));
        }

        LoxFunction {
            declaration: Rc::clone(&self.declaration),
            closure: env.into_ref(),
            is_initializer: self.is_initializer,
        }
    }

    /// The instance an initializer was bound to.
    fn bound_this(&self) -> Value {
        self.closure.borrow().get_local("this").unwrap_or(Value::Nil)
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        _paren: &Token,
    ) -> Result<Value> {
        debug!("Calling user-defined function '{}'", self.name());

        // Parent is the *defining* scope, not the caller's.
        let mut env: Environment = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            debug!("Binding parameter '{}' to {}", param.lexeme, argument);
            env.define(&param.lexeme, argument);
        }

        let flow: Flow = interpreter.execute_block(&self.declaration.body, env.into_ref())?;

        if self.is_initializer {
            return Ok(self.bound_this());
        }

        let value: Value = match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Nil,
        };

        info!("Function '{}' returned: {}", self.name(), value);

        Ok(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classes
// ─────────────────────────────────────────────────────────────────────────────

pub struct LoxClass {
    pub name: String,
    pub superclass: Option<Rc<LoxClass>>,
    methods: HashMap<String, Rc<LoxFunction>>,
}

impl fmt::Debug for LoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoxClass({})", self.name)
    }
}

impl LoxClass {
    pub fn new(
        name: impl Into<String>,
        superclass: Option<Rc<LoxClass>>,
        methods: HashMap<String, Rc<LoxFunction>>,
    ) -> Self {
        Self {
            name: name.into(),
            superclass,
            methods,
        }
    }

    /// Find `name` on this class or the nearest ancestor defining it,
    /// together with the superclass of the class that defines it.
    fn find_method(&self, name: &str) -> Option<(&Rc<LoxFunction>, Option<&Rc<LoxClass>>)> {
        match self.methods.get(name) {
            Some(method) => Some((method, self.superclass.as_ref())),
            None => self
                .superclass
                .as_ref()
                .and_then(|superclass| superclass.find_method(name)),
        }
    }

    /// Look up `name` along the superclass chain and bind it to `instance`.
    pub fn bind_method(
        &self,
        name: &str,
        instance: &Rc<RefCell<LoxInstance>>,
    ) -> Option<LoxFunction> {
        self.find_method(name)
            .map(|(method, superclass)| method.bind(instance, superclass))
    }
}

impl Callable for LoxClass {
    fn arity(&self) -> usize {
        self.find_method(INITIALIZER)
            .map_or(0, |(init, _)| init.arity())
    }

    fn call(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        debug!("Instantiating class '{}'", self.name);

        let instance: Rc<RefCell<LoxInstance>> =
            Rc::new(RefCell::new(LoxInstance::new(Rc::clone(&self))));

        if let Some(init) = self.bind_method(INITIALIZER, &instance) {
            Rc::new(init).call(interpreter, arguments, paren)?;
        }

        Ok(Value::Instance(instance))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Instances
// ─────────────────────────────────────────────────────────────────────────────

pub struct LoxInstance {
    class: Rc<LoxClass>,
    fields: HashMap<String, Value>,
}

impl fmt::Debug for LoxInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoxInstance({})", self.class.name)
    }
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }

    pub fn class(&self) -> &Rc<LoxClass> {
        &self.class
    }

    /// Fields shadow methods; methods are bound afresh on every access.
    pub fn get(instance: &Rc<RefCell<LoxInstance>>, name: &Token) -> Result<Value> {
        if let Some(value) = instance.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        let class: Rc<LoxClass> = Rc::clone(&instance.borrow().class);

        match class.bind_method(&name.lexeme, instance) {
            Some(method) => Ok(Value::Function(Rc::new(method))),
            None => Err(LoxError::runtime(
                name,
                format!("Undefined property '{}'.", name.lexeme),
            )),
        }
    }

    pub fn set(&mut self, name: &Token, value: Value) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}
