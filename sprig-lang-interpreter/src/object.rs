use std::fmt::Display;

use gc::{Finalize, Gc, Trace};
use sprig_lang_core::ast;
use sprig_lang_core::lexer::Span;
use thiserror::Error;

use crate::environment::Environment;

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub enum Value {
    Null,
    Number(f64),
    Boolean(bool),
    /// Properties in source order, keys unique.
    Object(Vec<(String, Gc<Value>)>),
    Function(Function),
    NativeFunction(NativeFunction),
}

thread_local! {
    static NULL: Gc<Value> = Gc::new(Value::Null);
    static TRUE: Gc<Value> = Gc::new(Value::Boolean(true));
    static FALSE: Gc<Value> = Gc::new(Value::Boolean(false));
}

impl Value {
    pub fn null() -> Gc<Value> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Gc<Value> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn number(value: f64) -> Gc<Value> {
        Gc::new(Value::Number(value))
    }
    pub fn object(properties: Vec<(String, Gc<Value>)>) -> Gc<Value> {
        Gc::new(Value::Object(properties))
    }
    pub fn function(
        name: String,
        parameters: Vec<String>,
        body: Vec<ast::Statement>,
        span: Span,
        env: Environment,
    ) -> Gc<Value> {
        Gc::new(Value::Function(Function {
            name,
            parameters,
            body,
            span,
            env,
        }))
    }
    pub fn native_function(name: &str, func: NativeFn) -> Gc<Value> {
        Gc::new(Value::NativeFunction(NativeFunction {
            name: name.to_owned(),
            func,
        }))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Object(properties) => {
                write!(f, "{{")?;
                for (i, (key, value)) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(function) => write!(f, "<fn {}>", function.name),
            Value::NativeFunction(native) => write!(f, "<native fn {}>", native.name),
        }
    }
}

/// A user function closing over the environment active at its declaration
/// site. Immutable once created.
#[derive(Clone, Trace, Finalize)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<String>,
    #[unsafe_ignore_trace]
    pub body: Vec<ast::Statement>,
    #[unsafe_ignore_trace]
    pub span: Span,
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.parameters == other.parameters
            && self.body == other.body
            && self.env.ptr_eq(&other.env)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("ptr", &(self as *const Function as usize))
            .finish()
    }
}

/// A host callable. The core only fixes the calling convention: it receives
/// the caller's environment and the evaluated arguments.
pub type NativeFn = fn(&Environment, Vec<Gc<Value>>) -> Result<Gc<Value>, EvalError>;

#[derive(Clone, Trace, Finalize)]
pub struct NativeFunction {
    pub name: String,
    #[unsafe_ignore_trace]
    pub func: NativeFn,
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.func as usize == other.func as usize
    }
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvalError {
    #[error("unknown identifier {name:?} at {span}")]
    UnknownIdentifier { name: String, span: Span },
    #[error("{name:?} is already declared in this scope at {span}")]
    DuplicateDeclaration { name: String, span: Span },
    #[error("cannot assign to constant {name:?} at {span}")]
    AssignmentToConstant { name: String, span: Span },
    #[error("assignment target must be an identifier at {span}")]
    InvalidAssignmentTarget { span: Span },
    #[error("called a value that is not a function at {span}")]
    CallNonFunction { span: Span },
    #[error("member access on a non-object value at {span}")]
    MemberAccessOnNonObject { span: Span },
    #[error("value cannot be used as a property key at {span}")]
    InvalidPropertyKey { span: Span },
    #[error("native function {name}: {message}")]
    NativeFunction { name: String, message: String },
}
