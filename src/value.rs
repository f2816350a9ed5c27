//! Runtime value type and associated utilities.
//!
//! Lives in its own module so the interpreter submodules and the CLI can
//! import it without pulling in each other.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::ast::{Stmt, TypeTag};
use crate::source::Span;

// ---------------------------------------------------------------------------
// RuntimeError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("執行之禍: {msg}")]
    Error { msg: String, span: Option<Span> },
    /// Internal signal: `乃止` — consumed by the enclosing loop.
    #[error("乃止須在循環中")]
    Break,
    /// Internal signal: `乃止是遍` — consumed by the enclosing loop.
    #[error("乃止是遍須在循環中")]
    Continue,
    /// Internal signal: a return form — consumed by the enclosing call.
    #[error("乃得須在術中")]
    Return(Box<Value>),
    /// Internal signal: `嗚呼 … 之禍` — consumed by `姑妄行此`, or surfaced
    /// as `未獲之禍` when nothing catches it.
    #[error("未獲之禍")]
    Raised(Box<Value>),
}

impl RuntimeError {
    pub fn msg(msg: impl Into<String>) -> Self {
        RuntimeError::Error {
            msg: msg.into(),
            span: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// Scope stack: innermost scope last. Frames are shared so closures can
/// write through to enclosing-function locals.
pub type Scope = HashMap<String, Value>;
pub type ScopeChain = Vec<Rc<RefCell<Scope>>>;

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, TypeTag)>,
    pub rest: Option<String>,
    pub body: Rc<Vec<Stmt>>,
    pub env: ScopeChain,
    /// Arguments already fixed by partial application.
    pub bound: Vec<Value>,
}

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Unit,
    List(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Vec<(String, Value)>>>),
    Fn(Rc<Function>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn object(fields: Vec<(String, Value)>) -> Value {
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    /// The type-specific zero an uninitialised slot defaults to.
    pub fn default_for(ty: TypeTag) -> Value {
        match ty {
            TypeTag::Num => Value::Int(0),
            TypeTag::List => Value::list(Vec::new()),
            TypeTag::Str => Value::Str(String::new()),
            TypeTag::Bool => Value::Bool(false),
            TypeTag::Object => Value::object(Vec::new()),
            TypeTag::Unit => Value::Unit,
        }
    }
}

/// Structural equality; functions compare by identity. Numeric values keep
/// their kind here — the language-level `等於` (which crosses Int/Float) is
/// `Interpreter::values_eq`.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Unit, Value::Unit) => true,
            (Value::List(a), Value::List(b)) => *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => *a.borrow() == *b.borrow(),
            (Value::Fn(a), Value::Fn(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Human-readable representation of a value — what `書之` prints.
pub fn wenyan_repr(val: &Value) -> String {
    match val {
        Value::Int(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Str(s) => s.clone(),
        Value::Bool(b) => if *b { "陽" } else { "陰" }.to_string(),
        Value::Unit => "空無".to_string(),
        Value::List(items) => {
            let parts: Vec<String> = items.borrow().iter().map(wenyan_repr_inner).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(fields) => {
            let parts: Vec<String> = fields
                .borrow()
                .iter()
                .map(|(k, v)| format!("{}: {}", k, wenyan_repr_inner(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Fn(func) => format!("<術 {}>", func.name),
    }
}

/// Like `wenyan_repr` but strings keep their quotes — used inside lists
/// and objects.
fn wenyan_repr_inner(val: &Value) -> String {
    match val {
        Value::Str(s) => format!("「「{}」」", s),
        other => wenyan_repr(other),
    }
}
