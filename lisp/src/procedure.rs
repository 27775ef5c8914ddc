use crate::env::Environment;
use crate::eval::{EvalErr, Interpreter};
use crate::parser::Expr;
use crate::value::Value;
use std::{cmp, fmt};
use std::rc::Rc;

pub type NativeFn = fn(&[Value]) -> Result<Value, EvalErr>;
pub type NativeForm = fn(&mut Interpreter, &[Expr], &Environment) -> Result<Value, EvalErr>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exact(e) => n == e,
            Arity::AtLeast(min) => n >= min,
            Arity::Range(min, max) => min <= n && n <= max,
        }
    }

    pub fn check(&self, name: &str, got: usize) -> Result<(), EvalErr> {
        match self.accepts(got) {
            true => Ok(()),
            false => Err(EvalErr::ArityError{name: name.to_string(), expected: *self, got}),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Exact(e) => write!(f, "{}", e),
            Arity::AtLeast(min) => write!(f, "at least {}", min),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
        }
    }
}

pub(crate) enum Native {
    // arguments arrive evaluated
    Function(NativeFn),
    // arguments arrive as syntax
    Form(NativeForm),
}

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub(crate) native: Native,
}

impl Builtin {
    pub fn function(name: &'static str, arity: Arity, fp: NativeFn) -> Builtin {
        Builtin{name, arity, native: Native::Function(fp)}
    }

    pub fn form(name: &'static str, arity: Arity, fp: NativeForm) -> Builtin {
        Builtin{name, arity, native: Native::Form(fp)}
    }
}

/// Body of a user `lambda`/`fn` or `defmacro`.
pub struct Lambda {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Expr,
    pub env: Environment,
}

impl Lambda {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("lambda")
    }

    /// Child scope of the defining environment with params bound positionally.
    pub fn frame(&self, args: Vec<Value>) -> Environment {
        let frame = self.env.extend();
        for (param, arg) in self.params.iter().zip(args) {
            frame.bind(param.as_str(), arg);
        }
        frame
    }
}

#[derive(Clone)]
pub enum Callable {
    Function(Rc<Lambda>),
    Macro(Rc<Lambda>),
    Builtin(Rc<Builtin>),
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::Function(l) | Callable::Macro(l) => l.name(),
            Callable::Builtin(b) => b.name,
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        matches!(self, Callable::Builtin(b) if b.name == name)
    }
}

// identity, two closures are never equal just because they look alike
impl cmp::PartialEq for Callable {
    fn eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Function(l), Callable::Function(r)) => Rc::ptr_eq(l, r),
            (Callable::Macro(l), Callable::Macro(r)) => Rc::ptr_eq(l, r),
            (Callable::Builtin(l), Callable::Builtin(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Callable::Function(l) => write!(f, "<function {}>", l.name()),
            Callable::Macro(l) => write!(f, "<macro {}>", l.name()),
            Callable::Builtin(b) => write!(f, "<builtin {}>", b.name),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Callable::Function(l) | Callable::Macro(l) =>
                write!(f, "{} ({}) {}", self, l.params.join(" "), l.body),
            Callable::Builtin(_) => write!(f, "{}", self),
        }
    }
}
