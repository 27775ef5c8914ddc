use crate::eval::EvalErr;
use crate::host::{HostBridge, HostValue};
use crate::parser::Expr;
use crate::procedure::Callable;
use std::{cmp, fmt};
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }

    // ints stay ints unless they overflow, anything touching a float is a float
    fn arith(self, rhs: Number, op: &str,
             int_op: fn(i64, i64) -> Option<i64>,
             float_op: fn(f64, f64) -> f64) -> Result<Number, EvalErr> {
        match (self, rhs) {
            (Number::Int(l), Number::Int(r)) => int_op(l, r)
                .map(Number::Int)
                .ok_or_else(|| EvalErr::Arithmetic(
                    format!("integer overflow in ({} {} {})", op, l, r))),
            (l, r) => Ok(Number::Float(float_op(l.as_f64(), r.as_f64()))),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, EvalErr> {
        self.arith(rhs, "+", i64::checked_add, |l, r| l + r)
    }

    pub fn sub(self, rhs: Number) -> Result<Number, EvalErr> {
        self.arith(rhs, "-", i64::checked_sub, |l, r| l - r)
    }

    pub fn mul(self, rhs: Number) -> Result<Number, EvalErr> {
        self.arith(rhs, "*", i64::checked_mul, |l, r| l * r)
    }

    /// Exact integer quotients stay integers, the rest become floats.
    pub fn div(self, rhs: Number) -> Result<Number, EvalErr> {
        match (self, rhs) {
            (Number::Int(_), Number::Int(0)) =>
                Err(EvalErr::Arithmetic("division by zero".to_string())),
            (Number::Int(l), Number::Int(r)) => match l.checked_rem(r) {
                Some(0) => Ok(Number::Int(l / r)),
                Some(_) => Ok(Number::Float(l as f64 / r as f64)),
                None => Err(EvalErr::Arithmetic(
                    format!("integer overflow in (/ {} {})", l, r))),
            },
            (l, r) => Ok(Number::Float(l.as_f64() / r.as_f64())),
        }
    }
}

impl cmp::PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        match (self, other) {
            (Number::Int(l), Number::Int(r)) => l == r,
            (l, r) => l.as_f64() == r.as_f64(),
        }
    }
}

impl cmp::PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<cmp::Ordering> {
        match (self, other) {
            (Number::Int(l), Number::Int(r)) => l.partial_cmp(r),
            (l, r) => l.as_f64().partial_cmp(&r.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            // Debug keeps the fraction on whole floats: 2.0 not 2
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////

/// A runtime value. Lists are immutable and shared.
#[derive(Clone, Debug)]
pub enum Value {
    Number(Number),
    Str(String),
    Bool(bool),
    List(Rc<Vec<Value>>),
    Symbol(String),
    Callable(Callable),
    Host(Rc<dyn HostBridge>),
}

impl Value {
    pub fn nil() -> Value {
        Value::List(Rc::new(Vec::new()))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn int(i: i64) -> Value {
        Value::Number(Number::Int(i))
    }

    pub fn float(x: f64) -> Value {
        Value::Number(Number::Float(x))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }

    /// `#f`, the empty list and numeric zero are false, all else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::List(items) => !items.is_empty(),
            Value::Number(n) => !n.is_zero(),
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::List(_) => "list",
            Value::Symbol(_) => "symbol",
            Value::Callable(Callable::Function(_)) => "function",
            Value::Callable(Callable::Macro(_)) => "macro",
            Value::Callable(Callable::Builtin(_)) => "builtin",
            Value::Host(_) => "host",
        }
    }

    pub fn as_number(&self, op: &str) -> Result<Number, EvalErr> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(EvalErr::TypeError(
                format!("'{}' expects numbers, got {} {}", op, other.type_name(), other))),
        }
    }

    pub fn as_list(&self, op: &str) -> Result<&[Value], EvalErr> {
        match self {
            Value::List(items) => Ok(items.as_slice()),
            other => Err(EvalErr::TypeError(
                format!("'{}' expects a list, got {} {}", op, other.type_name(), other))),
        }
    }

    /// Unwrap into a host primitive for crossing the interop boundary.
    pub fn to_host(&self) -> Result<HostValue, EvalErr> {
        Ok(match self {
            Value::Number(Number::Int(i)) => HostValue::Int(*i),
            Value::Number(Number::Float(x)) => HostValue::Float(*x),
            Value::Str(s) => HostValue::Str(s.clone()),
            Value::Bool(b) => HostValue::Bool(*b),
            Value::Symbol(s) => HostValue::Str(s.clone()),
            Value::List(items) => HostValue::List(
                items.iter().map(Value::to_host).collect::<Result<_, _>>()?),
            Value::Host(obj) => HostValue::Object(obj.clone()),
            Value::Callable(c) => return Err(EvalErr::TypeError(
                format!("{} can't be passed to the host", c))),
        })
    }
}

impl cmp::PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::List(l), Value::List(r)) => l == r,
            (Value::Symbol(l), Value::Symbol(r)) => l == r,
            (Value::Callable(l), Value::Callable(r)) => l == r,
            (Value::Host(l), Value::Host(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Callable(c) => write!(f, "{}", c),
            Value::Host(obj) => write!(f, "<host {}>", obj.type_name()),
            Value::List(items) => {
                let items: Vec<_> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "({})", items.join(" "))
            }
        }
    }
}

// quoted syntax as data
impl From<&Expr> for Value {
    fn from(expr: &Expr) -> Value {
        match expr {
            Expr::Number(n) => Value::Number(*n),
            Expr::Str(s) => Value::Str(s.clone()),
            Expr::Symbol(s) => Value::Symbol(s.clone()),
            Expr::List(items) => Value::list(items.iter().map(Value::from).collect()),
            Expr::Const(v) => v.clone(),
        }
    }
}

impl From<HostValue> for Value {
    fn from(hv: HostValue) -> Value {
        match hv {
            HostValue::Nil => Value::nil(),
            HostValue::Bool(b) => Value::Bool(b),
            HostValue::Int(i) => Value::int(i),
            HostValue::Float(x) => Value::float(x),
            HostValue::Str(s) => Value::Str(s),
            HostValue::List(items) => Value::list(items.into_iter().map(Value::from).collect()),
            HostValue::Object(obj) => Value::Host(obj),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
