//! A small Lisp: a regex driven reader, a tree-walking evaluator with
//! copy-on-extend environments, user macros, quasiquoting and a narrow
//! bridge to host objects.

macro_rules! debug {
    ($($args:tt)*) => (if cfg!(feature="debug") { eprintln!($($args)*); })
}

mod builtin;
mod env;
mod eval;
mod host;
mod parser;
mod procedure;
mod value;

pub use builtin::default_environment;
pub use env::Environment;
pub use eval::{Config, EvalErr, Interpreter, DEFAULT_MAX_DEPTH};
pub use host::{HostBridge, HostError, HostFn, HostRecord, HostValue};
pub use parser::{Expr, ParseError, Parser, MAX_PARSE_DEPTH};
pub use procedure::{Arity, Builtin, Callable, Lambda, NativeFn, NativeForm};
pub use value::{Number, Value};

use thiserror::Error;

#[derive(Clone, PartialEq, Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("eval error: {0}")]
    Eval(#[from] EvalErr),
}

pub fn parse(source: &str) -> Result<Vec<Expr>, ParseError> {
    Parser::parse_str(source)
}

/// Evaluate a program with the default configuration.
pub fn evaluate(exprs: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    Interpreter::new().evaluate(exprs, env)
}

pub fn eval_str(source: &str, env: &Environment) -> Result<Value, Error> {
    let exprs = parse(source)?;
    Ok(evaluate(&exprs, env)?)
}

#[cfg(test)]
mod eval_test;
