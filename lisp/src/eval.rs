use crate::env::Environment;
use crate::host::HostError;
use crate::parser::Expr;
use crate::procedure::{Arity, Callable, Lambda, Native};
use crate::value::Value;
use thiserror::Error;

#[derive(Clone, PartialEq, Debug, Error)]
pub enum EvalErr {
    #[error("unbound symbol '{0}'")]
    UnboundSymbol(String),
    #[error("{0} is not callable")]
    NotCallable(String),
    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityError { name: String, expected: Arity, got: usize },
    #[error("type error: {0}")]
    TypeError(String),
    #[error("malformed {form}: {reason}")]
    SyntaxFormError { form: String, reason: String },
    #[error("stack exhausted at evaluation depth {depth}")]
    StackExhausted { depth: usize },
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl EvalErr {
    pub fn syntax<F: Into<String>, R: Into<String>>(form: F, reason: R) -> EvalErr {
        EvalErr::SyntaxFormError{form: form.into(), reason: reason.into()}
    }
}

/// Nested `eval` calls allowed by default, sized for an 8 MiB stack.
/// A non-tail Lisp call costs about three of them.
pub const DEFAULT_MAX_DEPTH: usize = 2000;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Config {
    /// Nested `eval` calls allowed before giving up with `StackExhausted`.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config{max_depth: DEFAULT_MAX_DEPTH}
    }
}

pub struct Interpreter {
    config: Config,
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::with_config(Config::default())
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Interpreter{config, depth: 0}
    }

    pub fn config(&self) -> &Config { &self.config }

    /// Evaluate forms in order, the last value is the result.
    pub fn evaluate(&mut self, exprs: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
        let mut last = Value::nil();
        for expr in exprs {
            last = self.eval(expr, env)?;
        }
        Ok(last)
    }

    pub fn eval(&mut self, expr: &Expr, env: &Environment) -> Result<Value, EvalErr> {
        if self.depth >= self.config.max_depth {
            debug!("eval depth limit {} hit at {}", self.config.max_depth, expr);
            return Err(EvalErr::StackExhausted{depth: self.depth});
        }
        self.depth += 1;
        let result = self.eval_expr(expr, env);
        self.depth -= 1;
        result
    }

    fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> Result<Value, EvalErr> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Const(v) => Ok(v.clone()),
            Expr::Symbol(sym) => env.lookup(sym)
                .ok_or_else(|| EvalErr::UnboundSymbol(sym.clone())),
            Expr::List(list) => match list.split_first() {
                None => Ok(Value::nil()),
                Some((op, args)) => match self.eval(op, env)? {
                    Value::Callable(callable) => self.apply(&callable, args, env),
                    other => Err(EvalErr::NotCallable(other.to_string())),
                }
            }
        }
    }

    pub fn eval_args(&mut self, args: &[Expr], env: &Environment) -> Result<Vec<Value>, EvalErr> {
        args.iter().map(|arg| self.eval(arg, env)).collect()
    }

    /// Apply `callable` to unevaluated `args` as written at the call site.
    pub fn apply(&mut self, callable: &Callable, args: &[Expr], env: &Environment)
            -> Result<Value, EvalErr> {
        match callable {
            Callable::Builtin(builtin) => {
                builtin.arity.check(builtin.name, args.len())?;
                match builtin.native {
                    Native::Function(fp) => fp(&self.eval_args(args, env)?),
                    Native::Form(fp) => fp(self, args, env),
                }
            },
            Callable::Function(lambda) => {
                Arity::Exact(lambda.params.len()).check(lambda.name(), args.len())?;
                let args = self.eval_args(args, env)?;
                self.eval(&lambda.body, &lambda.frame(args))
            },
            Callable::Macro(lambda) => {
                let expansion = self.expand(lambda, args)?;
                self.eval(&expansion, env)
            },
        }
    }

    /// Run a macro body over its unevaluated arguments and read the
    /// resulting value back as code.
    pub fn expand(&mut self, lambda: &Lambda, args: &[Expr]) -> Result<Expr, EvalErr> {
        Arity::Exact(lambda.params.len()).check(lambda.name(), args.len())?;
        let forms = args.iter().map(Value::from).collect();
        let expansion = self.eval(&lambda.body, &lambda.frame(forms))?;
        debug!("macro {} expanded to {}", lambda.name(), expansion);
        Ok(Expr::from(expansion))
    }
}
