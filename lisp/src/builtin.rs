use crate::env::Environment;
use crate::eval::{EvalErr, Interpreter};
use crate::parser::Expr;
use crate::procedure::{Arity, Builtin, Callable, Lambda};
use crate::value::{Number, Value};
use std::rc::Rc;

macro_rules! check {
    ($argcheck:expr, $err:expr) => {
        if ! $argcheck { return Err($err); }
    }
}

/// A fresh global scope holding every builtin plus `nil`, `#t` and `#f`.
pub fn default_environment() -> Environment {
    let env = Environment::new();
    for builtin in catalog() {
        env.bind(builtin.name, Value::Callable(Callable::Builtin(Rc::new(builtin))));
    }
    env.bind("nil", Value::nil());
    env.bind("#t", Value::Bool(true));
    env.bind("#f", Value::Bool(false));
    env
}

fn catalog() -> Vec<Builtin> {
    use Arity::*;
    vec![
        Builtin::form("define", Exact(2), define),
        Builtin::form("lambda", Exact(2), lambda),
        Builtin::form("fn", Exact(3), named_fn),
        Builtin::form("defmacro", Exact(3), defmacro),
        Builtin::form("if", Exact(3), if_form),
        Builtin::form("quote", Range(0, 1), quote),
        Builtin::form("backquote", Range(0, 1), backquote),
        Builtin::form("unquote", Range(0, 1), unquote),
        Builtin::form("do", AtLeast(0), do_form),

        Builtin::function("+", AtLeast(1), |args| reduce("+", args, Number::add)),
        Builtin::function("-", AtLeast(1), |args| reduce("-", args, Number::sub)),
        Builtin::function("*", AtLeast(1), |args| reduce("*", args, Number::mul)),
        Builtin::function("/", AtLeast(1), |args| reduce("/", args, Number::div)),
        Builtin::function("=", Exact(2), |args| compare("=", args, |l, r| l == r)),
        Builtin::function("<", Exact(2), |args| compare("<", args, |l, r| l < r)),
        Builtin::function(">", Exact(2), |args| compare(">", args, |l, r| l > r)),
        Builtin::function("eq?", Exact(2), |args| Ok(Value::Bool(args[0] == args[1]))),

        Builtin::function("list", AtLeast(0), |args| Ok(Value::list(args.to_vec()))),
        Builtin::function("cons", Exact(2), cons),
        Builtin::function("first", Exact(1), first),
        Builtin::function("rest", Exact(1), rest),
        Builtin::function("empty?", Exact(1), |args| Ok(Value::Bool(args[0].as_list("empty?")?.is_empty()))),
        Builtin::function("len", Exact(1), len),
        Builtin::function("type", Exact(1), |args| Ok(Value::Symbol(args[0].type_name().to_string()))),
        Builtin::function("print", AtLeast(0), print),

        Builtin::function(".", Exact(2), get_attribute),
        Builtin::function("!", AtLeast(1), invoke),
    ]
}

///////////////////////////////////////////////////////////////////////////////
// Forms, arguments come in unevaluated

fn symbol_name<'e>(form: &str, expr: &'e Expr) -> Result<&'e str, EvalErr> {
    match expr {
        Expr::Symbol(name) => Ok(name.as_str()),
        other => Err(EvalErr::syntax(form, format!("expected a symbol, found {}", other))),
    }
}

fn param_list(form: &str, expr: &Expr) -> Result<Vec<String>, EvalErr> {
    match expr {
        Expr::List(params) => params.iter()
            .map(|p| symbol_name(form, p).map(String::from))
            .collect(),
        other => Err(EvalErr::syntax(form, format!("expected a parameter list, found {}", other))),
    }
}

fn closure(name: Option<&str>, form: &str, params: &Expr, body: &Expr, env: &Environment)
        -> Result<Rc<Lambda>, EvalErr> {
    Ok(Rc::new(Lambda{
        name: name.map(String::from),
        params: param_list(form, params)?,
        body: body.clone(),
        env: env.clone(),
    }))
}

fn define(interp: &mut Interpreter, args: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    let name = symbol_name("define", &args[0])?;
    let value = interp.eval(&args[1], env)?;
    Ok(env.bind(name, value))
}

fn lambda(_: &mut Interpreter, args: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    let lambda = closure(None, "lambda", &args[0], &args[1], env)?;
    Ok(Value::Callable(Callable::Function(lambda)))
}

// binds itself into the defining scope so the body can recurse
fn named_fn(_: &mut Interpreter, args: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    let name = symbol_name("fn", &args[0])?;
    let lambda = closure(Some(name), "fn", &args[1], &args[2], env)?;
    Ok(env.bind(name, Value::Callable(Callable::Function(lambda))))
}

fn defmacro(_: &mut Interpreter, args: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    let name = symbol_name("defmacro", &args[0])?;
    let lambda = closure(Some(name), "defmacro", &args[1], &args[2], env)?;
    Ok(env.bind(name, Value::Callable(Callable::Macro(lambda))))
}

fn if_form(interp: &mut Interpreter, args: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    let (test, conseq, alt) = (&args[0], &args[1], &args[2]);
    match interp.eval(test, env)?.is_truthy() {
        true => interp.eval(conseq, env),
        false => interp.eval(alt, env),
    }
}

fn quote(_: &mut Interpreter, args: &[Expr], _: &Environment) -> Result<Value, EvalErr> {
    Ok(args.first().map(Value::from).unwrap_or_else(Value::nil))
}

fn unquote(interp: &mut Interpreter, args: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    match args.first() {
        Some(expr) => interp.eval(expr, env),
        None => Ok(Value::nil()),
    }
}

fn backquote(interp: &mut Interpreter, args: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    match args.first() {
        Some(template) => fill_template(interp, template, env),
        None => Ok(Value::nil()),
    }
}

// copy the template, evaluating in place every (unquote x) found
fn fill_template(interp: &mut Interpreter, template: &Expr, env: &Environment)
        -> Result<Value, EvalErr> {
    let items = match template {
        Expr::List(items) => items,
        other => return Ok(Value::from(other)),
    };
    if let Some((Expr::Symbol(head), args)) = items.split_first() {
        let resolves_to_unquote = matches!(env.lookup(head),
            Some(Value::Callable(c)) if c.is_builtin("unquote"));
        if resolves_to_unquote {
            Arity::Range(0, 1).check("unquote", args.len())?;
            return unquote(interp, args, env);
        }
    }
    let items = items.iter()
        .map(|item| fill_template(interp, item, env))
        .collect::<Result<_, _>>()?;
    Ok(Value::list(items))
}

fn do_form(interp: &mut Interpreter, args: &[Expr], env: &Environment) -> Result<Value, EvalErr> {
    interp.evaluate(args, env)
}

///////////////////////////////////////////////////////////////////////////////
// Functions, arguments come in evaluated

fn reduce(op: &str, args: &[Value], f: fn(Number, Number) -> Result<Number, EvalErr>)
        -> Result<Value, EvalErr> {
    let (head, tail) = args.split_first().ok_or_else(||
        EvalErr::ArityError{name: op.to_string(), expected: Arity::AtLeast(1), got: 0})?;
    let mut acc = head.as_number(op)?;
    for arg in tail {
        acc = f(acc, arg.as_number(op)?)?;
    }
    Ok(Value::Number(acc))
}

fn compare(op: &str, args: &[Value], f: fn(Number, Number) -> bool) -> Result<Value, EvalErr> {
    Ok(Value::Bool(f(args[0].as_number(op)?, args[1].as_number(op)?)))
}

fn cons(args: &[Value]) -> Result<Value, EvalErr> {
    let tail = args[1].as_list("cons")?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend(tail.iter().cloned());
    Ok(Value::list(items))
}

fn first(args: &[Value]) -> Result<Value, EvalErr> {
    let items = args[0].as_list("first")?;
    check!(!items.is_empty(), EvalErr::TypeError("'first' of an empty list".to_string()));
    Ok(items[0].clone())
}

fn rest(args: &[Value]) -> Result<Value, EvalErr> {
    let items = args[0].as_list("rest")?;
    Ok(Value::list(items.iter().skip(1).cloned().collect()))
}

fn len(args: &[Value]) -> Result<Value, EvalErr> {
    let n = match &args[0] {
        Value::Str(s) => s.chars().count(),
        other => other.as_list("len")?.len(),
    };
    Ok(Value::int(n as i64))
}

fn print(args: &[Value]) -> Result<Value, EvalErr> {
    let line: Vec<_> = args.iter().map(|a| a.to_string()).collect();
    println!("{}", line.join(" "));
    Ok(Value::nil())
}

fn get_attribute(args: &[Value]) -> Result<Value, EvalErr> {
    let field = match &args[1] {
        Value::Str(s) | Value::Symbol(s) => s,
        other => return Err(EvalErr::TypeError(
            format!("'.' field must be a string or symbol, got {}", other.type_name()))),
    };
    match &args[0] {
        Value::Host(obj) => Ok(Value::from(obj.get_attribute(field)?)),
        other => Err(EvalErr::TypeError(
            format!("'.' expects a host object, got {} {}", other.type_name(), other))),
    }
}

fn invoke(args: &[Value]) -> Result<Value, EvalErr> {
    let obj = match &args[0] {
        Value::Host(obj) => obj,
        other => return Err(EvalErr::TypeError(
            format!("'!' expects a host object, got {} {}", other.type_name(), other))),
    };
    let host_args = args[1..].iter().map(Value::to_host).collect::<Result<_, _>>()?;
    Ok(Value::from(obj.invoke(host_args)?))
}
