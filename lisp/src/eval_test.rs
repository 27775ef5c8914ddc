use crate::{default_environment, eval_str, parse};
use crate::{Arity, Config, Environment, Error, EvalErr, Interpreter, Value};
use crate::{HostError, HostFn, HostRecord, HostValue};
use std::rc::Rc;

fn eval(source: &str) -> Result<Value, Error> {
    eval_str(source, &default_environment())
}

fn eval_err(source: &str) -> EvalErr {
    match eval(source) {
        Err(Error::Eval(e)) => e,
        other => panic!("expected an eval error for {}, got {:?}", source, other),
    }
}

fn ints(items: &[i64]) -> Value {
    Value::list(items.iter().map(|i| Value::int(*i)).collect())
}

#[test]
fn quote_round_trip() -> Result<(), Error> {
    assert_eq!(eval("(quote (1 2 3))")?, ints(&[1, 2, 3]));
    assert_eq!(eval("'(1 \"a\" b)")?, Value::list(vec![
        Value::int(1), Value::Str("a".to_string()), Value::Symbol("b".to_string()),
    ]));
    assert_eq!(eval("'sym")?, Value::Symbol("sym".to_string()));
    assert_eq!(eval("(quote)")?, Value::nil());
    Ok(())
}

#[test]
fn arithmetic() -> Result<(), Error> {
    assert_eq!(eval("(+ 1 2 3)")?, Value::int(6));
    assert_eq!(eval("(- 10 3 2)")?, Value::int(5));
    assert_eq!(eval("(* 2 3 4)")?, Value::int(24));
    assert_eq!(eval("(/ 12 2 3)")?, Value::int(2));
    assert_eq!(eval("(/ 7 2)")?, Value::float(3.5));
    assert_eq!(eval("(+ (/ 3 2) 2)")?, Value::float(3.5));
    assert_eq!(eval("(- 5)")?, Value::int(5));
    assert_eq!(eval("(/ 1 4)")?.to_string(), "0.25");
    Ok(())
}

#[test]
fn arithmetic_errors() {
    for op in &["+", "-", "*", "/"] {
        assert_eq!(eval_err(&format!("({})", op)), EvalErr::ArityError{
            name: op.to_string(), expected: Arity::AtLeast(1), got: 0,
        });
    }
    assert!(matches!(eval_err("(+ 1 \"a\")"), EvalErr::TypeError(_)));
    assert!(matches!(eval_err("(/ 1 0)"), EvalErr::Arithmetic(_)));
    assert!(matches!(eval_err("(* 9223372036854775807 2)"), EvalErr::Arithmetic(_)));
    assert!(matches!(eval_err("(/ (- 0 9223372036854775807 1) (- 0 1))"), EvalErr::Arithmetic(_)));
}

#[test]
fn comparisons() -> Result<(), Error> {
    assert_eq!(eval("(< 1 2)")?, Value::Bool(true));
    assert_eq!(eval("(> 1 2)")?, Value::Bool(false));
    assert_eq!(eval("(= 3 (* (/ 3 2) 2))")?, Value::Bool(true));
    assert_eq!(eval("(eq? '(1 2) (list 1 2))")?, Value::Bool(true));
    assert_eq!(eval("(eq? 'a \"a\")")?, Value::Bool(false));
    assert_eq!(eval("(eq? first first)")?, Value::Bool(true));
    assert_eq!(eval_err("(eq? 1)"), EvalErr::ArityError{
        name: "eq?".to_string(), expected: Arity::Exact(2), got: 1,
    });
    Ok(())
}

#[test]
fn lexical_scoping() -> Result<(), Error> {
    let src = "
        (define make_adder (lambda (n) (lambda (x) (+ x n))))
        (define add5 (make_adder 5))
        (define n 100)
        (add5 1)";
    assert_eq!(eval(src)?, Value::int(6));

    // free variables never resolve from the call site
    let src = "
        (define f (lambda () y))
        ((lambda (y) (f)) 5)";
    assert_eq!(eval_err(src), EvalErr::UnboundSymbol("y".to_string()));
    Ok(())
}

#[test]
fn shadowing_isolation() -> Result<(), Error> {
    let env = default_environment();
    eval_str("(define x 1)", &env)?;
    assert_eq!(eval_str("((lambda (x) (do (define x 99) x)) 5)", &env)?, Value::int(99));
    assert_eq!(eval_str("x", &env)?, Value::int(1));
    eval_str("((lambda (y) (define z 42)) 0)", &env)?;
    assert!(!env.contains("z"));
    Ok(())
}

#[test]
fn if_short_circuit() -> Result<(), Error> {
    assert_eq!(eval("(if #f (undefined_fn) 42)")?, Value::int(42));
    assert_eq!(eval("(if 1 \"yes\" (undefined_fn))")?, Value::Str("yes".to_string()));
    assert_eq!(eval("(if 0 1 2)")?, Value::int(2));
    assert_eq!(eval("(if '() 1 2)")?, Value::int(2));
    assert_eq!(eval("(if nil 1 2)")?, Value::int(2));
    assert_eq!(eval("(if \"\" 1 2)")?, Value::int(1));
    assert!(matches!(eval_err("(if #t 1)"), EvalErr::ArityError{..}));
    Ok(())
}

#[test]
fn macro_argument_timing() -> Result<(), Error> {
    assert_eq!(eval("(defmacro ignore (x) 42) (ignore (undefined_fn))")?, Value::int(42));
    assert_eq!(eval_err("(define ignoref (lambda (x) 42)) (ignoref (undefined_fn))"),
               EvalErr::UnboundSymbol("undefined_fn".to_string()));
    // arguments arrive as data
    assert_eq!(eval("(defmacro as_data (x) (list 'quote x)) (as_data (a 1))")?,
               Value::list(vec![Value::Symbol("a".to_string()), Value::int(1)]));
    Ok(())
}

#[test]
fn macro_expansion() -> Result<(), Error> {
    let src = "
        (defmacro unless (c a b) `(if ,c ,b ,a))
        (unless #f 1 (undefined_fn))";
    assert_eq!(eval(src)?, Value::int(1));

    // expansion happens in the caller's scope
    let src = "
        (defmacro twice (e) `(+ ,e ,e))
        ((lambda (k) (twice (* k 3))) 2)";
    assert_eq!(eval(src)?, Value::int(12));

    // an expansion may splice in values that have no source syntax
    assert_eq!(eval("(defmacro getf () first) ((getf) '(7 8))")?, Value::int(7));

    assert_eq!(eval_err("(defmacro m (a) a) (m 1 2)"), EvalErr::ArityError{
        name: "m".to_string(), expected: Arity::Exact(1), got: 2,
    });
    Ok(())
}

#[test]
fn backquote() -> Result<(), Error> {
    assert_eq!(eval("`(1 ,(+ 1 1) 3)")?, ints(&[1, 2, 3]));
    assert_eq!(eval("`(a (b ,(* 2 3)))")?.to_string(), "(a (b 6))");
    assert_eq!(eval("`x")?, Value::Symbol("x".to_string()));
    assert_eq!(eval("(backquote)")?, Value::nil());
    assert_eq!(eval(",(+ 1 2)")?, Value::int(3));
    // only the builtin unquote is special
    assert_eq!(eval("((lambda (unquote) `(a ,b)) 1)")?.to_string(), "(a (unquote b))");
    Ok(())
}

#[test]
fn error_cases() {
    assert_eq!(eval_err("(foo)"), EvalErr::UnboundSymbol("foo".to_string()));
    assert_eq!(eval_err("(1 2 3)"), EvalErr::NotCallable("1".to_string()));
    assert_eq!(eval_err("((lambda (x y) x) 1)"), EvalErr::ArityError{
        name: "lambda".to_string(), expected: Arity::Exact(2), got: 1,
    });
    assert!(matches!(eval_err("(lambda x x)"),
                     EvalErr::SyntaxFormError{form, ..} if form == "lambda"));
    assert!(matches!(eval_err("(lambda (x 1) x)"), EvalErr::SyntaxFormError{..}));
    assert!(matches!(eval_err("(define 1 2)"), EvalErr::SyntaxFormError{..}));
    assert!(matches!(eval("(a"), Err(Error::Parse(_))));
    assert_eq!(eval("(foo)").map_err(|e| e.to_string()),
               Err("eval error: unbound symbol 'foo'".to_string()));
}

#[test]
fn stack_exhausted() -> Result<(), Error> {
    let env = default_environment();
    let mut interp = Interpreter::with_config(Config{max_depth: 64});
    let prog = parse("(fn spin (n) (spin (+ n 1))) (spin 0)")?;
    assert_eq!(interp.evaluate(&prog, &env), Err(EvalErr::StackExhausted{depth: 64}));
    // the depth counter unwinds with the error
    assert_eq!(interp.evaluate(&parse("(spin_or_add)")?, &env),
               Err(EvalErr::UnboundSymbol("spin_or_add".to_string())));
    assert_eq!(interp.evaluate(&parse("(+ 1 2)")?, &env), Ok(Value::int(3)));
    Ok(())
}

#[test]
fn default_depth_fits_plain_recursion() {
    // a main thread sized stack
    let worker = std::thread::Builder::new()
        .stack_size(8 << 20)
        .spawn(|| {
            let env = default_environment();
            let prog = parse("
                (fn count (n) (if (= n 0) 0 (+ 1 (count (- n 1)))))
                (count 200)").unwrap();
            let mut interp = Interpreter::with_config(Config::default());
            interp.evaluate(&prog, &env).map_err(|e| e.to_string())?;
            let deep = parse("(count 500)").unwrap();
            interp.evaluate(&deep, &env).map(|v| v.to_string()).map_err(|e| e.to_string())
        })
        .unwrap();
    assert_eq!(worker.join().unwrap(), Ok("500".to_string()));
}

#[test]
fn default_depth_limit() {
    let worker = std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(|| {
            let env = default_environment();
            let prog = parse("(fn spin (n) (spin (+ n 1))) (spin 0)").unwrap();
            crate::evaluate(&prog, &env).err()
        })
        .unwrap();
    assert_eq!(worker.join().unwrap(), Some(EvalErr::StackExhausted{depth: crate::DEFAULT_MAX_DEPTH}));
}

#[test]
fn recursion_and_sequencing() -> Result<(), Error> {
    let src = "
        (fn fact (n) (if (< n 2) 1 (* n (fact (- n 1)))))
        (fact 10)";
    assert_eq!(eval(src)?, Value::int(3628800));
    let src = "
        (define fib (lambda (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2))))))
        (fib 10)";
    assert_eq!(eval(src)?, Value::int(55));
    assert_eq!(eval("(do (define a 1) (define b 2) (+ a b))")?, Value::int(3));
    assert_eq!(eval("(do)")?, Value::nil());
    assert_eq!(eval("(define v 7)")?, Value::int(7));
    assert_eq!(eval("")?, Value::nil());
    assert_eq!(eval("()")?, Value::nil());
    Ok(())
}

#[test]
fn list_builtins() -> Result<(), Error> {
    assert_eq!(eval("(list 1 (+ 1 1))")?, ints(&[1, 2]));
    assert_eq!(eval("(cons 1 '(2 3))")?, ints(&[1, 2, 3]));
    assert_eq!(eval("(first '(1 2))")?, Value::int(1));
    assert_eq!(eval("(rest '(1 2))")?, ints(&[2]));
    assert_eq!(eval("(rest '())")?, Value::nil());
    assert_eq!(eval("(empty? nil)")?, Value::Bool(true));
    assert_eq!(eval("(len '(1 2 3))")?, Value::int(3));
    assert_eq!(eval("(len \"abc\")")?, Value::int(3));
    assert_eq!(eval("(print 1 \"two\")")?, Value::nil());
    assert!(matches!(eval_err("(first '())"), EvalErr::TypeError(_)));
    assert!(matches!(eval_err("(first 1)"), EvalErr::TypeError(_)));
    assert!(matches!(eval_err("(rest \"ab\")"), EvalErr::TypeError(_)));
    assert!(matches!(eval_err("(cons 1 2)"), EvalErr::TypeError(_)));
    Ok(())
}

#[test]
fn type_names() -> Result<(), Error> {
    let cases = [
        ("(type 1)", "number"),
        ("(type \"s\")", "string"),
        ("(type #t)", "boolean"),
        ("(type nil)", "list"),
        ("(type 'x)", "symbol"),
        ("(type first)", "builtin"),
        ("(type (lambda (x) x))", "function"),
        ("(defmacro m (x) x) (type m)", "macro"),
    ];
    for (src, name) in cases.iter() {
        assert_eq!(eval(src)?, Value::Symbol(name.to_string()));
    }
    Ok(())
}

fn host_environment() -> Environment {
    let env = default_environment();
    let point = HostRecord::new("point")
        .with("x", HostValue::Int(3))
        .with("label", HostValue::Str("origin".to_string()));
    env.bind("p", Value::Host(Rc::new(point)));
    let add = HostFn::new("add", |args| {
        let mut total = 0;
        for arg in args {
            match arg {
                HostValue::Int(i) => total += i,
                other => return Err(HostError(format!("can't add {:?}", other))),
            }
        }
        Ok(HostValue::Int(total))
    });
    env.bind("add", Value::Host(Rc::new(add)));
    env
}

#[test]
fn host_interop() -> Result<(), Error> {
    let env = host_environment();
    assert_eq!(eval_str("(. p 'x)", &env)?, Value::int(3));
    assert_eq!(eval_str("(. p \"label\")", &env)?, Value::Str("origin".to_string()));
    assert_eq!(eval_str("(! add 1 2 (+ 3 4))", &env)?, Value::int(10));
    assert_eq!(eval_str("(type p)", &env)?, Value::Symbol("host".to_string()));
    assert_eq!(eval_str("p", &env)?.to_string(), "<host point>");
    Ok(())
}

#[test]
fn host_errors_propagate() {
    let env = host_environment();
    let run = |src: &str| match eval_str(src, &env) {
        Err(Error::Eval(e)) => e,
        other => panic!("expected an eval error for {}, got {:?}", src, other),
    };
    assert!(matches!(run("(. p 'z)"), EvalErr::Host(_)));
    assert!(matches!(run("(! p)"), EvalErr::Host(_)));
    assert!(matches!(run("(! add \"one\")"), EvalErr::Host(_)));
    assert!(matches!(run("(! add (lambda (x) x))"), EvalErr::TypeError(_)));
    assert!(matches!(run("(. 1 'x)"), EvalErr::TypeError(_)));
    assert!(matches!(run("(. p 1)"), EvalErr::TypeError(_)));
    assert!(matches!(run("(!)"), EvalErr::ArityError{..}));
}
