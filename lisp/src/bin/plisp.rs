use plisp::{Config, Environment, Error, Interpreter, Value};
use std::env;

// stack for the reader and rustyline, plus room per nested eval
const BASE_STACK: usize = 8 << 20;
const STACK_PER_EVAL: usize = 4 << 10;

fn usage() -> String {
    "usage: plisp [--max-depth N] [script]".to_string()
}

fn parse_args() -> Result<(Config, Option<String>), String> {
    let mut config = Config::default();
    let mut script = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--max-depth" {
            let n = args.next().ok_or_else(usage)?;
            config.max_depth = n.parse()
                .map_err(|e| format!("plisp: bad --max-depth {}: {}", n, e))?;
        } else if script.is_none() {
            script = Some(arg);
        } else {
            return Err(usage());
        }
    }
    Ok((config, script))
}

fn run(source: &str, interp: &mut Interpreter, env: &Environment) -> Result<Value, Error> {
    let exprs = plisp::parse(source)?;
    Ok(interp.evaluate(&exprs, env)?)
}

fn interpret(config: Config, script: Option<String>) -> Result<(), String> {
    let env = plisp::default_environment();
    let mut interp = Interpreter::with_config(config);

    if let Some(path) = script {
        let source = std::fs::read_to_string(&path)
            .map_err(|e| format!("plisp: failed to read {}: {}", path, e))?;
        match run(&source, &mut interp, &env) {
            Ok(value) => println!("{}", value),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    use rustyline::error::ReadlineError;
    let mut rl = rustyline::DefaultEditor::new().map_err(|e| e.to_string())?;
    loop {
        match rl.readline("~> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(format!("Readline err: {:?}", e)),
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);
                match run(&line, &mut interp, &env) {
                    Err(e) => println!("{}", e),
                    Ok(value) => println!("{}", value),
                }
            }
        }
    }
}

fn main() -> Result<(), String> {
    let (config, script) = parse_args()?;
    // evaluation depth is only safe on a stack sized for it
    let stack = BASE_STACK.saturating_add(config.max_depth.saturating_mul(STACK_PER_EVAL));
    std::thread::Builder::new()
        .name("plisp".to_string())
        .stack_size(stack)
        .spawn(move || interpret(config, script))
        .map_err(|e| format!("plisp: can't start interpreter: {}", e))?
        .join()
        .map_err(|_| "plisp: interpreter panicked".to_string())?
}
