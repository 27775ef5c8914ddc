use lexers::{LexError, LispToken, LispTokenizer, Token};
use crate::value::{Number, Value};
use std::fmt;
use thiserror::Error;

#[derive(Clone, PartialEq, Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unexpected ')' at offset {pos}")]
    UnexpectedCloseParen { pos: usize },
    #[error("list opened at offset {pos} is never closed")]
    UnterminatedList { pos: usize },
    #[error("quote at offset {pos} has nothing to quote")]
    DanglingQuote { pos: usize },
    #[error("malformed atom {text:?} at offset {pos}")]
    MalformedAtom { pos: usize, text: String },
    #[error("form at offset {pos} is nested deeper than {depth}")]
    TooDeep { pos: usize, depth: usize },
}

/// Nesting allowed for lists and quote marks before the reader gives up.
pub const MAX_PARSE_DEPTH: usize = 512;

/// Syntax tree. `'x`, `` `x `` and `,x` are read as `(quote x)`,
/// `(backquote x)` and `(unquote x)`.
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    Number(Number),
    Str(String),
    Symbol(String),
    List(Vec<Expr>),
    // a value spliced into code by a macro expansion, never read from source
    Const(Value),
}

impl Expr {
    pub fn symbol<S: Into<String>>(name: S) -> Expr {
        Expr::Symbol(name.into())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Str(s) => write!(f, "\"{}\"", s),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::Const(v) => write!(f, "{}", v),
            Expr::List(items) => {
                let items: Vec<_> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "({})", items.join(" "))
            }
        }
    }
}

// code built from data, see macro expansion
impl From<Value> for Expr {
    fn from(value: Value) -> Expr {
        match value {
            Value::Number(n) => Expr::Number(n),
            Value::Str(s) => Expr::Str(s),
            Value::Symbol(s) => Expr::Symbol(s),
            Value::List(items) => Expr::List(items.iter().cloned().map(Expr::from).collect()),
            other => Expr::Const(other),
        }
    }
}


pub struct Parser<'a> {
    lex: LispTokenizer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Parser<'a> {
        Parser{lex: LispTokenizer::new(source), depth: 0}
    }

    pub fn parse_str(source: &str) -> Result<Vec<Expr>, ParseError> {
        Parser::new(source).parse()
    }

    /// Read every top-level form until input is exhausted.
    pub fn parse(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = Vec::new();
        while let Some(token) = self.lex.consume()? {
            let expr = self.parse_expr(token)?;
            debug!("parsed {}", expr);
            exprs.push(expr);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self, token: Token<LispToken>) -> Result<Expr, ParseError> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::TooDeep{pos: token.pos, depth: MAX_PARSE_DEPTH});
        }
        self.depth += 1;
        let expr = self.parse_token(token);
        self.depth -= 1;
        expr
    }

    fn parse_token(&mut self, token: Token<LispToken>) -> Result<Expr, ParseError> {
        match token.kind {
            LispToken::CParen     => Err(ParseError::UnexpectedCloseParen{pos: token.pos}),
            LispToken::OParen     => self.parse_list(token.pos),
            LispToken::Number     => Self::parse_number(token),
            LispToken::Symbol |
            LispToken::Operator   => Ok(Expr::Symbol(token.text)),
            LispToken::String     => {
                let inner = &token.text[1..token.text.len() - 1];
                Ok(Expr::Str(inner.to_string()))
            },
            LispToken::Quote      => self.parse_quoted("quote", token.pos),
            LispToken::QuasiQuote => self.parse_quoted("backquote", token.pos),
            LispToken::UnQuote    => self.parse_quoted("unquote", token.pos),
            // filtered by the tokenizer
            LispToken::Whitespace |
            LispToken::Comment    => Err(ParseError::MalformedAtom{pos: token.pos, text: token.text}),
        }
    }

    fn parse_list(&mut self, open: usize) -> Result<Expr, ParseError> {
        let mut list = Vec::new();
        loop {
            match self.lex.consume()? {
                None => return Err(ParseError::UnterminatedList{pos: open}),
                Some(t) if t.kind == LispToken::CParen => return Ok(Expr::List(list)),
                Some(t) => list.push(self.parse_expr(t)?),
            }
        }
    }

    fn parse_quoted(&mut self, form: &str, pos: usize) -> Result<Expr, ParseError> {
        match self.lex.peek()? {
            Some(t) if t.kind != LispToken::CParen => {
                self.lex.consume()?;
                let quoted = self.parse_expr(t)?;
                Ok(Expr::List(vec![Expr::symbol(form), quoted]))
            },
            _ => Err(ParseError::DanglingQuote{pos}),
        }
    }

    // integer first, float as fallback
    fn parse_number(token: Token<LispToken>) -> Result<Expr, ParseError> {
        if let Ok(i) = token.text.parse::<i64>() {
            Ok(Expr::Number(Number::Int(i)))
        } else if let Ok(x) = token.text.parse::<f64>() {
            Ok(Expr::Number(Number::Float(x)))
        } else {
            Err(ParseError::MalformedAtom{pos: token.pos, text: token.text})
        }
    }
}
