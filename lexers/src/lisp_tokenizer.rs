#![deny(warnings)]

use crate::tokenizer::{LexError, RegexTokenizer, Rule, Token};
use lazy_static::lazy_static;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LispToken {
    Whitespace, Comment,
    OParen, CParen,
    Number,
    Quote, QuasiQuote, UnQuote,
    Operator, Symbol,
    String,
}

impl LispToken {
    pub fn is_trivia(&self) -> bool {
        matches!(self, LispToken::Whitespace | LispToken::Comment)
    }
}

fn rule(kind: LispToken, pattern: &str) -> Rule<LispToken> {
    Rule::new(kind, pattern).expect("lisp rule table holds a bad pattern")
}

lazy_static! {
    // Order matters: numbers go before symbols, operators before symbols.
    static ref LISP_RULES: Vec<Rule<LispToken>> = vec![
        rule(LispToken::Whitespace, r"\s+"),
        rule(LispToken::Comment, r";[^\n]*"),
        rule(LispToken::OParen, r"\("),
        rule(LispToken::CParen, r"\)"),
        rule(LispToken::Number, r"[0-9]+"),
        rule(LispToken::Quote, r"'"),
        rule(LispToken::QuasiQuote, r"`"),
        rule(LispToken::UnQuote, r","),
        rule(LispToken::Operator, r"[<>=+\-*/]"),
        rule(LispToken::Symbol, r"[A-Za-z!.#][A-Za-z0-9_?]*"),
        rule(LispToken::String, r#""[^"]*""#),
    ];
}

/// Lisp token stream with whitespace and comments filtered out.
pub struct LispTokenizer<'a>(RegexTokenizer<'a, LispToken>);

impl<'a> LispTokenizer<'a> {
    pub fn new(source: &'a str) -> LispTokenizer<'a> {
        LispTokenizer(RegexTokenizer::new(source, &LISP_RULES))
    }

    /// Offset of the cursor, just past the last consumed token.
    pub fn pos(&self) -> usize { self.0.pos() }

    /// Next significant token, left in place for the following `consume`.
    pub fn peek(&mut self) -> Result<Option<Token<LispToken>>, LexError> {
        while let Some(token) = self.0.peek()? {
            if !token.kind.is_trivia() {
                return Ok(Some(token));
            }
            self.0.consume(|_| true)?;
        }
        Ok(None)
    }

    pub fn consume(&mut self) -> Result<Option<Token<LispToken>>, LexError> {
        self.0.consume(|t| !t.kind.is_trivia())
    }
}

impl<'a> Iterator for LispTokenizer<'a> {
    type Item = Result<Token<LispToken>, LexError>;
    fn next(&mut self) -> Option<Self::Item> {
        // the inner tokenizer stays failed after an error
        self.0.by_ref().find(|t| match t {
            Ok(token) => !token.kind.is_trivia(),
            Err(_) => true,
        })
    }
}

///////////////////////////////////////////////////////////////////////////////
