#![deny(warnings)]

use regex::Regex;
use thiserror::Error;

#[derive(Clone, PartialEq, Debug)]
pub struct Token<K> {
    pub kind: K,
    pub text: String,
    pub pos: usize, // byte offset into the source
}

#[derive(Clone, PartialEq, Debug, Error)]
#[error("unrecognized input {found:?} at offset {pos}")]
pub struct LexError {
    pub pos: usize,
    pub found: String,
}

pub struct Rule<K> {
    pub kind: K,
    pub pattern: Regex,
}

impl<K> Rule<K> {
    /// Patterns are anchored, a rule can only match right at the cursor.
    pub fn new(kind: K, pattern: &str) -> Result<Rule<K>, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(Rule{kind, pattern})
    }
}

/// Tokenizer driven by an ordered list of rules. At every position the
/// first rule that matches wins, even if a later one would match longer.
pub struct RegexTokenizer<'a, K> {
    src: &'a str,
    rules: &'a [Rule<K>],
    pos: usize,
    failed: bool,
}

impl<'a, K: Clone> RegexTokenizer<'a, K> {
    pub fn new(src: &'a str, rules: &'a [Rule<K>]) -> RegexTokenizer<'a, K> {
        RegexTokenizer{src, rules, pos: 0, failed: false}
    }

    pub fn pos(&self) -> usize { self.pos }

    /// Look at the token under the cursor without moving.
    pub fn peek(&self) -> Result<Option<Token<K>>, LexError> {
        let rest = &self.src[self.pos..];
        if rest.is_empty() {
            return Ok(None);
        }
        for rule in self.rules {
            // empty matches would never advance the cursor
            match rule.pattern.find(rest) {
                Some(m) if m.end() > 0 => return Ok(Some(Token{
                    kind: rule.kind.clone(),
                    text: m.as_str().to_string(),
                    pos: self.pos,
                })),
                _ => continue,
            }
        }
        let found = rest.chars()
            .take_while(|c| !c.is_whitespace())
            .take(16)
            .collect();
        Err(LexError{pos: self.pos, found})
    }

    /// Advance over the next token. Tokens rejected by `keep` are skipped.
    pub fn consume<P>(&mut self, keep: P) -> Result<Option<Token<K>>, LexError>
            where P: Fn(&Token<K>) -> bool {
        while let Some(token) = self.peek()? {
            self.pos += token.text.len();
            if keep(&token) {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}

// Yields every token, trivia included. Stops for good after an error.
impl<'a, K: Clone> Iterator for RegexTokenizer<'a, K> {
    type Item = Result<Token<K>, LexError>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.consume(|_| true) {
            Ok(token) => token.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
