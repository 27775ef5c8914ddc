mod tokenizer;
mod lisp_tokenizer;

pub use tokenizer::{LexError, RegexTokenizer, Rule, Token};
pub use lisp_tokenizer::{LispToken, LispTokenizer};
