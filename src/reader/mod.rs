//! Reader: source text to syntax tree
//!
//! ```text
//! expr := ATOM
//!       | '(' 'def' ATOM '(' ATOM* ')' expr ')'
//!       | '(' ATOM expr* ')'
//! ```

mod lexer;
mod parser;
mod token;

pub use lexer::Lexer;
pub use parser::Parser;
pub use token::Token;

use crate::ast::Node;
use crate::error::ParseError;

/// Parse the first top-level form of `input`; anything after it is ignored.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    Parser::new(input).parse()
}

/// Parse every top-level form of `input`.
pub fn parse_all(input: &str) -> Result<Vec<Node>, ParseError> {
    Parser::new(input).parse_all()
}
