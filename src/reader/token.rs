/// A lexical token.
///
/// Atoms are any run of non-blank characters other than parentheses;
/// whether an atom is a number or an identifier is decided by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LeftParen,
    RightParen,
    Atom(String),
    End,
}

impl Token {
    pub fn is_end(&self) -> bool {
        matches!(self, Token::End)
    }
}
