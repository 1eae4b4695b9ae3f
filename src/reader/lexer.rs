use super::token::Token;

/// Bytes at or below ASCII space separate atoms.
#[inline]
fn is_blank(b: u8) -> bool {
    b <= b' '
}

#[inline]
fn is_atom_byte(b: u8) -> bool {
    !is_blank(b) && b != b'(' && b != b')'
}

/// Tokenizer with a single slot of pushback.
///
/// The lexer never fails: every non-blank byte that is not a parenthesis
/// becomes part of an atom. Once the input is exhausted, `next_token`
/// keeps returning [`Token::End`].
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    pushed_back: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            pushed_back: None,
        }
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pushed_back.take() {
            return token;
        }

        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && is_blank(bytes[self.pos]) {
            self.pos += 1;
        }

        let Some(&b) = bytes.get(self.pos) else {
            return Token::End;
        };
        match b {
            b'(' => {
                self.pos += 1;
                Token::LeftParen
            }
            b')' => {
                self.pos += 1;
                Token::RightParen
            }
            _ => {
                let start = self.pos;
                while self.pos < bytes.len() && is_atom_byte(bytes[self.pos]) {
                    self.pos += 1;
                }
                // Atom boundaries are ASCII bytes or the end, so the slice is on
                // char boundaries even for non-ASCII input.
                Token::Atom(self.input[start..self.pos].to_string())
            }
        }
    }

    /// Re-queue one token to be returned by the next call to `next_token`.
    pub fn push_back(&mut self, token: Token) {
        debug_assert!(self.pushed_back.is_none(), "pushback slot already full");
        self.pushed_back = Some(token);
    }
}
