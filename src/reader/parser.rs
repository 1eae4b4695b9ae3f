use log::trace;

use super::lexer::Lexer;
use super::token::Token;
use crate::ast::{Call, Definition, Node};
use crate::error::ParseError;

/// Head keyword of a definition form.
const DEF: &str = "def";

/// Recursive-descent parser over a single lexer.
///
/// Nesting depth is bounded only by the native stack; callers reading
/// untrusted input should cap it before parsing.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
        }
    }

    /// Read one expression.
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        match self.lexer.next_token() {
            Token::End => Err(ParseError::UnexpectedEnd),
            Token::RightParen => Err(ParseError::UnexpectedClose),
            Token::Atom(text) => Ok(atom(text)),
            Token::LeftParen => match self.lexer.next_token() {
                Token::Atom(head) if head == DEF => self.parse_def(),
                Token::Atom(head) => self.parse_call(head),
                Token::End => Err(ParseError::UnexpectedEnd),
                Token::LeftParen | Token::RightParen => Err(ParseError::ExpectedHead),
            },
        }
    }

    /// Read the next top-level expression, or `None` once only blanks remain.
    pub fn parse_next(&mut self) -> Option<Result<Node, ParseError>> {
        let token = self.lexer.next_token();
        if token.is_end() {
            return None;
        }
        self.lexer.push_back(token);
        Some(self.parse())
    }

    /// Read every remaining top-level expression.
    pub fn parse_all(&mut self) -> Result<Vec<Node>, ParseError> {
        std::iter::from_fn(|| self.parse_next()).collect()
    }

    /// `def` has been consumed: `name (params...) body )`
    fn parse_def(&mut self) -> Result<Node, ParseError> {
        let name = match self.lexer.next_token() {
            Token::Atom(name) => name,
            Token::End => return Err(ParseError::UnexpectedEnd),
            _ => return Err(ParseError::MalformedDef("expected a name")),
        };
        match self.lexer.next_token() {
            Token::LeftParen => {}
            Token::End => return Err(ParseError::UnexpectedEnd),
            _ => return Err(ParseError::MalformedDef("expected a parameter list")),
        }

        let mut params = Vec::new();
        loop {
            match self.lexer.next_token() {
                Token::Atom(param) => {
                    if !param.starts_with(|c: char| c.is_ascii_alphabetic()) {
                        return Err(ParseError::InvalidParam(param));
                    }
                    params.push(param);
                }
                Token::RightParen => break,
                Token::End => return Err(ParseError::UnexpectedEnd),
                Token::LeftParen => {
                    return Err(ParseError::MalformedDef("parameters must be identifiers"))
                }
            }
        }

        let body = self.parse()?;
        match self.lexer.next_token() {
            Token::RightParen => {}
            Token::End => return Err(ParseError::UnexpectedEnd),
            _ => return Err(ParseError::MalformedDef("expected `)` after the body")),
        }

        trace!("parsed def {} with {} param(s)", name, params.len());
        Ok(Node::Definition(Definition::new(name, params, body)))
    }

    /// The head identifier has been consumed: `args... )`
    fn parse_call(&mut self, name: String) -> Result<Node, ParseError> {
        let mut args = Vec::new();
        loop {
            match self.lexer.next_token() {
                Token::RightParen => break,
                Token::End => return Err(ParseError::UnexpectedEnd),
                token => {
                    self.lexer.push_back(token);
                    args.push(self.parse()?);
                }
            }
        }
        Ok(Node::Call(Call { name, args }))
    }
}

/// An atom is a number only when it reads as something other than zero.
///
/// This means `0` (and `0.0`, `-0`, ...) cannot be written as a literal: it
/// becomes a variable reference, which in turn compiles to zero when unbound.
fn atom(text: String) -> Node {
    let value = leading_float(&text);
    if value == 0.0 {
        Node::Variable(text)
    } else {
        Node::Number(value)
    }
}

/// Value of the longest numeric prefix of `text`, or `0.0` if there is none.
///
/// Follows C `atof`: an optional sign, then `inf`/`infinity`/`nan` in any
/// case, a hex float `0x[digits][.digits][(p|P)[+-]digits]`, or a decimal
/// `digits[.digits][(e|E)[+-]digits]`. Whatever follows is ignored, so `2x`
/// reads as `2`, `info` as infinity, and `abc` as `0`.
pub(crate) fn leading_float(text: &str) -> f32 {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = special_prefix(body)
        .or_else(|| hex_prefix(body))
        .unwrap_or_else(|| decimal_prefix(body));
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn special_prefix(body: &str) -> Option<f32> {
    let starts_with = |word: &str| {
        body.get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word))
    };
    if starts_with("inf") {
        Some(f32::INFINITY)
    } else if starts_with("nan") {
        Some(f32::NAN)
    } else {
        None
    }
}

/// `None` unless `body` starts with `0x` followed by at least one hex digit;
/// a bare `0x` reads as the decimal `0`.
fn hex_prefix(body: &str) -> Option<f32> {
    let bytes = body.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' || !matches!(bytes[1], b'x' | b'X') {
        return None;
    }

    let mut mantissa = 0f64;
    let mut hex_digits = |mut pos: usize| {
        let start = pos;
        while let Some(digit) = bytes.get(pos).and_then(|&b| char::from(b).to_digit(16)) {
            mantissa = mantissa * 16.0 + f64::from(digit);
            pos += 1;
        }
        pos - start
    };

    let mut end = 2;
    let int_digits = hex_digits(end);
    end += int_digits;

    let mut scale = 0i32;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = hex_digits(end + 1);
        if int_digits + frac_digits == 0 {
            return None;
        }
        end += 1 + frac_digits;
        scale = i32::try_from(frac_digits)
            .unwrap_or(i32::MAX)
            .saturating_mul(-4);
    } else if int_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'p' | b'P')) {
        let mut exp_start = end + 1;
        let negative = bytes.get(exp_start) == Some(&b'-');
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_digits = bytes[exp_start.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit());
        let mut exponent = 0i32;
        let mut count = 0;
        for b in exp_digits {
            exponent = exponent
                .saturating_mul(10)
                .saturating_add(i32::from(b - b'0'));
            count += 1;
        }
        if count > 0 {
            scale = if negative {
                scale.saturating_sub(exponent)
            } else {
                scale.saturating_add(exponent)
            };
        }
    }

    Some((mantissa * 2f64.powi(scale)) as f32)
}

fn decimal_prefix(body: &str) -> f32 {
    let bytes = body.as_bytes();
    let digits_from = |start: usize| {
        bytes[start.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = digits_from(0);
    let mut end = int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    body[..end].parse().unwrap_or(0.0)
}
