//! Error types for the reader, the JIT compiler, and compiled-function calls
//!
//! Every failure is local to one compilation request: nothing is retried and
//! nothing is left registered. The variants carry a short diagnostic so the
//! caller can report what went wrong, but callers that only care about
//! success or failure can treat any `Err` as "no result produced".

use thiserror::Error;

/// Syntax errors produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended before a complete form was read
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A `)` appeared where an expression was expected
    #[error("unexpected `)`")]
    UnexpectedClose,
    /// `(` was not followed by an identifier
    #[error("expected an identifier after `(`")]
    ExpectedHead,
    /// A `def` form did not have the shape `(def name (params...) body)`
    #[error("malformed def: {0}")]
    MalformedDef(&'static str),
    /// A parameter name does not start with a letter
    #[error("invalid parameter name `{0}`")]
    InvalidParam(String),
}

/// Failures of a compilation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// The entry point requires a `def` form
    #[error("expected a definition")]
    NotADefinition,
    #[error("duplicate parameter `{0}`")]
    DuplicateParam(String),
    #[error("`result` is reserved and cannot name a parameter")]
    ReservedParam,
    /// No registered function with this name takes this many arguments
    #[error("no function `{name}` taking {arity} argument(s)")]
    UnknownFunction { name: String, arity: usize },
    /// A `def` form appeared in expression position
    #[error("definition of `{0}` is only allowed at top level")]
    NestedDefinition(String),
    /// Cranelift rejected the function or the module could not be set up
    #[error("code generation failed: {0}")]
    Backend(String),
}

/// Failures when invoking a compiled function through [`crate::ExternalFn::call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("expected {expected} argument(s), got {got}")]
    ArityMismatch { expected: usize, got: usize },
    /// Too many parameters for the safe call path; use the raw pointer
    #[error("calls with {0} arguments are only supported through the raw pointer")]
    UnsupportedArity(usize),
}

impl CompileError {
    pub(crate) fn backend(err: impl std::fmt::Display) -> Self {
        CompileError::Backend(err.to_string())
    }
}
