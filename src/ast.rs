//! Syntax tree produced by the reader
//!
//! There are exactly four node kinds. Each node owns its children and the
//! tree is never mutated after parsing.

use rustc_hash::FxHashSet;

use crate::error::CompileError;

/// Parameter name that may not be bound by a definition.
pub const RESERVED_PARAM: &str = "result";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `(def name (params...) body)`
    Definition(Definition),
    /// `(name args...)`
    Call(Call),
    /// An identifier, or any atom that reads as zero
    Variable(String),
    /// A non-zero numeric atom, broadcast to all lanes when compiled
    Number(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub params: Vec<String>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Node>,
}

impl Node {
    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            Node::Definition(def) => Some(def),
            _ => None,
        }
    }
}

impl Definition {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Node) -> Self {
        Definition {
            name: name.into(),
            params,
            body: Box::new(body),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Check that `params` are pairwise distinct and none is `result`.
///
/// Shared by definitions and anonymous expression wrappers.
pub fn check_params<S: AsRef<str>>(params: &[S]) -> Result<(), CompileError> {
    let mut seen = FxHashSet::default();
    for param in params {
        let param = param.as_ref();
        if param == RESERVED_PARAM {
            return Err(CompileError::ReservedParam);
        }
        if !seen.insert(param) {
            return Err(CompileError::DuplicateParam(param.to_string()));
        }
    }
    Ok(())
}
