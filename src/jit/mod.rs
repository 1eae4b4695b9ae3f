//! JIT compilation of syntax trees to native code
//!
//! This module lowers `Node` trees to Cranelift IR over `F32X4` values and
//! compiles them into one persistent `JITModule`.
//!
//! ## Architecture
//!
//! ```text
//! Node -> FunctionTranslator -> Cranelift IR -> JITModule -> native code
//! ```
//!
//! ## Calling Conventions
//!
//! Functions callable from other compiled code (internal convention):
//!
//! ```ignore
//! fn(a: f32x4, b: f32x4, ...) -> f32x4
//! ```
//!
//! Functions callable from the host (external convention):
//!
//! ```ignore
//! type ExternalAbi = unsafe extern "C" fn(a: *const f32, ..., result: *mut f32);
//! ```
//!
//! Only internal-convention functions are registered by name; external ones
//! are reachable solely through the returned [`ExternalFn`].

mod code;
mod compiler;
mod runtime;
mod translate;

pub use code::{ExternalFn, MAX_CALL_ARITY};
pub use compiler::JitCompiler;

/// The language's only value type: four `f32` lanes.
pub type Vec4 = [f32; 4];

/// Calling convention of a compiled function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// Vectors by value, result returned by value
    Internal,
    /// Pointers to four floats, result written through a trailing pointer
    External,
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Convention::Internal => write!(f, "internal"),
            Convention::External => write!(f, "external"),
        }
    }
}
