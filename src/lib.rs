//! # simd-lisp - a JIT compiler for four-lane float expressions
//!
//! The language has one value type, a vector of four `f32` lanes, and a
//! fully parenthesized prefix syntax. Source forms are compiled straight to
//! native code with Cranelift.
//!
//! ## Quick Start
//!
//! ```
//! use simd_lisp::Session;
//!
//! let mut session = Session::new().unwrap();
//! session.define_internal("(def hyp (a b) (sqrt (+ (* a a) (* b b))))").unwrap();
//!
//! let f = session
//!     .compile_external_expression("(hyp x 4)", &["x"])
//!     .unwrap();
//! assert_eq!(f.call(&[[3.0, 3.0, 3.0, 3.0]]).unwrap(), [5.0; 4]);
//! ```
//!
//! ## Architecture
//!
//! 1. **Reader** - Tokenize and parse one S-expression into a [`Node`]
//! 2. **JIT** - Lower the tree to Cranelift IR over `f32x4` and finalize it
//! 3. **Session** - The four entry points deciding which calling convention
//!    a form is compiled with
//!
//! ## Language
//!
//! - `(def name (params...) body)` defines a function
//! - `+ - * /` fold left over two or more arguments
//! - `sqrt sin cos exp log` take one argument, `pow` takes two
//! - A non-zero numeric atom is broadcast to all lanes. Atoms reading as
//!   zero (including `0` itself) are variable references, and unbound
//!   variables evaluate to zero.

pub mod ast;
pub mod config;
pub mod error;
pub mod jit;
pub mod pipeline;
pub mod reader;
pub mod repl;

pub use ast::Node;
pub use config::{JitSettings, OptLevel};
pub use error::{CallError, CompileError, ParseError};
pub use jit::{Convention, ExternalFn, JitCompiler, Vec4};
pub use pipeline::Session;
pub use reader::{parse, parse_all};
