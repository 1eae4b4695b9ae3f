//! Compilation entry points: source text -> parse -> JIT
//!
//! A `Session` wraps one `JitCompiler` for its whole life. Internal
//! definitions accumulate in it across calls; nothing else is carried from
//! one request to the next.
//!
//! Requests mutate the session, so concurrent use must be serialized by the
//! caller (for example behind a `Mutex<Session>`). The returned
//! [`ExternalFn`] handles can be called from any thread.
//!
//! Parsing and lowering recurse once per nesting level of the input and
//! have no depth limit. Callers feeding untrusted source should bound its
//! nesting first.

use log::debug;

use crate::ast::Node;
use crate::config::JitSettings;
use crate::error::CompileError;
use crate::jit::{ExternalFn, JitCompiler};
use crate::reader::{parse, Parser};

pub struct Session {
    compiler: JitCompiler,
}

impl Session {
    pub fn new() -> Result<Self, CompileError> {
        Ok(Session {
            compiler: JitCompiler::new()?,
        })
    }

    pub fn with_settings(settings: JitSettings) -> Result<Self, CompileError> {
        Ok(Session {
            compiler: JitCompiler::with_settings(settings)?,
        })
    }

    /// Compile a `def` form with the internal convention and register it.
    ///
    /// Input that fails to parse or is not a definition changes nothing.
    pub fn define_internal(&mut self, source: &str) -> Result<(), CompileError> {
        match parse(source)? {
            Node::Definition(def) => self.compiler.define(&def),
            _ => Err(CompileError::NotADefinition),
        }
    }

    /// Compile a `def` form with the external convention, without registering it.
    pub fn compile_external_definition(
        &mut self,
        source: &str,
    ) -> Result<ExternalFn, CompileError> {
        match parse(source)? {
            Node::Definition(def) => self.compiler.compile_external(&def),
            _ => Err(CompileError::NotADefinition),
        }
    }

    /// Compile any expression as a host-callable function of `params`.
    pub fn compile_external_expression<S: AsRef<str>>(
        &mut self,
        source: &str,
        params: &[S],
    ) -> Result<ExternalFn, CompileError> {
        let node = parse(source)?;
        self.compiler.compile_expression(&node, params)
    }

    /// Definitions are registered and yield nothing; any other form is
    /// compiled as a nullary host-callable function.
    pub fn repl_dispatch(&mut self, source: &str) -> Result<Option<ExternalFn>, CompileError> {
        let node = parse(source)?;
        self.dispatch_node(&node)
    }

    /// `repl_dispatch` for every top-level form of `source`, in order.
    ///
    /// One result per form read. Reading stops after the first failure,
    /// which is the last entry; forms before it keep their effect.
    pub fn repl_dispatch_all(
        &mut self,
        source: &str,
    ) -> Vec<Result<Option<ExternalFn>, CompileError>> {
        let mut parser = Parser::new(source);
        let mut results = Vec::new();
        while let Some(node) = parser.parse_next() {
            let result = node
                .map_err(CompileError::from)
                .and_then(|node| self.dispatch_node(&node));
            let failed = result.is_err();
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }

    fn dispatch_node(&mut self, node: &Node) -> Result<Option<ExternalFn>, CompileError> {
        match node {
            Node::Definition(def) => {
                self.compiler.define(def)?;
                Ok(None)
            }
            expr => {
                debug!("compiling bare expression for the host");
                self.compiler
                    .compile_expression::<&str>(expr, &[])
                    .map(Some)
            }
        }
    }

    /// Arity of the internal function registered under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.compiler.lookup(name)
    }

    /// Captured Cranelift IR, empty unless `capture_ir` is enabled.
    pub fn ir_listing(&self) -> &[String] {
        self.compiler.ir_listing()
    }
}
