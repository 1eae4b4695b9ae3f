//! JIT compiler: Node -> Cranelift IR -> native code
//!
//! One `JitCompiler` owns one `JITModule` for its whole life. Functions are
//! appended to it and never removed; internal-convention functions are also
//! entered in a name registry so later calls can reach them.

use std::iter;

use cranelift_codegen::ir::types::{F32, F32X4};
use cranelift_codegen::ir::{AbiParam, Function, InstBuilder, MemFlags, Signature, UserFuncName};
use cranelift_codegen::settings::{self, Configurable};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{FuncId, Linkage, Module};
use log::debug;
use rustc_hash::FxHashMap;

use crate::ast::{check_params, Definition, Node};
use crate::config::JitSettings;
use crate::error::CompileError;

use super::code::ExternalFn;
use super::runtime;
use super::translate::FunctionTranslator;
use super::Convention;

/// Name used in diagnostics for wrapped bare expressions.
const EXPRESSION_NAME: &str = "externalexpr";

/// Pre-declared runtime helper function IDs
pub(crate) struct Intrinsics {
    pub(crate) sin: FuncId,
    pub(crate) cos: FuncId,
    pub(crate) exp: FuncId,
    pub(crate) log: FuncId,
    pub(crate) pow: FuncId,
}

/// An internal-convention function visible to calls by name.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Registered {
    pub(crate) id: FuncId,
    pub(crate) arity: usize,
}

/// JIT compiler that translates syntax trees to native code
pub struct JitCompiler {
    module: JITModule,
    intrinsics: Intrinsics,
    /// Internal-convention functions by source name; redefinition replaces
    /// the entry but leaves the old code (and its callers) untouched.
    functions: FxHashMap<String, Registered>,
    settings: JitSettings,
    ir: Vec<String>,
}

impl JitCompiler {
    /// Create a new JIT compiler with default settings
    pub fn new() -> Result<Self, CompileError> {
        Self::with_settings(JitSettings::default())
    }

    pub fn with_settings(settings: JitSettings) -> Result<Self, CompileError> {
        // Configure Cranelift for the host target
        let mut flag_builder = settings::builder();
        flag_builder
            .set("use_colocated_libcalls", "false")
            .map_err(CompileError::backend)?;
        flag_builder
            .set("is_pic", "false")
            .map_err(CompileError::backend)?;
        flag_builder
            .set("opt_level", settings.opt_level.as_flag())
            .map_err(CompileError::backend)?;

        let isa_builder = cranelift_native::builder().map_err(CompileError::backend)?;
        let isa = isa_builder
            .finish(settings::Flags::new(flag_builder))
            .map_err(CompileError::backend)?;

        let mut builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
        for (name, ptr) in runtime::symbols() {
            builder.symbol(name, ptr);
        }

        let mut module = JITModule::new(builder);
        let intrinsics = Self::declare_intrinsics(&mut module)?;

        Ok(JitCompiler {
            module,
            intrinsics,
            functions: FxHashMap::default(),
            settings,
            ir: Vec::new(),
        })
    }

    /// Declare the per-lane math helpers in the module
    fn declare_intrinsics(module: &mut JITModule) -> Result<Intrinsics, CompileError> {
        // (f32) -> f32
        let mut unary_sig = module.make_signature();
        unary_sig.params.push(AbiParam::new(F32));
        unary_sig.returns.push(AbiParam::new(F32));

        // (f32, f32) -> f32
        let mut binary_sig = module.make_signature();
        binary_sig.params.push(AbiParam::new(F32));
        binary_sig.params.push(AbiParam::new(F32));
        binary_sig.returns.push(AbiParam::new(F32));

        let declare =
            |module: &mut JITModule, name: &str, sig: &Signature| -> Result<FuncId, CompileError> {
                module
                    .declare_function(name, Linkage::Import, sig)
                    .map_err(CompileError::backend)
            };

        Ok(Intrinsics {
            sin: declare(module, "simd_lisp_sin", &unary_sig)?,
            cos: declare(module, "simd_lisp_cos", &unary_sig)?,
            exp: declare(module, "simd_lisp_exp", &unary_sig)?,
            log: declare(module, "simd_lisp_log", &unary_sig)?,
            pow: declare(module, "simd_lisp_pow", &binary_sig)?,
        })
    }

    /// Compile `def` with the internal convention and register it by name.
    pub fn define(&mut self, def: &Definition) -> Result<(), CompileError> {
        let id = self.build_function(&def.name, &def.params, &def.body, Convention::Internal)?;
        let previous = self.functions.insert(
            def.name.clone(),
            Registered {
                id,
                arity: def.arity(),
            },
        );
        if previous.is_some() {
            debug!("`{}` shadows an earlier definition", def.name);
        }
        Ok(())
    }

    /// Compile `def` with the external convention. It is not registered.
    pub fn compile_external(&mut self, def: &Definition) -> Result<ExternalFn, CompileError> {
        let id = self.build_function(&def.name, &def.params, &def.body, Convention::External)?;
        Ok(ExternalFn::new(
            self.module.get_finalized_function(id),
            def.arity(),
        ))
    }

    /// Compile a bare expression as an anonymous external-convention function
    /// whose parameters are `params`, in order.
    pub fn compile_expression<S: AsRef<str>>(
        &mut self,
        body: &Node,
        params: &[S],
    ) -> Result<ExternalFn, CompileError> {
        let id = self.build_function(EXPRESSION_NAME, params, body, Convention::External)?;
        Ok(ExternalFn::new(
            self.module.get_finalized_function(id),
            params.len(),
        ))
    }

    /// Arity of the internal function currently registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.functions.get(name).map(|f| f.arity)
    }

    /// Cranelift IR of every function compiled so far, when capture is enabled.
    pub fn ir_listing(&self) -> &[String] {
        &self.ir
    }

    pub fn settings(&self) -> &JitSettings {
        &self.settings
    }

    fn signature(&self, arity: usize, convention: Convention) -> Signature {
        let mut sig = self.module.make_signature();
        match convention {
            Convention::Internal => {
                sig.params
                    .extend(iter::repeat(AbiParam::new(F32X4)).take(arity));
                sig.returns.push(AbiParam::new(F32X4));
            }
            Convention::External => {
                // One pointer per argument plus the result pointer
                let ptr = self.module.target_config().pointer_type();
                sig.params
                    .extend(iter::repeat(AbiParam::new(ptr)).take(arity + 1));
            }
        }
        sig
    }

    /// Lower, declare, define, and finalize one function.
    ///
    /// The function is only declared once its body lowered successfully, so
    /// a failed request leaves no trace in the module.
    fn build_function<S: AsRef<str>>(
        &mut self,
        name: &str,
        params: &[S],
        body: &Node,
        convention: Convention,
    ) -> Result<FuncId, CompileError> {
        check_params(params)?;

        let sig = self.signature(params.len(), convention);
        let mut ctx = self.module.make_context();
        ctx.func.signature = sig.clone();

        let mut builder_ctx = FunctionBuilderContext::new();
        self.translate_function(&mut ctx.func, &mut builder_ctx, params, body, convention)?;

        let func_id = self
            .module
            .declare_anonymous_function(&sig)
            .map_err(CompileError::backend)?;
        ctx.func.name = UserFuncName::user(0, func_id.as_u32());

        self.module
            .define_function(func_id, &mut ctx)
            .map_err(CompileError::backend)?;
        if self.settings.capture_ir {
            self.ir.push(format!(
                "; {} ({}, {} param(s))\n{}",
                name,
                convention,
                params.len(),
                ctx.func
            ));
        }
        self.module.clear_context(&mut ctx);
        self.module
            .finalize_definitions()
            .map_err(CompileError::backend)?;

        debug!(
            "compiled `{}` ({} convention, {} param(s))",
            name,
            convention,
            params.len()
        );
        Ok(func_id)
    }

    /// Emit the body of one function into `func`.
    ///
    /// ```text
    /// entry(params...):
    ///     internal: params are the vectors themselves
    ///     external: load each vector from its pointer (unaligned)
    ///     ... body ...
    ///     internal: return v
    ///     external: store v through the trailing pointer, return
    /// ```
    fn translate_function<S: AsRef<str>>(
        &mut self,
        func: &mut Function,
        builder_ctx: &mut FunctionBuilderContext,
        params: &[S],
        body: &Node,
        convention: Convention,
    ) -> Result<(), CompileError> {
        let mut builder = FunctionBuilder::new(func, builder_ctx);

        let entry_block = builder.create_block();
        builder.append_block_params_for_function_params(entry_block);
        builder.switch_to_block(entry_block);
        builder.seal_block(entry_block);
        let incoming = builder.block_params(entry_block).to_vec();

        let mut translator =
            FunctionTranslator::new(&mut self.module, &self.intrinsics, &self.functions);
        for (param, &value) in params.iter().zip(&incoming) {
            let value = match convention {
                Convention::Internal => value,
                Convention::External => builder.ins().load(F32X4, MemFlags::new(), value, 0),
            };
            translator.bind(param.as_ref(), value);
        }

        let result = translator.translate(&mut builder, body)?;
        match convention {
            Convention::Internal => {
                builder.ins().return_(&[result]);
            }
            Convention::External => {
                let out_ptr = incoming[params.len()];
                builder.ins().store(MemFlags::new(), result, out_ptr, 0);
                builder.ins().return_(&[]);
            }
        }

        builder.finalize();
        Ok(())
    }
}
