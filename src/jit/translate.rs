//! Syntax tree to Cranelift IR translation
//!
//! This module contains `FunctionTranslator`, which lowers the body of one
//! function. The function being built is the `FunctionBuilder` passed into
//! every call; the translator itself only holds the symbol table for that
//! function and read-only views of the module state.

use cranelift_codegen::ir::types::F32X4;
use cranelift_codegen::ir::{FuncRef, InstBuilder, Value};
use cranelift_frontend::FunctionBuilder;
use cranelift_jit::JITModule;
use cranelift_module::{FuncId, Module};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::ast::{Call, Node};
use crate::error::CompileError;

use super::compiler::{Intrinsics, Registered};

const LANES: u8 = 4;

/// Variadic elementwise arithmetic, folded left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }

    fn emit(self, builder: &mut FunctionBuilder, lhs: Value, rhs: Value) -> Value {
        match self {
            ArithOp::Add => builder.ins().fadd(lhs, rhs),
            ArithOp::Sub => builder.ins().fsub(lhs, rhs),
            ArithOp::Mul => builder.ins().fmul(lhs, rhs),
            ArithOp::Div => builder.ins().fdiv(lhs, rhs),
        }
    }
}

/// Translator for a single function
pub(crate) struct FunctionTranslator<'a> {
    module: &'a mut JITModule,
    intrinsics: &'a Intrinsics,
    functions: &'a FxHashMap<String, Registered>,
    /// Parameters bound in the function being built
    symbols: FxHashMap<String, Value>,
    /// Callees already imported into the function being built
    func_refs: FxHashMap<FuncId, FuncRef>,
}

impl<'a> FunctionTranslator<'a> {
    pub(crate) fn new(
        module: &'a mut JITModule,
        intrinsics: &'a Intrinsics,
        functions: &'a FxHashMap<String, Registered>,
    ) -> Self {
        FunctionTranslator {
            module,
            intrinsics,
            functions,
            symbols: FxHashMap::default(),
            func_refs: FxHashMap::default(),
        }
    }

    pub(crate) fn bind(&mut self, name: &str, value: Value) {
        self.symbols.insert(name.to_string(), value);
    }

    /// Lower `node` to a single `F32X4` value.
    pub(crate) fn translate(
        &mut self,
        builder: &mut FunctionBuilder,
        node: &Node,
    ) -> Result<Value, CompileError> {
        match node {
            Node::Number(value) => Ok(splat(builder, *value)),
            Node::Variable(name) => match self.symbols.get(name) {
                Some(value) => Ok(*value),
                None => {
                    trace!("unbound variable `{}` reads as zero", name);
                    Ok(splat(builder, 0.0))
                }
            },
            Node::Call(call) => self.translate_call(builder, call),
            Node::Definition(def) => {
                debug!("rejecting nested definition of `{}`", def.name);
                Err(CompileError::NestedDefinition(def.name.clone()))
            }
        }
    }

    fn translate_call(
        &mut self,
        builder: &mut FunctionBuilder,
        call: &Call,
    ) -> Result<Value, CompileError> {
        let mut args: SmallVec<[Value; 4]> = SmallVec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.translate(builder, arg)?);
        }

        if args.len() >= 2 {
            if let Some(op) = ArithOp::from_name(&call.name) {
                let mut acc = args[0];
                for &rhs in &args[1..] {
                    acc = op.emit(builder, acc, rhs);
                }
                return Ok(acc);
            }
        }

        let intrinsics = self.intrinsics;
        if args.len() == 1 {
            let helper = match call.name.as_str() {
                "sqrt" => return Ok(builder.ins().sqrt(args[0])),
                "sin" => Some(intrinsics.sin),
                "cos" => Some(intrinsics.cos),
                "exp" => Some(intrinsics.exp),
                "log" => Some(intrinsics.log),
                _ => None,
            };
            if let Some(helper) = helper {
                return Ok(self.call_per_lane(builder, helper, &args));
            }
        }
        if args.len() == 2 && call.name == "pow" {
            return Ok(self.call_per_lane(builder, intrinsics.pow, &args));
        }

        let callee = self
            .functions
            .get(&call.name)
            .copied()
            .filter(|f| f.arity == args.len())
            .ok_or_else(|| {
                debug!(
                    "no function `{}` taking {} argument(s)",
                    call.name,
                    args.len()
                );
                CompileError::UnknownFunction {
                    name: call.name.clone(),
                    arity: args.len(),
                }
            })?;
        let func_ref = self.func_ref(builder, callee.id);
        let inst = builder.ins().call(func_ref, &args);
        Ok(builder.inst_results(inst)[0])
    }

    /// Apply a scalar helper to every lane of `args` and reassemble the vector.
    fn call_per_lane(
        &mut self,
        builder: &mut FunctionBuilder,
        helper: FuncId,
        args: &[Value],
    ) -> Value {
        let callee = self.func_ref(builder, helper);
        let first = call_lane(builder, callee, args, 0);
        let mut vector = builder.ins().splat(F32X4, first);
        for lane in 1..LANES {
            let scalar = call_lane(builder, callee, args, lane);
            vector = builder.ins().insertlane(vector, scalar, lane);
        }
        vector
    }

    fn func_ref(&mut self, builder: &mut FunctionBuilder, id: FuncId) -> FuncRef {
        if let Some(func_ref) = self.func_refs.get(&id) {
            return *func_ref;
        }
        let func_ref = self.module.declare_func_in_func(id, builder.func);
        // Functions finalized in separate batches may be placed further apart
        // than a relative call can reach.
        builder.func.dfg.ext_funcs[func_ref].colocated = false;
        self.func_refs.insert(id, func_ref);
        func_ref
    }
}

/// A constant vector with `value` in every lane.
fn splat(builder: &mut FunctionBuilder, value: f32) -> Value {
    let scalar = builder.ins().f32const(value);
    builder.ins().splat(F32X4, scalar)
}

fn call_lane(builder: &mut FunctionBuilder, callee: FuncRef, args: &[Value], lane: u8) -> Value {
    let lane_args: SmallVec<[Value; 2]> = args
        .iter()
        .map(|&v| builder.ins().extractlane(v, lane))
        .collect();
    let inst = builder.ins().call(callee, &lane_args);
    builder.inst_results(inst)[0]
}
