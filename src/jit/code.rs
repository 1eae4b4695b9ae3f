//! Host-callable compiled functions
//!
//! This module provides `ExternalFn`, a handle to a function compiled with
//! the external (pointer-buffer) calling convention.

use crate::error::CallError;

use super::Vec4;

/// Largest parameter count supported by [`ExternalFn::call`].
pub const MAX_CALL_ARITY: usize = 8;

/// Invoke an external-convention function pointer with `args` and `out`.
macro_rules! call_with_out_ptr {
    (@param $idx:tt) => { *const f32 };
    ($fn_ptr:expr, $args:expr, $out:expr, [$($idx:tt),*]) => {{
        let f: unsafe extern "C" fn($(call_with_out_ptr!(@param $idx),)* *mut f32) =
            std::mem::transmute($fn_ptr);
        f($($args[$idx].as_ptr(),)* $out)
    }};
}

/// A function compiled with the external calling convention:
///
/// ```ignore
/// type ExternalAbi = unsafe extern "C" fn(
///     arg0: *const f32,   // four contiguous lanes
///     ...,
///     result: *mut f32,   // four lanes, written unaligned
/// );
/// ```
///
/// Generated code is never freed, so the handle stays valid for the life of
/// the process, independently of the session that produced it.
#[derive(Clone, Copy)]
pub struct ExternalFn {
    fn_ptr: *const u8,
    arity: usize,
}

// Safety: the code is immutable once finalized and only touches the buffers
// passed by the caller.
unsafe impl Send for ExternalFn {}
unsafe impl Sync for ExternalFn {}

impl ExternalFn {
    pub(crate) fn new(fn_ptr: *const u8, arity: usize) -> Self {
        ExternalFn { fn_ptr, arity }
    }

    /// Raw entry point for native callers.
    pub fn as_ptr(&self) -> *const u8 {
        self.fn_ptr
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Call the function with one vector per declared parameter.
    pub fn call(&self, args: &[Vec4]) -> Result<Vec4, CallError> {
        if args.len() != self.arity {
            return Err(CallError::ArityMismatch {
                expected: self.arity,
                got: args.len(),
            });
        }

        let mut result: Vec4 = [0.0; 4];
        let out = result.as_mut_ptr();
        // Safety: the pointer was produced by the JIT for a function taking
        // exactly `arity` input pointers plus the result pointer, and every
        // buffer holds four floats.
        unsafe {
            match args.len() {
                0 => call_with_out_ptr!(self.fn_ptr, args, out, []),
                1 => call_with_out_ptr!(self.fn_ptr, args, out, [0]),
                2 => call_with_out_ptr!(self.fn_ptr, args, out, [0, 1]),
                3 => call_with_out_ptr!(self.fn_ptr, args, out, [0, 1, 2]),
                4 => call_with_out_ptr!(self.fn_ptr, args, out, [0, 1, 2, 3]),
                5 => call_with_out_ptr!(self.fn_ptr, args, out, [0, 1, 2, 3, 4]),
                6 => call_with_out_ptr!(self.fn_ptr, args, out, [0, 1, 2, 3, 4, 5]),
                7 => call_with_out_ptr!(self.fn_ptr, args, out, [0, 1, 2, 3, 4, 5, 6]),
                8 => call_with_out_ptr!(self.fn_ptr, args, out, [0, 1, 2, 3, 4, 5, 6, 7]),
                n => return Err(CallError::UnsupportedArity(n)),
            }
        }
        Ok(result)
    }
}

impl std::fmt::Debug for ExternalFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalFn")
            .field("fn_ptr", &self.fn_ptr)
            .field("arity", &self.arity)
            .finish()
    }
}
