//! Runtime helpers for JIT-compiled code
//!
//! Cranelift has no vector instructions for transcendental functions, so
//! these intrinsics are called once per lane. All helpers use the C calling
//! convention and operate on plain `f32`.

#[no_mangle]
pub extern "C" fn simd_lisp_sin(x: f32) -> f32 {
    x.sin()
}

#[no_mangle]
pub extern "C" fn simd_lisp_cos(x: f32) -> f32 {
    x.cos()
}

#[no_mangle]
pub extern "C" fn simd_lisp_exp(x: f32) -> f32 {
    x.exp()
}

/// Natural logarithm
#[no_mangle]
pub extern "C" fn simd_lisp_log(x: f32) -> f32 {
    x.ln()
}

#[no_mangle]
pub extern "C" fn simd_lisp_pow(base: f32, exp: f32) -> f32 {
    base.powf(exp)
}

/// Symbol name and address of every helper, for registration with the JIT.
pub(crate) fn symbols() -> [(&'static str, *const u8); 5] {
    [
        ("simd_lisp_sin", simd_lisp_sin as *const u8),
        ("simd_lisp_cos", simd_lisp_cos as *const u8),
        ("simd_lisp_exp", simd_lisp_exp as *const u8),
        ("simd_lisp_log", simd_lisp_log as *const u8),
        ("simd_lisp_pow", simd_lisp_pow as *const u8),
    ]
}
