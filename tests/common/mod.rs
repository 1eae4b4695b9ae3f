//! Shared test helpers for the simd-lisp test suite.

#![allow(dead_code)]

use simd_lisp::{CompileError, Session, Vec4};

pub fn session() -> Session {
    Session::new().expect("Failed to create session")
}

/// Compile `source` as a nullary expression in a fresh session and run it.
pub fn eval(source: &str) -> Result<Vec4, CompileError> {
    eval_in(&mut session(), source)
}

/// Compile `source` as a nullary expression in `session` and run it.
pub fn eval_in(session: &mut Session, source: &str) -> Result<Vec4, CompileError> {
    let f = session.compile_external_expression::<&str>(source, &[])?;
    Ok(f.call(&[]).expect("nullary call"))
}

/// Lane-wise comparison with a relative tolerance.
pub fn assert_close(actual: Vec4, expected: Vec4) {
    for lane in 0..4 {
        let (a, e) = (actual[lane], expected[lane]);
        let tolerance = 1e-5 * e.abs().max(1.0);
        assert!(
            (a - e).abs() <= tolerance,
            "lane {}: got {}, expected {} (full result {:?})",
            lane,
            a,
            e,
            actual
        );
    }
}
