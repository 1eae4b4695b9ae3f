// Language semantics, end to end through the session entry points

use crate::common::{assert_close, eval, eval_in, session};
use simd_lisp::CompileError;

#[test]
fn test_identity_round_trip() {
    let mut s = session();
    let f = s.compile_external_definition("(def id (x) x)").unwrap();
    assert_eq!(f.call(&[[1.0, 2.0, 3.0, 4.0]]), Ok([1.0, 2.0, 3.0, 4.0]));
}

#[test]
fn test_literals_broadcast() {
    assert_eq!(eval("7").unwrap(), [7.0; 4]);
    assert_eq!(eval("-1.5").unwrap(), [-1.5; 4]);
}

#[test]
fn test_hex_and_infinite_literals() {
    assert_eq!(eval("(+ 0x10 1)").unwrap(), [17.0; 4]);
    assert_eq!(eval("(* -inf 2)").unwrap(), [f32::NEG_INFINITY; 4]);
    assert!(eval("(+ nan 1)").unwrap().iter().all(|v| v.is_nan()));
}

#[test]
fn test_left_fold_order() {
    assert_eq!(eval("(- 10 3 2)").unwrap(), [5.0; 4]);
    assert_eq!(eval("(/ 8 2 2)").unwrap(), [2.0; 4]);
    assert_eq!(eval("(+ 1 2 3 4)").unwrap(), [10.0; 4]);
    assert_eq!(eval("(* 2 3 4)").unwrap(), [24.0; 4]);
}

#[test]
fn test_nested_arithmetic() {
    assert_eq!(eval("(+ (* 2 3) (- 10 (/ 8 2)))").unwrap(), [12.0; 4]);
}

#[test]
fn test_unbound_variable_is_zero() {
    assert_eq!(eval("y").unwrap(), [0.0; 4]);
    assert_eq!(eval("(+ y 3)").unwrap(), [3.0; 4]);
}

#[test]
fn test_zero_literal_reads_as_zero() {
    // `0` is a variable reference, which is unbound and therefore zero.
    assert_eq!(eval("(+ 0 5)").unwrap(), [5.0; 4]);
    assert_eq!(eval("(* 0 5)").unwrap(), [0.0; 4]);
}

#[test]
fn test_zero_named_parameter_can_be_bound() {
    // A variable called `zero` shadows nothing special; binding works as usual.
    let mut s = session();
    let f = s
        .compile_external_expression("(+ zero 1)", &["zero"])
        .unwrap();
    assert_eq!(f.call(&[[1.0, 2.0, 3.0, 4.0]]), Ok([2.0, 3.0, 4.0, 5.0]));
}

#[test]
fn test_unary_intrinsics() {
    assert_close(eval("(sqrt 4)").unwrap(), [2.0; 4]);
    assert_close(eval("(sin 1)").unwrap(), [1f32.sin(); 4]);
    assert_close(eval("(cos 1)").unwrap(), [1f32.cos(); 4]);
    assert_close(eval("(exp 1)").unwrap(), [std::f32::consts::E; 4]);
    assert_close(eval("(log 10)").unwrap(), [10f32.ln(); 4]);
}

#[test]
fn test_pow() {
    assert_close(eval("(pow 2 3)").unwrap(), [8.0; 4]);
    assert_close(eval("(pow 9 0.5)").unwrap(), [3.0; 4]);
}

#[test]
fn test_intrinsics_are_lane_wise() {
    let mut s = session();
    let f = s
        .compile_external_expression("(pow (sqrt v) 2)", &["v"])
        .unwrap();
    let out = f.call(&[[1.0, 4.0, 9.0, 16.0]]).unwrap();
    assert_close(out, [1.0, 4.0, 9.0, 16.0]);

    let g = s
        .compile_external_expression("(exp (log v))", &["v"])
        .unwrap();
    assert_close(g.call(&[[0.5, 1.0, 2.0, 8.0]]).unwrap(), [0.5, 1.0, 2.0, 8.0]);
}

#[test]
fn test_intrinsic_arity_falls_through_to_lookup() {
    assert_eq!(
        eval("(sqrt 1 2)"),
        Err(CompileError::UnknownFunction {
            name: "sqrt".to_string(),
            arity: 2
        })
    );
    assert_eq!(
        eval("(pow 2)"),
        Err(CompileError::UnknownFunction {
            name: "pow".to_string(),
            arity: 1
        })
    );
    assert_eq!(
        eval("(+ 1)"),
        Err(CompileError::UnknownFunction {
            name: "+".to_string(),
            arity: 1
        })
    );
}

#[test]
fn test_user_function_can_extend_operator_name() {
    // `+` with one argument is not arithmetic, so plain lookup applies.
    let mut s = session();
    s.define_internal("(def + (a) (* a 10))").unwrap();
    assert_eq!(eval_in(&mut s, "(+ 2)").unwrap(), [20.0; 4]);
    assert_eq!(eval_in(&mut s, "(+ 2 3)").unwrap(), [5.0; 4]);
}

#[test]
fn test_duplicate_parameter_rejected() {
    let mut s = session();
    assert_eq!(
        s.compile_external_definition("(def f (x x) x)").err(),
        Some(CompileError::DuplicateParam("x".to_string()))
    );
    assert_eq!(
        s.define_internal("(def f (x x) x)"),
        Err(CompileError::DuplicateParam("x".to_string()))
    );
    assert_eq!(s.lookup("f"), None);
}

#[test]
fn test_reserved_parameter_rejected() {
    let mut s = session();
    assert_eq!(
        s.compile_external_definition("(def f (result) result)").err(),
        Some(CompileError::ReservedParam)
    );
}

#[test]
fn test_unknown_call_rejected() {
    assert_eq!(
        eval("(g 1 2)"),
        Err(CompileError::UnknownFunction {
            name: "g".to_string(),
            arity: 2
        })
    );
}

#[test]
fn test_arity_mismatch_rejected() {
    let mut s = session();
    s.define_internal("(def f (a b) (+ a b))").unwrap();
    assert_eq!(
        eval_in(&mut s, "(f 1)"),
        Err(CompileError::UnknownFunction {
            name: "f".to_string(),
            arity: 1
        })
    );
    assert_eq!(eval_in(&mut s, "(f 1 2)").unwrap(), [3.0; 4]);
}

#[test]
fn test_failing_argument_fails_whole_call() {
    let mut s = session();
    s.define_internal("(def f (a) a)").unwrap();
    assert!(eval_in(&mut s, "(f (missing 1))").is_err());
    assert!(eval_in(&mut s, "(+ 1 (sqrt (missing)))").is_err());
}

#[test]
fn test_zero_arity_function() {
    let mut s = session();
    s.define_internal("(def three () 3)").unwrap();
    assert_eq!(eval_in(&mut s, "(three)").unwrap(), [3.0; 4]);
    assert_eq!(eval_in(&mut s, "(* (three) (three))").unwrap(), [9.0; 4]);
}

#[test]
fn test_body_free_variables_read_zero() {
    let mut s = session();
    s.define_internal("(def f (a) (+ a b))").unwrap();
    assert_eq!(eval_in(&mut s, "(f 4)").unwrap(), [4.0; 4]);
}

#[test]
fn test_parameters_are_function_scoped() {
    // `x` bound in `f` is not visible in the caller's expression.
    let mut s = session();
    s.define_internal("(def f (x) x)").unwrap();
    assert_eq!(eval_in(&mut s, "(+ (f 2) x)").unwrap(), [2.0; 4]);
}
