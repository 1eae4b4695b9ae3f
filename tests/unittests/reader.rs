// Reader tests through the public API

use simd_lisp::ast::{Call, Definition};
use simd_lisp::reader::{Lexer, Token};
use simd_lisp::{parse, parse_all, Node, ParseError};

#[test]
fn test_lexer_public_api() {
    let mut lexer = Lexer::new("(f)");
    assert_eq!(lexer.next_token(), Token::LeftParen);
    let token = lexer.next_token();
    assert_eq!(token, Token::Atom("f".to_string()));
    lexer.push_back(token.clone());
    assert_eq!(lexer.next_token(), token);
    assert_eq!(lexer.next_token(), Token::RightParen);
    assert_eq!(lexer.next_token(), Token::End);
    assert_eq!(lexer.next_token(), Token::End);
}

#[test]
fn test_nested_tree_shape() {
    let expected = Node::Definition(Definition::new(
        "f",
        vec!["a".to_string()],
        Node::Call(Call {
            name: "*".to_string(),
            args: vec![
                Node::Variable("a".to_string()),
                Node::Call(Call {
                    name: "sqrt".to_string(),
                    args: vec![Node::Number(2.0)],
                }),
            ],
        }),
    ));
    assert_eq!(parse("(def f (a) (* a (sqrt 2)))"), Ok(expected));
}

#[test]
fn test_whitespace_is_flexible() {
    assert_eq!(
        parse("(+\n\t1   2)"),
        parse("(+ 1 2)"),
    );
    assert_eq!(parse("  (f)  "), parse("(f)"));
}

#[test]
fn test_zero_literal_is_a_variable() {
    // Atoms that read as zero cannot be numeric literals.
    for text in ["0", "0.0", "-0", "0e10", "zero", "x1"] {
        assert_eq!(parse(text), Ok(Node::Variable(text.to_string())), "{}", text);
    }
}

#[test]
fn test_unbalanced_input() {
    assert_eq!(parse("(+ 1 (* 2 3)"), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse("(def"), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse("(def f"), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse("(def f (a"), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse_all("(f) )"), Err(ParseError::UnexpectedClose));
}

#[test]
fn test_def_as_argument_parses() {
    // Rejected later by the compiler, not by the reader.
    let node = parse("(+ 1 (def g (x) x))").unwrap();
    match node {
        Node::Call(call) => assert!(call.args[1].as_definition().is_some()),
        other => panic!("expected a call, got {:?}", other),
    }
}
