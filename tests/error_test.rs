mod common;
use basic::lang::ErrorCode;
use common::*;
use indoc::indoc;

#[test]
fn test_string_plus_number_is_compile_error() {
    let error = exec_err("print \"a\"+2\n");
    assert_eq!(error.code(), ErrorCode::TypeMismatch);
    assert_eq!(
        error.to_string(),
        "TYPE MISMATCH: cannot coerce INTEGER to STRING"
    );
}

#[test]
fn test_long_to_integer_overflow_at_runtime() {
    let error = exec_err("a% = 70000\n");
    assert_eq!(error.code(), ErrorCode::Overflow);
    assert_eq!(
        error.to_string(),
        "OVERFLOW: overflow coercing LONG to INTEGER"
    );
}

#[test]
fn test_lex_error_has_range() {
    let error = exec_err("print \"unterminated\n");
    assert_eq!(error.code(), ErrorCode::Tokenize);
    let range = error.range().unwrap();
    assert_eq!((range.start.line, range.start.column), (1, 7));
}

#[test]
fn test_parse_error_mid_program() {
    let source = indoc! {r#"
        a = 1
        b = * 2
    "#};
    let error = exec_err(source);
    assert_eq!(error.code(), ErrorCode::UnexpectedToken);
    assert_eq!(error.range().unwrap().start.line, 2);
}

#[test]
fn test_runtime_error_reports_statement_range() {
    let source = indoc! {r#"
        a = 1
        b% = 32767 + 1
    "#};
    let error = exec_err(source);
    assert_eq!(error.code(), ErrorCode::Overflow);
    assert_eq!(error.range().unwrap().start.line, 2);
}

#[test]
fn test_control_flow_rejected_with_range() {
    let source = indoc! {r#"
        a = 1
        for i = 1 to 3
    "#};
    let error = exec_err(source);
    assert_eq!(error.code(), ErrorCode::NotImplemented);
    assert_eq!(error.range().unwrap().start.line, 2);
}

#[test]
fn test_division_by_zero() {
    let error = exec_err("print 1 \\ 0\n");
    assert_eq!(error.code(), ErrorCode::DivisionByZero);
}
