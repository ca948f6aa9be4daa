use super::{compile_err, listing};
use crate::lang::ErrorCode;

#[test]
fn test_let_assigns_slot() {
    assert_eq!(listing("a% = 2"), "0000 PUSH_IMM_INTEGER 2\n0003 LET 0\n");
}

#[test]
fn test_slots_first_assignment_order() {
    let l = listing("a = 1\nb$ = \"x\"\na = 2");
    assert_eq!(l.matches("LET 0").count(), 2);
    assert_eq!(l.matches("LET 1").count(), 1);
}

#[test]
fn test_slot_names_fold_case() {
    let l = listing("A = 1\nprint a");
    assert!(l.contains("PUSH_VARIABLE 0"));
    assert!(!l.contains("LET 1"));
}

#[test]
fn test_sigils_make_distinct_slots() {
    // A and A! are distinct sigil-qualified names
    let l = listing("a = 1\na! = 2\na% = 3");
    assert!(l.contains("LET 2"));
}

#[test]
fn test_operand_promotion() {
    assert_eq!(
        listing("a! = 1 + 1.5"),
        "0000 PUSH_IMM_INTEGER 1\n\
         0003 COERCE_INTEGER_SINGLE\n\
         0004 PUSH_IMM_SINGLE 1.5\n\
         0009 OPERATOR_ADD_SINGLE\n\
         000a LET 0\n"
    );
    assert_eq!(
        listing("b& = 1 + 32768"),
        "0000 PUSH_IMM_INTEGER 1\n\
         0003 PROMOTE_INTEGER_LONG\n\
         0004 PUSH_IMM_LONG 32768\n\
         0009 OPERATOR_ADD_LONG\n\
         000a LET 0\n"
    );
}

#[test]
fn test_let_narrows_to_slot_type() {
    assert_eq!(
        listing("a% = 70000"),
        "0000 PUSH_IMM_LONG 70000\n0005 COERCE_LONG_INTEGER\n0006 LET 0\n"
    );
}

#[test]
fn test_autovivified_read_pushes_zero() {
    assert_eq!(
        listing("a = b"),
        "0000 PUSH_IMM_SINGLE 0\n0005 LET 0\n"
    );
    let l = listing("a$ = b$");
    assert!(l.contains("PUSH_IMM_STRING \"\""));
}

#[test]
fn test_float_divide_promotes() {
    assert_eq!(
        listing("print 10 / 4"),
        "0000 PUSH_IMM_INTEGER 10\n\
         0003 COERCE_INTEGER_SINGLE\n\
         0004 PUSH_IMM_INTEGER 4\n\
         0007 COERCE_INTEGER_SINGLE\n\
         0008 OPERATOR_FDIVIDE_SINGLE\n\
         0009 BUILTIN_PRINT\n\
         000a BUILTIN_PRINT_LINEFEED\n"
    );
    let l = listing("print 10 / 4#");
    assert!(l.contains("OPERATOR_FDIVIDE_DOUBLE"));
    assert!(l.contains("COERCE_INTEGER_DOUBLE"));
}

#[test]
fn test_integer_divide() {
    let l = listing("print 7 \\ 2");
    assert!(l.contains("OPERATOR_IDIVIDE_INTEGER"));
    // float operands keep their join; the operator rounds and the result
    // is long
    let l = listing("a& = 7.7 \\ 2");
    assert!(l.contains("COERCE_INTEGER_SINGLE"));
    assert!(l.ends_with("0009 OPERATOR_IDIVIDE_SINGLE\n000a LET 0\n"));
}

#[test]
fn test_string_concatenation() {
    let l = listing("print \"a\" + \"b\"");
    assert!(l.contains("OPERATOR_ADD_STRING"));
}

#[test]
fn test_string_numeric_mismatch() {
    let error = compile_err("print \"a\" + 2");
    assert_eq!(error.code(), ErrorCode::TypeMismatch);
    assert_eq!(
        error.to_string(),
        "TYPE MISMATCH: cannot coerce INTEGER to STRING"
    );
    let error = compile_err("a% = \"x\"");
    assert_eq!(
        error.to_string(),
        "TYPE MISMATCH: cannot coerce STRING to INTEGER"
    );
    let error = compile_err("print \"a\" - \"b\"");
    assert_eq!(error.to_string(), "TYPE MISMATCH: cannot subtract STRING");
    let error = compile_err("print -\"a\"");
    assert_eq!(error.to_string(), "TYPE MISMATCH: cannot negate STRING");
}

#[test]
fn test_end_stops_emission() {
    let l = listing("a = 1\nend\nprint 2");
    assert!(!l.contains("BUILTIN_PRINT"));
}

#[test]
fn test_remark_and_jump_label_emit_nothing() {
    assert_eq!(listing("' nothing\nstart:"), "");
}

#[test]
fn test_control_flow_not_compiled() {
    for source in [
        "if 1 then\n",
        "if 1 then a=1",
        "for i = 1 to 3",
        "next",
        "goto fin",
        "gosub fin",
        "return",
        "stop",
        "while 1",
        "wend",
        "do",
        "loop",
    ] {
        let error = compile_err(source);
        assert_eq!(error.code(), ErrorCode::NotImplemented, "{}", source);
    }
}

#[test]
fn test_unsupported_operators() {
    for source in ["print 1 mod 2", "print 1 = 2", "print 1 and 2", "print 1 or 0"] {
        let error = compile_err(source);
        assert_eq!(error.code(), ErrorCode::NotImplemented, "{}", source);
    }
}

#[test]
fn test_unknown_statement() {
    let error = compile_err("foo 1");
    assert_eq!(error.code(), ErrorCode::SyntaxError);
    let error = compile_err("pragma foo(\"x\")");
    assert_eq!(error.code(), ErrorCode::SyntaxError);
    let error = compile_err("pragma printed(1)");
    assert_eq!(error.code(), ErrorCode::SyntaxError);
}

#[test]
fn test_pragma_printed_compiles() {
    let l = listing("print 1;\npragma printed(\" 1 \")");
    assert!(l.contains("PRAGMA_PRINTED \" 1 \""));
}

#[test]
fn test_error_carries_statement_range() {
    let error = compile_err("a = 1\nprint \"a\" + 2");
    let range = error.range().unwrap();
    assert_eq!(range.start.line, 2);
}
