mod common;
use common::*;
use indoc::indoc;

#[test]
fn test_expression_arithmetic() {
    assert_eq!(exec("PRINT 1 + 2 * 3\n"), " 7 \n");
}

#[test]
fn test_print_zones() {
    let source = indoc! {r#"
        print "a", "b", "c"
        print 1;-2;3;
    "#};
    assert_eq!(exec(source), "a             b             c\n 1 -2  3 ");
}

#[test]
fn test_concatenation() {
    assert_eq!(exec("print \"a\"+\"b\"\n"), "ab\n");
}

#[test]
fn test_string_variable_reuse() {
    let source = indoc! {r#"
        a$ = "koer"
        print a$;"a";a$;
    "#};
    assert_eq!(exec(source), "koerakoer");
}

#[test]
fn test_numeric_promotion() {
    let source = indoc! {r#"
        a! = 1 + 1.5
        b& = 1 + 32768
        PRINT a!; b&
    "#};
    assert_eq!(exec(source), " 2.5  32769 \n");
}

#[test]
fn test_autovivification() {
    let source = indoc! {r#"
        a = 1 * b
        a$ = "x" + b$
        print a; a$
    "#};
    assert_eq!(exec(source), " 0 x\n");
}

#[test]
fn test_multiple_statements_per_line() {
    assert_eq!(exec("a=2: b=3: print a*b\n"), " 6 \n");
}

#[test]
fn test_remarks_are_inert() {
    let source = indoc! {r#"
        ' leading remark
        a = 4 ' trailing remark
        REM another
        print a
    "#};
    assert_eq!(exec(source), " 4 \n");
}

#[test]
fn test_pragma_printed_checks_output() {
    let source = indoc! {r#"
        print "ok";
        pragma printed("ok")
    "#};
    assert_eq!(exec(source), "ok");
}

#[test]
fn test_case_insensitive_keywords_and_names() {
    let source = indoc! {r#"
        LET total = 2
        PRINT TOTAL; ToTaL
    "#};
    assert_eq!(exec(source), " 2  2 \n");
}
