use super::super::{lex, ErrorCode, Ident, Literal, Operator, TokenKind, Word};
use super::{range, span};

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn test_spans_cover_source() {
    let source = "PRINT 1 + 25\nab$ = \"hi\"\n";
    let tokens = lex(source).unwrap();
    let spans: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::LineFeed)
        .map(|t| span(source, t.range))
        .collect();
    assert_eq!(spans, vec!["PRINT", "1", "+", "25", "ab$", "=", "\"hi\""]);
}

#[test]
fn test_number_typing() {
    assert_eq!(
        kinds("32767 32768 1.5 1e3 1e40 2% 7& 3! 4#"),
        vec![
            TokenKind::Literal(Literal::Integer(32767)),
            TokenKind::Literal(Literal::Long(32768)),
            TokenKind::Literal(Literal::Single(1.5)),
            TokenKind::Literal(Literal::Single(1000.0)),
            TokenKind::Literal(Literal::Double(1e40)),
            TokenKind::Literal(Literal::Integer(2)),
            TokenKind::Literal(Literal::Long(7)),
            TokenKind::Literal(Literal::Single(3.0)),
            TokenKind::Literal(Literal::Double(4.0)),
        ]
    );
}

#[test]
fn test_number_without_sigil_overflowing_long() {
    assert_eq!(
        kinds("3000000000"),
        vec![TokenKind::Literal(Literal::Single(3e9))]
    );
}

#[test]
fn test_invalid_number() {
    let error = lex("1e").unwrap_err();
    assert_eq!(error.code(), ErrorCode::Tokenize);
    let error = lex("70000%").unwrap_err();
    assert_eq!(error.code(), ErrorCode::Tokenize);
}

#[test]
fn test_keywords_case_insensitive() {
    assert_eq!(
        kinds("For tO wHiLe mod"),
        vec![
            TokenKind::Word(Word::For),
            TokenKind::Word(Word::To),
            TokenKind::Word(Word::While),
            TokenKind::Operator(Operator::Modulus),
        ]
    );
}

#[test]
fn test_idents_preserve_case() {
    assert_eq!(
        kinds("Abc xyz$ N% lng& s! d#"),
        vec![
            TokenKind::Ident(Ident::Plain("Abc".to_string())),
            TokenKind::Ident(Ident::String("xyz$".to_string())),
            TokenKind::Ident(Ident::Integer("N%".to_string())),
            TokenKind::Ident(Ident::Long("lng&".to_string())),
            TokenKind::Ident(Ident::Single("s!".to_string())),
            TokenKind::Ident(Ident::Double("d#".to_string())),
        ]
    );
}

#[test]
fn test_remarks() {
    assert_eq!(
        kinds("' hello"),
        vec![TokenKind::Remark("' hello".to_string())]
    );
    assert_eq!(
        kinds("rem world"),
        vec![TokenKind::Remark("rem world".to_string())]
    );
    // word boundary: REMARK is an identifier
    assert_eq!(
        kinds("remark"),
        vec![TokenKind::Ident(Ident::Plain("remark".to_string()))]
    );
}

#[test]
fn test_operators() {
    use Operator::*;
    assert_eq!(
        kinds("<= >= <> < > = \\ /"),
        vec![
            TokenKind::Operator(LessEqual),
            TokenKind::Operator(GreaterEqual),
            TokenKind::Operator(NotEqual),
            TokenKind::Operator(Less),
            TokenKind::Operator(Greater),
            TokenKind::Operator(Equal),
            TokenKind::Operator(DivideInt),
            TokenKind::Operator(Divide),
        ]
    );
}

#[test]
fn test_crlf_normalized() {
    let tokens = lex("a\r\nb").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::LineFeed);
    assert_eq!(tokens[1].range, range(1, 2, 1, 3));
    assert_eq!(tokens[2].range, range(2, 1, 2, 1));
}

#[test]
fn test_jump_label_at_statement_start() {
    assert_eq!(
        kinds("again:"),
        vec![TokenKind::JumpLabel("again".to_string())]
    );
    // not at statement start: a plain colon terminator
    assert_eq!(
        kinds("print x: y:"),
        vec![
            TokenKind::Ident(Ident::Plain("print".to_string())),
            TokenKind::Ident(Ident::Plain("x".to_string())),
            TokenKind::Colon,
            TokenKind::JumpLabel("y".to_string()),
        ]
    );
}

#[test]
fn test_string_literal() {
    let source = "\"ab cd\"";
    let tokens = lex(source).unwrap();
    assert_eq!(
        tokens[0].kind,
        TokenKind::Literal(Literal::String("ab cd".to_string()))
    );
    assert_eq!(span(source, tokens[0].range), source);
}

#[test]
fn test_unterminated_string() {
    let error = lex("print \"oops\n").unwrap_err();
    assert_eq!(error.code(), ErrorCode::Tokenize);
    assert_eq!(error.range().unwrap(), range(1, 7, 1, 11));
}

#[test]
fn test_unknown_character() {
    let error = lex("print @").unwrap_err();
    assert_eq!(error.code(), ErrorCode::Tokenize);
    assert_eq!(error.range().unwrap(), range(1, 7, 1, 7));
}
