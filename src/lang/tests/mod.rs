use super::{Position, Range};

mod lex_test;

pub fn range(l1: u32, c1: u32, l2: u32, c2: u32) -> Range {
    Range::new(Position::new(l1, c1), Position::new(l2, c2))
}

/// The slice of source covered by a single-line range.
pub fn span(source: &str, range: Range) -> &str {
    assert_eq!(range.start.line, range.end.line);
    let line = source.split('\n').nth(range.start.line as usize - 1).unwrap();
    &line[range.start.column as usize - 1..=range.end.column as usize - 1]
}
