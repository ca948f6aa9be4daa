use super::opcode::Opcode;
use crate::lang::{Error, Range};

/// Assembled bytecode plus a sparse side table mapping byte offsets to
/// source ranges, one entry per statement. The byte stream is exactly
/// what would be persisted: no header, little-endian immediates.
#[derive(Debug, Default)]
pub struct Program {
    code: Vec<u8>,
    ranges: Vec<(usize, Range)>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub(crate) fn begin_statement(&mut self, range: Range) {
        self.ranges.push((self.code.len(), range));
    }

    pub(crate) fn emit(&mut self, opcode: &Opcode) {
        opcode.encode(&mut self.code);
    }

    /// The source range of the statement covering a byte offset.
    pub fn range_at(&self, offset: usize) -> Option<Range> {
        let index = self.ranges.partition_point(|(at, _)| *at <= offset);
        if index == 0 {
            None
        } else {
            Some(self.ranges[index - 1].1)
        }
    }

    /// Renders the disassembly, one instruction per line with its byte
    /// offset.
    pub fn listing(&self) -> Result<String, Error> {
        let mut s = String::new();
        let mut pc = 0;
        while pc < self.code.len() {
            let at = pc;
            let opcode = Opcode::decode(&self.code, &mut pc)?;
            s.push_str(&format!("{:04x} {}\n", at, opcode));
        }
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Position;

    fn range(line: u32) -> Range {
        Range::new(Position::new(line, 1), Position::new(line, 10))
    }

    #[test]
    fn test_range_side_table() {
        let mut program = Program::new();
        program.begin_statement(range(1));
        program.emit(&Opcode::PushImmInteger(1));
        program.emit(&Opcode::Print);
        program.begin_statement(range(2));
        program.emit(&Opcode::PrintLinefeed);
        assert_eq!(program.range_at(0), Some(range(1)));
        assert_eq!(program.range_at(3), Some(range(1)));
        assert_eq!(program.range_at(4), Some(range(2)));
    }

    #[test]
    fn test_listing() {
        let mut program = Program::new();
        program.emit(&Opcode::PushImmInteger(2));
        program.emit(&Opcode::Let(0));
        assert_eq!(program.listing().unwrap(), "0000 PUSH_IMM_INTEGER 2\n0003 LET 0\n");
    }
}
