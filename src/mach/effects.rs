use super::print::{Comma, PrintLoc};
use super::val::Val;
use crate::error;
use crate::lang::Error;
use std::io::Write;

type Result<T> = std::result::Result<T, Error>;

/// ## Effects
///
/// The capability the machine uses to emit side effects. The machine
/// depends only on this trait, which is what lets the production driver
/// and the test harness share one machine implementation.
pub trait Effects {
    /// Format a value and append it to the output sink.
    fn print(&mut self, val: &Val) -> Result<()>;
    /// Advance to the next print zone, or wrap past the last one.
    fn print_comma(&mut self) -> Result<()>;
    /// Emit a newline and reset the column.
    fn print_linefeed(&mut self) -> Result<()>;
    /// Testing hook: check the output produced so far. Production
    /// implementations may ignore it.
    fn pragma_printed(&mut self, expected: &str) -> Result<()>;
}

/// Production effects: writes through a `PrintLoc` to any writer.
pub struct Console<W: Write> {
    out: W,
    loc: PrintLoc,
}

impl Console<std::io::Stdout> {
    pub fn stdout() -> Console<std::io::Stdout> {
        Console::new(std::io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Console<W> {
        Console {
            out,
            loc: PrintLoc::new(),
        }
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        if let Err(e) = self.out.write_all(bytes) {
            return Err(error!(IoError; "{}", e));
        }
        self.loc.write(bytes);
        Ok(())
    }
}

impl<W: Write> Effects for Console<W> {
    fn print(&mut self, val: &Val) -> Result<()> {
        self.emit(val.to_string().as_bytes())
    }

    fn print_comma(&mut self) -> Result<()> {
        match self.loc.comma() {
            Comma::Newline => self.emit(b"\n"),
            Comma::Spaces(n) => self.emit(" ".repeat(n).as_bytes()),
        }
    }

    fn print_linefeed(&mut self) -> Result<()> {
        self.emit(b"\n")
    }

    fn pragma_printed(&mut self, _expected: &str) -> Result<()> {
        Ok(())
    }
}

/// Capturing effects: accumulates output in memory. `pragma_printed`
/// compares the accumulated buffer against the expectation, which makes
/// this the embedder's golden-output harness.
#[derive(Debug, Default)]
pub struct Capture {
    buf: String,
    loc: PrintLoc,
}

impl Capture {
    pub fn new() -> Capture {
        Capture::default()
    }

    pub fn output(&self) -> &str {
        &self.buf
    }

    pub fn column(&self) -> usize {
        self.loc.column()
    }

    fn emit(&mut self, s: &str) {
        self.buf.push_str(s);
        self.loc.write(s.as_bytes());
    }
}

impl Effects for Capture {
    fn print(&mut self, val: &Val) -> Result<()> {
        self.emit(&val.to_string());
        Ok(())
    }

    fn print_comma(&mut self) -> Result<()> {
        match self.loc.comma() {
            Comma::Newline => self.emit("\n"),
            Comma::Spaces(n) => self.emit(&" ".repeat(n)),
        }
        Ok(())
    }

    fn print_linefeed(&mut self) -> Result<()> {
        self.emit("\n");
        Ok(())
    }

    fn pragma_printed(&mut self, expected: &str) -> Result<()> {
        if self.buf == expected {
            Ok(())
        } else {
            Err(error!(PragmaFailed; "expected {:?}, printed {:?}", expected, self.buf))
        }
    }
}
