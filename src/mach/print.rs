/// Zone width of the comma tab stop.
pub const ZONE_WIDTH: usize = 14;

/// Column of the last zone boundary; a comma at or past it wraps to a
/// fresh line instead of padding. Five zones fit an 80-column device.
pub const LAST_ZONE: usize = 70;

/// ## Print location
///
/// Tracks the 0-based output column across print calls so the comma
/// separator can pad to the next zone. Feed it every byte that reaches
/// the sink: a linefeed resets the column, anything else advances it.
#[derive(Debug, Default)]
pub struct PrintLoc {
    column: usize,
}

/// What a comma separator should emit at the current column.
#[derive(Debug, PartialEq, Eq)]
pub enum Comma {
    Newline,
    Spaces(usize),
}

impl PrintLoc {
    pub fn new() -> PrintLoc {
        PrintLoc::default()
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            if *byte == b'\n' {
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn comma(&self) -> Comma {
        if self.column >= LAST_ZONE {
            Comma::Newline
        } else {
            Comma::Spaces(ZONE_WIDTH - self.column % ZONE_WIDTH)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_padding() {
        let mut loc = PrintLoc::new();
        loc.write(b"a");
        assert_eq!(loc.comma(), Comma::Spaces(13));
        loc.write(b"             ");
        assert_eq!(loc.column(), 14);
        assert_eq!(loc.comma(), Comma::Spaces(14));
    }

    #[test]
    fn test_linefeed_resets() {
        let mut loc = PrintLoc::new();
        loc.write(b"hello\nab");
        assert_eq!(loc.column(), 2);
    }

    #[test]
    fn test_last_zone_wraps() {
        let mut loc = PrintLoc::new();
        loc.write(&[b'x'; LAST_ZONE]);
        assert_eq!(loc.comma(), Comma::Newline);
    }
}
