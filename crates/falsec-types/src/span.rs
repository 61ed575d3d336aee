use std::fmt;

use serde::{Deserialize, Serialize};

/// A source position: 1-based line, 0-based column, incremented per byte
/// consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position of lambda 0, before any byte has been read.
    pub const fn start() -> Self {
        Self::new(1, 0)
    }

    /// Advance past one consumed byte.
    pub fn advance(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_one_zero() {
        let p = Pos::start();
        assert_eq!(p.line, 1);
        assert_eq!(p.column, 0);
    }

    #[test]
    fn advance_increments_column() {
        let mut p = Pos::start();
        p.advance(b'x');
        p.advance(b'y');
        assert_eq!(p, Pos::new(1, 2));
    }

    #[test]
    fn advance_on_newline_resets_column_and_bumps_line() {
        let mut p = Pos::new(1, 5);
        p.advance(b'\n');
        assert_eq!(p, Pos::new(2, 0));
    }

    #[test]
    fn display_matches_file_line_col_format() {
        assert_eq!(format!("{}", Pos::new(3, 7)), "3:7");
    }
}
