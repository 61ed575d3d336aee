use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Pos;

/// Diagnostic severity. False's error model has no recoverable-error tier:
/// every `Severity::Error` diagnostic is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single compiler diagnostic: `<file>:<line>:<column>: <severity>:
/// <message>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub pos: Pos,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, pos: Pos, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            pos,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(file: impl Into<String>, pos: Pos, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            pos,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file, self.pos, self.severity, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_fatal_warning_is_not() {
        let e = Diagnostic::error("<stdin>", Pos::new(1, 1), "']' unexpected.");
        let w = Diagnostic::warning("<stdin>", Pos::new(2, 3), "inline assembly ignored");
        assert!(e.is_fatal());
        assert!(!w.is_fatal());
    }

    #[test]
    fn display_matches_file_line_col_format() {
        let e = Diagnostic::error("<stdin>", Pos::new(1, 1), "']' unexpected.");
        assert_eq!(format!("{e}"), "<stdin>:1:1: error: ']' unexpected.");
    }

    #[test]
    fn json_round_trip() {
        let e = Diagnostic::error("prog.f", Pos::new(4, 2), "Invalid character 'z'.");
        let json = serde_json::to_string(&e).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, e.message);
        assert_eq!(back.pos, e.pos);
    }
}
