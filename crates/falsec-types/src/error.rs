use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Fatal compiler errors.
///
/// A `FalseError::Lex` carries the one diagnostic that terminated
/// compilation; there is no error recovery, so there is never more than
/// one.
#[derive(Debug, Error)]
pub enum FalseError {
    #[error("{0}")]
    Lex(Diagnostic),

    #[error("can't open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("internal compiler error: {0}")]
    Internal(String),
}

impl FalseError {
    pub fn lex(diagnostic: Diagnostic) -> Self {
        Self::Lex(diagnostic)
    }
}

pub type FalseResult<T> = Result<T, FalseError>;
