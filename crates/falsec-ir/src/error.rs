/// Errors raised while assembling a finished module, as opposed to errors in
/// the source program (those are [`falsec_types::FalseError`]).
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    #[error("module failed validation: {0}")]
    ValidationFailed(String),

    #[error("{what} exceeds the backend's limit ({limit})")]
    LimitExceeded { what: &'static str, limit: u64 },

    #[error("internal codegen error: {0}")]
    Internal(String),
}
