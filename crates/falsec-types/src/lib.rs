//! Shared types for the falsec compiler: diagnostics, source positions, and
//! compile-time options. No behavior lives here — every other crate in the
//! workspace depends on this one.

pub mod diagnostic;
pub mod error;
pub mod options;
pub mod span;

pub use diagnostic::{Diagnostic, Severity};
pub use error::{FalseError, FalseResult};
pub use options::CompileOptions;
pub use span::Pos;
