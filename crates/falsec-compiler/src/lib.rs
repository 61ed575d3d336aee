//! The False lexer/parser/code-generator: a single recursive-descent pass
//! that lowers `[`-delimited lambdas directly into backend IR as it scans,
//! through the interface in `falsec-ir`, with no intermediate AST.

pub mod environment;
pub mod lambda;
pub mod parser;
pub mod stackops;

pub use environment::compile;
pub use falsec_ir::{BinOp, CmpOp};
pub use lambda::LambdaTree;
pub use parser::Compiler;
