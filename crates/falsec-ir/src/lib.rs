//! The IR builder interface and its WASM realization.
//!
//! [`ModuleBuilder`]/[`FuncBuilder`] keep `falsec-compiler` from depending
//! on any particular backend, the same way `rustc_codegen_ssa`'s
//! `BuilderMethods` keeps `rustc` generic over LLVM, Cranelift, and GCC.
//! [`wasm::WasmModuleBuilder`] is the only implementation in this
//! workspace.

pub mod builder;
pub mod error;
pub mod layout;
pub mod ops;
pub mod wasm;

pub use builder::{FuncBuilder, ModuleBuilder};
pub use error::IrError;
pub use ops::{BinOp, BlockHint, CmpOp, RuntimeFn, StringRef};
pub use wasm::{WasmFuncBuilder, WasmModuleBuilder};
