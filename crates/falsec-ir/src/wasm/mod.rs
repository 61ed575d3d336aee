//! The one concrete realization of the IR Builder interface this workspace
//! ships: a standalone WASM module, chosen because it is a real standard
//! module format with a widely-used Rust encoder/validator pair
//! (`wasm-encoder`/`wasmparser`), unlike LLVM or Cranelift which would need
//! a system toolchain or a much heavier dependency to stand in for "a
//! standard compiler backend" here.

mod func;
mod module;

pub use func::WasmFuncBuilder;
pub use module::WasmModuleBuilder;
