use std::fmt::Debug;
use std::hash::Hash;

use falsec_types::CompileOptions;

use crate::error::IrError;
use crate::ops::{BinOp, BlockHint, CmpOp, RuntimeFn, StringRef};

/// Everything the parser needs from a module builder to turn one lambda
/// tree into a finished module, kept abstract over the concrete target the
/// same way `rustc_codegen_ssa::traits::BuilderMethods` stays abstract over
/// LLVM, Cranelift, and GCC. `falsec-compiler` is written entirely against
/// this trait; [`crate::wasm::WasmModuleBuilder`] is the one implementation
/// this workspace ships.
pub trait ModuleBuilder: Sized {
    /// A handle identifying one lambda's function within the module, valid
    /// for the lifetime of the module builder.
    type Func: Copy + Eq + Hash + Debug;
    /// The per-function builder this backend hands back from
    /// [`declare_lambda`](Self::declare_lambda).
    type Builder: FuncBuilder<Func = Self::Func>;

    fn new(options: CompileOptions) -> Self;

    /// Reserve a function slot for lambda `id` (the lambda tree's index)
    /// and start building its body.
    fn declare_lambda(&mut self, id: u32) -> (Self::Func, Self::Builder);

    /// Hand a completed lambda body back to the module.
    fn finish_lambda(&mut self, builder: Self::Builder);

    /// Intern a NUL-free byte string as backend-owned constant data,
    /// returning a handle `FuncBuilder::string_ptr` can later turn into an
    /// address.
    fn define_string_constant(&mut self, bytes: &[u8]) -> StringRef;

    /// Assemble every declared lambda into a finished module image, in
    /// lambda-id order. `lambdas[0]` is the top-level program; the backend
    /// synthesizes the module's externally-callable entry point around a
    /// call to it. Consumes the builder.
    fn assemble(self, lambdas: &[Self::Func]) -> Result<Vec<u8>, IrError>;
}

/// Per-lambda builder: the instruction-level surface of the backend
/// contract. One `FuncBuilder` lowers exactly one lambda body (or, for the
/// synthesized entry point, the top-level program).
pub trait FuncBuilder {
    type Func: Copy + Eq + Hash;
    /// An SSA-style value handle. Every operation that "produces a value"
    /// returns a fresh one; none are ever mutated in place. Without
    /// optimization to worry about, the simplest scheme is also the right
    /// one: materialize every value into its own backend-native slot rather
    /// than track stack-machine operand order by hand.
    type Value: Copy;
    /// A basic block handle.
    type Block: Copy + Eq;

    fn entry_block(&self) -> Self::Block;
    /// Allocate a new block, tagged with the structural role it plays.
    fn append_block(&mut self, hint: BlockHint) -> Self::Block;
    /// Direct subsequent instruction-building calls to append to `block`.
    fn position_at_end(&mut self, block: Self::Block);

    fn const_i32(&mut self, v: i32) -> Self::Value;

    /// Current depth of the evaluation stack (number of live cells).
    fn stack_index(&mut self) -> Self::Value;
    /// Read the cell `depth` slots from the bottom of the evaluation stack.
    fn load_stack_slot(&mut self, depth: Self::Value) -> Self::Value;
    /// Write the cell `depth` slots from the bottom of the evaluation stack.
    fn store_stack_slot(&mut self, depth: Self::Value, v: Self::Value);
    /// Adjust the live stack depth by `delta` (push with +1, pop with -1).
    fn grow_stack(&mut self, delta: i32);

    fn load_var(&mut self, idx: Self::Value) -> Self::Value;
    fn store_var(&mut self, idx: Self::Value, v: Self::Value);

    fn bin_op(&mut self, op: BinOp, a: Self::Value, b: Self::Value) -> Self::Value;
    fn icmp(&mut self, op: CmpOp, a: Self::Value, b: Self::Value) -> Self::Value;
    /// Two's-complement negation (`_`).
    fn neg(&mut self, v: Self::Value) -> Self::Value;
    /// Bitwise complement (`~`).
    fn not(&mut self, v: Self::Value) -> Self::Value;
    /// `i1 = x != 0`, used to turn a False truth value into a branch
    /// condition (`?`/`#`).
    fn isnonzero(&mut self, v: Self::Value) -> Self::Value;

    /// Indirect call through the lambda table (`!`).
    fn call_lambda(&mut self, id: Self::Value);
    fn call_runtime_void(&mut self, f: RuntimeFn, args: &[Self::Value]);
    fn call_runtime_value(&mut self, f: RuntimeFn, args: &[Self::Value]) -> Self::Value;

    fn string_ptr(&mut self, s: StringRef) -> Self::Value;

    fn build_br(&mut self, target: Self::Block);
    fn build_cond_br(&mut self, cond: Self::Value, then_blk: Self::Block, else_blk: Self::Block);
    fn build_ret_void(&mut self);
}
