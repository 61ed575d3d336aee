use wasm_encoder::{BlockType, Function, Instruction, MemArg, ValType};

use crate::builder::FuncBuilder;
use crate::layout;
use crate::ops::{BinOp, BlockHint, CmpOp, RuntimeFn, StringRef};
use crate::wasm::module::{LAMBDA_CALL_TYPE, RT_FUNC_IDX, STACK_INDEX_GLOBAL};

fn memarg(offset: u32, align: u32) -> MemArg {
    MemArg {
        offset: offset as u64,
        align,
        memory_index: 0,
    }
}

/// An instruction that doesn't need any block/loop/if structuring, i.e.
/// everything except the block terminators, which are kept separate so the
/// lowering pass can decide how to structure them once a whole lambda's
/// block graph is known (see [`WasmFuncBuilder::lower`]).
#[derive(Debug, Clone, Copy)]
enum Op {
    ConstI32(i32),
    LocalGet(u32),
    LocalSet(u32),
    GlobalGet(u32),
    GlobalSet(u32),
    I32Load(u32),
    I32Store(u32),
    I32Add,
    I32Sub,
    I32Mul,
    I32DivS,
    I32DivU,
    I32And,
    I32Or,
    I32Xor,
    I32Eq,
    I32GtS,
    I32GtU,
    I32Eqz,
    CallIndirect,
    Call(u32),
}

impl Op {
    fn emit(self, f: &mut Function) {
        let instr = match self {
            Op::ConstI32(v) => Instruction::I32Const(v),
            Op::LocalGet(i) => Instruction::LocalGet(i),
            Op::LocalSet(i) => Instruction::LocalSet(i),
            Op::GlobalGet(i) => Instruction::GlobalGet(i),
            Op::GlobalSet(i) => Instruction::GlobalSet(i),
            Op::I32Load(off) => Instruction::I32Load(memarg(off, 2)),
            Op::I32Store(off) => Instruction::I32Store(memarg(off, 2)),
            Op::I32Add => Instruction::I32Add,
            Op::I32Sub => Instruction::I32Sub,
            Op::I32Mul => Instruction::I32Mul,
            Op::I32DivS => Instruction::I32DivS,
            Op::I32DivU => Instruction::I32DivU,
            Op::I32And => Instruction::I32And,
            Op::I32Or => Instruction::I32Or,
            Op::I32Xor => Instruction::I32Xor,
            Op::I32Eq => Instruction::I32Eq,
            Op::I32GtS => Instruction::I32GtS,
            Op::I32GtU => Instruction::I32GtU,
            Op::I32Eqz => Instruction::I32Eqz,
            Op::CallIndirect => Instruction::CallIndirect {
                type_index: LAMBDA_CALL_TYPE,
                table_index: 0,
            },
            Op::Call(idx) => Instruction::Call(idx),
        };
        f.instruction(&instr);
    }
}

enum Terminator {
    Br(usize),
    CondBr(u32, usize, usize),
    Ret,
}

struct Block {
    hint: BlockHint,
    ops: Vec<Op>,
    terminator: Option<Terminator>,
}

/// A WASM-native [`FuncBuilder`]. `Value` is a local index: every value is
/// materialized into its own fresh `i32` local rather than left on WASM's
/// operand stack, which keeps every operation's lowering independent of
/// what came before it, at the cost of a local per intermediate value.
/// `Block` is an index into `blocks`, appended in the order the parser
/// discovers structure, which per [`BlockHint`]'s docs is always a single
/// chain of if-diamonds and while-triangles, never arbitrary nesting.
pub struct WasmFuncBuilder {
    pub(crate) id: u32,
    unsigned_mode: bool,
    blocks: Vec<Block>,
    current: usize,
    next_local: u32,
}

impl WasmFuncBuilder {
    pub(crate) fn new(id: u32, unsigned_mode: bool) -> Self {
        let entry = Block {
            hint: BlockHint::Entry,
            ops: Vec::new(),
            terminator: None,
        };
        Self {
            id,
            unsigned_mode,
            blocks: vec![entry],
            current: 0,
            next_local: 0,
        }
    }

    fn push(&mut self, op: Op) {
        self.blocks[self.current].ops.push(op);
    }

    /// Store whatever value the ops pushed so far leave on the stack into a
    /// fresh local, and return it.
    fn finish_value(&mut self) -> u32 {
        let local = self.next_local;
        self.next_local += 1;
        self.push(Op::LocalSet(local));
        local
    }

    fn materialize(&mut self, op: Op) -> u32 {
        self.push(op);
        self.finish_value()
    }

    /// `addr = base + idx*4`, leaving the computed address on the stack.
    /// Used for `vars[idx]`, where `idx` is an absolute index.
    fn push_cell_addr(&mut self, base: u32, idx: u32) {
        self.push(Op::LocalGet(idx));
        self.push(Op::ConstI32(4));
        self.push(Op::I32Mul);
        self.push(Op::ConstI32(base as i32));
        self.push(Op::I32Add);
    }

    /// `addr = STACK_OFFSET + (stack_index - depth)*4`, leaving the computed
    /// address on the stack. `depth` counts from the top of the stack (0 =
    /// top); this is why `@` (rotate) and `O` (pick) read relative to
    /// `stack_index` rather than from an absolute offset.
    fn push_stack_addr(&mut self, depth: u32) {
        self.push(Op::GlobalGet(STACK_INDEX_GLOBAL));
        self.push(Op::LocalGet(depth));
        self.push(Op::I32Sub);
        self.push(Op::ConstI32(4));
        self.push(Op::I32Mul);
        self.push(Op::ConstI32(layout::STACK_OFFSET as i32));
        self.push(Op::I32Add);
    }

    /// Turn the accumulated block graph into a finished WASM function body,
    /// translating each block's `BlockHint` into the matching structured
    /// control construct (`if…end`, `block…loop…end…end`).
    pub(crate) fn lower(self) -> Function {
        let locals = if self.next_local > 0 {
            vec![(self.next_local, ValType::I32)]
        } else {
            vec![]
        };
        let mut f = Function::new(locals);
        let n = self.blocks.len();
        let mut i = 0usize;
        loop {
            for op in &self.blocks[i].ops {
                op.emit(&mut f);
            }
            match self.blocks[i].terminator {
                None | Some(Terminator::Ret) => {
                    f.instruction(&Instruction::Return);
                    f.instruction(&Instruction::End);
                    break;
                }
                Some(Terminator::Br(target)) => {
                    if target < i {
                        // Back-edge: closing a while's body, branching to
                        // its head. `br 0` continues the innermost `loop`.
                        f.instruction(&Instruction::Br(0));
                        f.instruction(&Instruction::End); // loop
                        f.instruction(&Instruction::End); // block
                        i += 1; // while-join always sits right after the body
                        continue;
                    }
                    if self.blocks[target].hint == BlockHint::WhileHead {
                        // Entry into a while: open the wrapping block+loop
                        // and fall through to the head.
                        f.instruction(&Instruction::Block(BlockType::Empty));
                        f.instruction(&Instruction::Loop(BlockType::Empty));
                        i = target;
                        continue;
                    }
                    // Closing an if: target is its join block, directly
                    // adjacent, reached by ending the `if`.
                    f.instruction(&Instruction::End);
                    i = target;
                }
                Some(Terminator::CondBr(cond_local, then_blk, _else_blk)) => {
                    f.instruction(&Instruction::LocalGet(cond_local));
                    match self.blocks[then_blk].hint {
                        BlockHint::IfBody => {
                            f.instruction(&Instruction::If(BlockType::Empty));
                        }
                        BlockHint::WhileBody => {
                            f.instruction(&Instruction::I32Eqz);
                            f.instruction(&Instruction::BrIf(1));
                        }
                        other => unreachable!("cond-br target has hint {other:?}"),
                    }
                    i = then_blk;
                }
            }
            if i >= n {
                break;
            }
        }
        f
    }
}

impl FuncBuilder for WasmFuncBuilder {
    type Func = u32;
    type Value = u32;
    type Block = usize;

    fn entry_block(&self) -> usize {
        0
    }

    fn append_block(&mut self, hint: BlockHint) -> usize {
        self.blocks.push(Block {
            hint,
            ops: Vec::new(),
            terminator: None,
        });
        self.blocks.len() - 1
    }

    fn position_at_end(&mut self, block: usize) {
        self.current = block;
    }

    fn const_i32(&mut self, v: i32) -> u32 {
        self.materialize(Op::ConstI32(v))
    }

    fn stack_index(&mut self) -> u32 {
        self.materialize(Op::GlobalGet(STACK_INDEX_GLOBAL))
    }

    fn load_stack_slot(&mut self, depth: u32) -> u32 {
        self.push_stack_addr(depth);
        self.materialize(Op::I32Load(0))
    }

    fn store_stack_slot(&mut self, depth: u32, v: u32) {
        self.push_stack_addr(depth);
        self.push(Op::LocalGet(v));
        self.push(Op::I32Store(0));
    }

    fn grow_stack(&mut self, delta: i32) {
        if delta < 0 {
            // Clobber the freed slots before dropping them, while
            // stack_index still covers them.
            for depth in 0..(-delta) as i32 {
                let depth_local = self.materialize(Op::ConstI32(depth));
                self.push_stack_addr(depth_local);
                self.push(Op::ConstI32(0));
                self.push(Op::I32Store(0));
            }
        }
        self.push(Op::GlobalGet(STACK_INDEX_GLOBAL));
        self.push(Op::ConstI32(delta));
        self.push(Op::I32Add);
        self.push(Op::GlobalSet(STACK_INDEX_GLOBAL));
    }

    fn load_var(&mut self, idx: u32) -> u32 {
        self.push_cell_addr(layout::VARS_OFFSET, idx);
        self.materialize(Op::I32Load(0))
    }

    fn store_var(&mut self, idx: u32, v: u32) {
        self.push_cell_addr(layout::VARS_OFFSET, idx);
        self.push(Op::LocalGet(v));
        self.push(Op::I32Store(0));
    }

    fn bin_op(&mut self, op: BinOp, a: u32, b: u32) -> u32 {
        self.push(Op::LocalGet(a));
        self.push(Op::LocalGet(b));
        let wasm_op = match op {
            BinOp::Add => Op::I32Add,
            BinOp::Sub => Op::I32Sub,
            BinOp::Mul => Op::I32Mul,
            BinOp::Div if self.unsigned_mode => Op::I32DivU,
            BinOp::Div => Op::I32DivS,
            BinOp::BitAnd => Op::I32And,
            BinOp::BitOr => Op::I32Or,
        };
        self.materialize(wasm_op)
    }

    /// `>`/`=` always consume two values and produce False's all-ones (true)
    /// or all-zero (false) boolean, never WASM's native 0/1. `>`'s
    /// signedness follows `CompileOptions::unsigned_mode`, resolved once at
    /// construction.
    fn icmp(&mut self, op: CmpOp, a: u32, b: u32) -> u32 {
        self.push(Op::LocalGet(a));
        self.push(Op::LocalGet(b));
        let wasm_op = match op {
            CmpOp::Eq => Op::I32Eq,
            CmpOp::Gt if self.unsigned_mode => Op::I32GtU,
            CmpOp::Gt => Op::I32GtS,
        };
        let raw = self.materialize(wasm_op);
        self.push(Op::ConstI32(0));
        self.push(Op::LocalGet(raw));
        self.materialize(Op::I32Sub)
    }

    fn neg(&mut self, v: u32) -> u32 {
        self.push(Op::ConstI32(0));
        self.push(Op::LocalGet(v));
        self.materialize(Op::I32Sub)
    }

    fn not(&mut self, v: u32) -> u32 {
        self.push(Op::LocalGet(v));
        self.push(Op::ConstI32(-1));
        self.materialize(Op::I32Xor)
    }

    fn isnonzero(&mut self, v: u32) -> u32 {
        self.push(Op::LocalGet(v));
        self.push(Op::I32Eqz);
        self.push(Op::I32Eqz);
        self.finish_value()
    }

    fn call_lambda(&mut self, id: u32) {
        self.push(Op::LocalGet(id));
        self.push(Op::CallIndirect);
    }

    fn call_runtime_void(&mut self, f: RuntimeFn, args: &[u32]) {
        for a in args {
            self.push(Op::LocalGet(*a));
        }
        self.push(Op::Call(RT_FUNC_IDX[f as usize]));
    }

    fn call_runtime_value(&mut self, f: RuntimeFn, args: &[u32]) -> u32 {
        for a in args {
            self.push(Op::LocalGet(*a));
        }
        self.materialize(Op::Call(RT_FUNC_IDX[f as usize]))
    }

    fn string_ptr(&mut self, s: StringRef) -> u32 {
        self.materialize(Op::ConstI32(s.0 as i32))
    }

    fn build_br(&mut self, target: usize) {
        self.blocks[self.current].terminator = Some(Terminator::Br(target));
    }

    fn build_cond_br(&mut self, cond: u32, then_blk: usize, else_blk: usize) {
        self.blocks[self.current].terminator = Some(Terminator::CondBr(cond, then_blk, else_blk));
    }

    fn build_ret_void(&mut self) {
        self.blocks[self.current].terminator = Some(Terminator::Ret);
    }
}
