//! Evaluation-stack and structured-control helpers shared by the character
//! dispatch table, each grounded directly on one reference-compiler helper
//! of the same shape (`push_stack`/`pop_stack`/`build_if`/`build_while`,
//! etc.), generalized from a single concrete backend to any [`FuncBuilder`].

use falsec_ir::{BinOp, BlockHint, CmpOp, FuncBuilder};

pub fn push_value<FB: FuncBuilder>(fb: &mut FB, v: FB::Value) {
    fb.grow_stack(1);
    let zero = fb.const_i32(0);
    fb.store_stack_slot(zero, v);
}

pub fn pop_value<FB: FuncBuilder>(fb: &mut FB) -> FB::Value {
    let zero = fb.const_i32(0);
    let v = fb.load_stack_slot(zero);
    fb.grow_stack(-1);
    v
}

/// Read the cell `depth` slots below the current top, without changing the
/// stack's depth.
pub fn peek_value<FB: FuncBuilder>(fb: &mut FB, depth: i32) -> FB::Value {
    let d = fb.const_i32(depth);
    fb.load_stack_slot(d)
}

/// Write the cell `depth` slots below the current top, without changing the
/// stack's depth.
pub fn poke_value<FB: FuncBuilder>(fb: &mut FB, depth: i32, v: FB::Value) {
    let d = fb.const_i32(depth);
    fb.store_stack_slot(d, v);
}

pub fn build_binop<FB: FuncBuilder>(fb: &mut FB, op: BinOp) {
    let b = pop_value(fb);
    let a = pop_value(fb);
    let res = fb.bin_op(op, a, b);
    push_value(fb, res);
}

pub fn build_icmp<FB: FuncBuilder>(fb: &mut FB, op: CmpOp) {
    let b = pop_value(fb);
    let a = pop_value(fb);
    let res = fb.icmp(op, a, b);
    push_value(fb, res);
}

pub fn build_neg<FB: FuncBuilder>(fb: &mut FB) {
    let v = peek_value(fb, 0);
    let r = fb.neg(v);
    poke_value(fb, 0, r);
}

pub fn build_not<FB: FuncBuilder>(fb: &mut FB) {
    let v = peek_value(fb, 0);
    let r = fb.not(v);
    poke_value(fb, 0, r);
}

pub fn build_swap<FB: FuncBuilder>(fb: &mut FB) {
    let b = pop_value(fb);
    let a = pop_value(fb);
    push_value(fb, b);
    push_value(fb, a);
}

/// `a, b, c -> b, c, a` (`@`, rotate the top three cells).
pub fn build_rotate<FB: FuncBuilder>(fb: &mut FB) {
    let a = peek_value(fb, 2);
    let b = peek_value(fb, 1);
    let c = peek_value(fb, 0);
    poke_value(fb, 2, b);
    poke_value(fb, 1, c);
    poke_value(fb, 0, a);
}

/// `n ø` / `nO`: push a copy of the cell `n` slots below the top. Falls out
/// of the ordinary pop/load/push sequence with no special-casing — "0ø"
/// reads the slot that becomes the new top right after `n` itself is
/// popped, which is exactly `$` (dup) when `n` is 0.
pub fn build_pick<FB: FuncBuilder>(fb: &mut FB) {
    let n = pop_value(fb);
    let v = fb.load_stack_slot(n);
    push_value(fb, v);
}

/// ```text
/// parent:  pop body_fn; pop cond; br cond ? body : out
/// body:    call body_fn; br out
/// out:     (join)
/// ```
pub fn build_if<FB: FuncBuilder>(fb: &mut FB) {
    let body_l = pop_value(fb);
    let cond_v = pop_value(fb);
    let cond = fb.isnonzero(cond_v);

    let body_bb = fb.append_block(BlockHint::IfBody);
    let out_bb = fb.append_block(BlockHint::IfJoin);
    fb.build_cond_br(cond, body_bb, out_bb);

    fb.position_at_end(body_bb);
    fb.call_lambda(body_l);
    fb.build_br(out_bb);

    fb.position_at_end(out_bb);
}

/// ```text
/// parent:  pop body_fn; pop cond_fn; br head
/// head:    call cond_fn; pop cond; br cond ? body : out
/// body:    call body_fn; br head
/// out:     (join)
/// ```
pub fn build_while<FB: FuncBuilder>(fb: &mut FB) {
    let head_bb = fb.append_block(BlockHint::WhileHead);
    let body_bb = fb.append_block(BlockHint::WhileBody);
    let out_bb = fb.append_block(BlockHint::WhileJoin);

    let body_l = pop_value(fb);
    let cond_l = pop_value(fb);
    fb.build_br(head_bb);

    fb.position_at_end(head_bb);
    fb.call_lambda(cond_l);
    let cond_v = pop_value(fb);
    let cond = fb.isnonzero(cond_v);
    fb.build_cond_br(cond, body_bb, out_bb);

    fb.position_at_end(body_bb);
    fb.call_lambda(body_l);
    fb.build_br(head_bb);

    fb.position_at_end(out_bb);
}
