/// Binary arithmetic/bitwise operators a backend can lower. Division and the
/// unsigned-comparison half of [`CmpOp::Gt`] switch between signed and
/// unsigned lowering according to `CompileOptions::unsigned_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    BitAnd,
    BitOr,
}

/// Comparison operators. False only has `=` and `>`; `<` and the rest are
/// expressed by the parser in terms of these two plus `not`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gt,
}

/// A hint the parser attaches when it allocates a block, telling the
/// backend which of the two structured shapes (if-diamond, while-triangle)
/// the block plays a role in. A lambda's block graph is always one flat
/// chain of these shapes, never nested arbitrarily, since `?` and `#`
/// bodies are themselves separate lambdas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHint {
    /// The lambda's first block.
    Entry,
    /// Body of an `if` (`?`), entered only when the condition is non-zero.
    IfBody,
    /// Landing block after an `if`, reached whether or not the body ran.
    IfJoin,
    /// Loop condition block of a `while` (`#`), re-entered on every iteration.
    WhileHead,
    /// Loop body of a `while`, entered only when the head's condition holds.
    WhileBody,
    /// Landing block after a `while`, reached once the head's condition fails.
    WhileJoin,
}

/// The runtime ABI: five functions imported from module `env`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeFn {
    /// `lf_printnum(i32)`.
    PrintNum,
    /// `lf_printstring(ptr: i32)`, `ptr` into linear memory, NUL-terminated.
    PrintString,
    /// `lf_putchar(i32)`.
    PutChar,
    /// `lf_getchar() -> i32`, returns -1 (all bits set) at end of input.
    GetChar,
    /// `lf_flush()`.
    Flush,
}

impl RuntimeFn {
    pub const ALL: [RuntimeFn; 5] = [
        RuntimeFn::PrintNum,
        RuntimeFn::PrintString,
        RuntimeFn::PutChar,
        RuntimeFn::GetChar,
        RuntimeFn::Flush,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuntimeFn::PrintNum => "lf_printnum",
            RuntimeFn::PrintString => "lf_printstring",
            RuntimeFn::PutChar => "lf_putchar",
            RuntimeFn::GetChar => "lf_getchar",
            RuntimeFn::Flush => "lf_flush",
        }
    }

    /// Whether this import returns a value (only `lf_getchar` does).
    pub fn has_result(self) -> bool {
        matches!(self, RuntimeFn::GetChar)
    }

    /// Whether this import takes an `i32` argument.
    pub fn has_arg(self) -> bool {
        matches!(
            self,
            RuntimeFn::PrintNum | RuntimeFn::PrintString | RuntimeFn::PutChar
        )
    }
}

/// A previously-interned string constant's address in linear memory.
/// Opaque to callers; `falsec-compiler` just threads it from
/// `define_string_constant` to `string_ptr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRef(pub(crate) u32);
