/// Compile-time configuration flags.
///
/// Threaded by value through the reader and parser; nothing here is
/// mutated once compilation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Map Latin-1 `0xF8` -> `O` and `0xDF` -> `B` before dispatch.
    pub decode_latin1: bool,
    /// Handle the UTF-8 lead byte `0xC3` (`0x9F` -> `B`, `0xB8` -> `O`).
    pub decode_utf8: bool,
    /// `/` and `>` use unsigned operations when true, signed when false
    /// (default).
    pub unsigned_mode: bool,
    /// Number of 32-bit slots in the generated evaluation stack.
    pub stack_size: u32,
    /// Bit-width of `main`'s `int`. Fixed at 32 for the WASM32 backend.
    pub int_width: u32,
}

pub const DEFAULT_STACK_SIZE: u32 = 1024;

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            decode_latin1: true,
            decode_utf8: true,
            unsigned_mode: false,
            stack_size: DEFAULT_STACK_SIZE,
            int_width: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_latin1_and_utf8_on_signed_1024_cells() {
        let opts = CompileOptions::default();
        assert!(opts.decode_latin1);
        assert!(opts.decode_utf8);
        assert!(!opts.unsigned_mode);
        assert_eq!(opts.stack_size, 1024);
        assert_eq!(opts.int_width, 32);
    }
}
