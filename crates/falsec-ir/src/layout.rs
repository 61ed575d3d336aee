//! Static linear-memory layout shared by the module and function builders.
//!
//! False's 26 global variables and its evaluation stack are plain arrays in
//! WASM linear memory rather than WASM locals/globals: `vars[26]` first,
//! then `stack[stack_size]`, then string constant data appended as it is
//! discovered while lowering lambda bodies.

/// Number of False global variables (`a`-`z`).
pub const VAR_COUNT: u32 = 26;

pub const VARS_OFFSET: u32 = 0;
pub const VARS_SIZE: u32 = VAR_COUNT * 4;

pub const STACK_OFFSET: u32 = VARS_OFFSET + VARS_SIZE;

/// First address available for string constant data, given a stack holding
/// `stack_size` i32 cells.
pub fn data_offset(stack_size: u32) -> u32 {
    STACK_OFFSET + stack_size * 4
}

/// Number of 64KiB WASM pages needed to hold `data_offset(stack_size) + data_len`
/// bytes, at least one.
pub fn pages_for(stack_size: u32, data_len: u32) -> u64 {
    const PAGE: u64 = 65536;
    let total = data_offset(stack_size) as u64 + data_len as u64;
    ((total + PAGE - 1) / PAGE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_contiguous() {
        assert_eq!(VARS_OFFSET, 0);
        assert_eq!(STACK_OFFSET, 104);
        assert_eq!(data_offset(1000), 104 + 4000);
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(pages_for(1000, 0), 1);
        assert_eq!(pages_for(1000, 70_000), 2);
    }
}
