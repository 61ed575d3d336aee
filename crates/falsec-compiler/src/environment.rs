use falsec_ir::ModuleBuilder;
use falsec_types::{CompileOptions, FalseResult};

use crate::parser::Compiler;

/// Compile one False source file into a finished module image, backed by
/// whichever [`ModuleBuilder`] `B` is chosen. Owns nothing beyond driving
/// the parser and handing the finished lambda tree to the backend.
pub fn compile<B: ModuleBuilder>(
    source: &[u8],
    file: impl Into<String>,
    options: CompileOptions,
) -> FalseResult<Vec<u8>> {
    Compiler::<B>::new(source, file, options).compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use falsec_ir::WasmModuleBuilder;

    fn compile_wasm(src: &str) -> Vec<u8> {
        compile::<WasmModuleBuilder>(src.as_bytes(), "<test>", CompileOptions::default())
            .expect("compile")
    }

    #[test]
    fn hello_world_assembles_to_a_valid_module() {
        let bytes = compile_wasm("\"Hello, World!\"");
        wasmparser::validate(&bytes).expect("valid module");
    }

    #[test]
    fn arithmetic_and_printnum_compiles() {
        let bytes = compile_wasm("1 2 + 3 * .");
        wasmparser::validate(&bytes).expect("valid module");
    }

    #[test]
    fn variable_round_trip_compiles() {
        let bytes = compile_wasm("5 a: a; .");
        wasmparser::validate(&bytes).expect("valid module");
    }

    #[test]
    fn lambda_with_if_compiles() {
        let bytes = compile_wasm("1 [ \"yes\" ] ? ");
        wasmparser::validate(&bytes).expect("valid module");
    }

    #[test]
    fn while_loop_compiles() {
        let bytes = compile_wasm("0 a: [ a; 10 > ~ ] [ a; 1 + a: ] # ");
        wasmparser::validate(&bytes).expect("valid module");
    }

    #[test]
    fn stray_close_bracket_is_an_error() {
        let err = compile::<WasmModuleBuilder>(b"]", "<test>", CompileOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("']' unexpected"));
    }

    #[test]
    fn unterminated_lambda_is_an_error() {
        let err = compile::<WasmModuleBuilder>(b"[ 1 2 +", "<test>", CompileOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Unexpected end of file"));
    }

    #[test]
    fn invalid_character_is_reported_with_position() {
        let err = compile::<WasmModuleBuilder>(b"1 2 Q", "<test>", CompileOptions::default())
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid character 'Q'"));
    }
}
