//! `falsec`: compiles a False source file into a standalone WASM module.

mod cli;

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use cli::Cli;
use falsec_ir::WasmModuleBuilder;
use log::error;

fn main() -> ExitCode {
    let args = Cli::init();
    simple_logger::init_with_level((&args.verbosity).into()).expect("logger already initialized");

    let (source, display_name) = match &args.input {
        Some(path) => match fs::read(path) {
            Ok(bytes) => (bytes, path.display().to_string()),
            Err(e) => {
                error!("can't open '{}': {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut bytes = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut bytes) {
                error!("can't read <stdin>: {e}");
                return ExitCode::FAILURE;
            }
            (bytes, "<stdin>".to_string())
        }
    };

    let options = args.compile_options();
    let module = match falsec_compiler::compile::<WasmModuleBuilder>(&source, display_name, options)
    {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let write_result = match &args.output {
        Some(path) => fs::write(path, &module),
        None => io::stdout().write_all(&module),
    };
    if let Err(e) = write_result {
        error!("can't write output: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
