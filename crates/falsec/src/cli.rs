//! Command-line surface for `falsec`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use falsec_types::CompileOptions;

/// Compile a False source file to a standalone WASM module.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The False source file to compile. Reads from stdin when omitted.
    #[arg(index = 1)]
    pub input: Option<PathBuf>,

    /// Where to write the compiled module. Writes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Don't treat Latin-1 0xF8/0xDF as O/ß shorthands.
    #[arg(long)]
    pub no_decode_latin1: bool,

    /// Don't decode the UTF-8 lead byte 0xC3 (ø/ß as two-byte sequences).
    #[arg(long)]
    pub no_decode_utf8: bool,

    /// Use unsigned division and comparison for `/` and `>`.
    #[arg(long)]
    pub unsigned_mode: bool,

    /// Number of 32-bit cells in the generated evaluation stack.
    #[arg(long, default_value_t = falsec_types::options::DEFAULT_STACK_SIZE)]
    pub stack_size: u32,

    /// Log level.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            decode_latin1: !self.no_decode_latin1,
            decode_utf8: !self.no_decode_utf8,
            unsigned_mode: self.unsigned_mode,
            stack_size: self.stack_size,
            ..CompileOptions::default()
        }
    }
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    #[default]
    #[value(alias("0"))]
    Error,
    #[value(alias("1"))]
    Warn,
    #[value(alias("2"))]
    Info,
    #[value(alias("3"))]
    Debug,
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
