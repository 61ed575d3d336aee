use falsec_ir::{FuncBuilder, ModuleBuilder, RuntimeFn};
use falsec_reader::{GrowBuffer, SourceReader};
use falsec_types::{CompileOptions, Diagnostic, FalseError, FalseResult};

use crate::lambda::LambdaTree;
use crate::stackops::{
    build_binop, build_icmp, build_if, build_neg, build_not, build_pick, build_rotate,
    build_swap, build_while, peek_value, pop_value, push_value,
};
use crate::BinOp;
use crate::CmpOp;

/// Drives a single recursive-descent pass over one False source file,
/// turning `[`-delimited lambdas directly into backend IR as they're
/// scanned, rather than building an intermediate AST.
pub struct Compiler<'src, B: ModuleBuilder> {
    reader: SourceReader<'src>,
    module: B,
    options: CompileOptions,
    file: String,
    lambdas: LambdaTree<B::Func>,
}

impl<'src, B: ModuleBuilder> Compiler<'src, B> {
    pub fn new(source: &'src [u8], file: impl Into<String>, options: CompileOptions) -> Self {
        Self {
            reader: SourceReader::new(source),
            module: B::new(options),
            options,
            file: file.into(),
            lambdas: LambdaTree::new(),
        }
    }

    /// Parse the whole file and assemble the resulting lambda tree into a
    /// finished module image.
    pub fn compile(mut self) -> FalseResult<Vec<u8>> {
        let id = self.lambdas.next_id();
        let (func, mut fb) = self.module.declare_lambda(id);
        self.lambdas.insert(id, func);
        self.parse_lambda(id, &mut fb)?;
        self.module.finish_lambda(fb);

        let funcs: Vec<B::Func> = self.lambdas.funcs().to_vec();
        self.module
            .assemble(&funcs)
            .map_err(|e| FalseError::Internal(e.to_string()))
    }

    fn fatal(&self, message: impl Into<String>) -> FalseError {
        FalseError::lex(Diagnostic::error(self.file.as_str(), self.reader.pos(), message))
    }

    fn invalid_char(&self, ch: u8) -> FalseError {
        let message = if (0x20..=0x7e).contains(&ch) {
            format!("Invalid character '{}'.", ch as char)
        } else {
            format!("Invalid character '\\x{ch:02x}'.")
        };
        self.fatal(message)
    }

    fn warn(&self, message: impl Into<String>) {
        let diag = Diagnostic::warning(self.file.as_str(), self.reader.pos(), message);
        log::warn!("{diag}");
    }

    /// Parse one lambda body. `id == 0` is the top-level program: end of
    /// file closes it, and a stray `]` is an error. For any other lambda the
    /// reverse holds.
    fn parse_lambda(&mut self, id: u32, fb: &mut B::Builder) -> FalseResult<()> {
        'outer: loop {
            let mut ch = match self.reader.next() {
                Some(c) => c,
                None => {
                    if id != 0 {
                        return Err(self.fatal(
                            "Unexpected end of file. Use ']' to terminate lambdas.",
                        ));
                    }
                    break 'outer;
                }
            };

            'reparse: loop {
                if ch == b']' {
                    if id == 0 {
                        return Err(self.fatal("']' unexpected."));
                    }
                    break 'outer;
                }

                if ch.is_ascii_lowercase() {
                    let idx = fb.const_i32((ch - b'a') as i32);
                    push_value(fb, idx);
                    break 'reparse;
                }

                if ch.is_ascii_digit() {
                    // Overflow wraps silently, matching the reference
                    // compiler's u32 accumulation (it doesn't detect it
                    // either).
                    let mut num: u32 = (ch - b'0') as u32;
                    loop {
                        match self.reader.next() {
                            Some(c) if c.is_ascii_digit() => {
                                num = num.wrapping_mul(10).wrapping_add((c - b'0') as u32);
                            }
                            Some(c) => {
                                let v = fb.const_i32(num as i32);
                                push_value(fb, v);
                                ch = c;
                                continue 'reparse;
                            }
                            None => {
                                let v = fb.const_i32(num as i32);
                                push_value(fb, v);
                                if id != 0 {
                                    return Err(self.fatal(
                                        "Unexpected end of file. Use ']' to terminate lambdas.",
                                    ));
                                }
                                break 'outer;
                            }
                        }
                    }
                }

                match ch {
                    b' ' | b'\n' | b'\t' => {}
                    0xc3 if self.options.decode_utf8 => {
                        let next = self
                            .reader
                            .next()
                            .ok_or_else(|| self.fatal("Unexpected end of file."))?;
                        ch = match next {
                            0x9f => b'B',
                            0xb8 => b'O',
                            _ => return Err(self.fatal(format!(
                                "Invalid UTF-8 sequence c3 {next:02x}"
                            ))),
                        };
                        self.reader.retreat_column();
                        continue 'reparse;
                    }
                    b'{' => loop {
                        match self.reader.next() {
                            Some(b'}') => break,
                            Some(_) => {}
                            None => {
                                return Err(self.fatal(
                                    "Unexpected end of file. Use '}' to terminate comments",
                                ))
                            }
                        }
                    },
                    b'[' => {
                        let child_id = self.lambdas.next_id();
                        let (child_func, mut child_fb) = self.module.declare_lambda(child_id);
                        self.lambdas.insert(child_id, child_func);
                        self.parse_lambda(child_id, &mut child_fb)?;
                        self.module.finish_lambda(child_fb);

                        let v = fb.const_i32(child_id as i32);
                        push_value(fb, v);
                    }
                    b'\'' => {
                        let c = self.reader.next().ok_or_else(|| {
                            self.fatal("Unexpected end of file after apostrophe (')")
                        })?;
                        let v = fb.const_i32(c as i32);
                        push_value(fb, v);
                    }
                    b'`' => self.warn("Inline assembly isn't supported, ignoring."),
                    b':' => {
                        let ref_v = pop_value(fb);
                        let val = pop_value(fb);
                        fb.store_var(ref_v, val);
                    }
                    b';' => {
                        let ref_v = pop_value(fb);
                        let val = fb.load_var(ref_v);
                        push_value(fb, val);
                    }
                    b'!' => {
                        let idx = pop_value(fb);
                        fb.call_lambda(idx);
                    }
                    b'+' => build_binop(fb, BinOp::Add),
                    b'-' => build_binop(fb, BinOp::Sub),
                    b'*' => build_binop(fb, BinOp::Mul),
                    b'/' => build_binop(fb, BinOp::Div),
                    b'&' => build_binop(fb, BinOp::BitAnd),
                    b'|' => build_binop(fb, BinOp::BitOr),
                    b'=' => build_icmp(fb, CmpOp::Eq),
                    b'>' => build_icmp(fb, CmpOp::Gt),
                    b'_' => build_neg(fb),
                    b'~' => build_not(fb),
                    b'$' => {
                        let v = peek_value(fb, 0);
                        push_value(fb, v);
                    }
                    b'%' => fb.grow_stack(-1),
                    b'\\' => build_swap(fb),
                    b'@' => build_rotate(fb),
                    0xf8 if self.options.decode_latin1 => {
                        ch = b'O';
                        continue 'reparse;
                    }
                    b'O' => build_pick(fb),
                    b'?' => build_if(fb),
                    b'#' => build_while(fb),
                    b'.' => {
                        let v = pop_value(fb);
                        fb.call_runtime_void(RuntimeFn::PrintNum, &[v]);
                    }
                    b'"' => self.build_string(fb)?,
                    b',' => {
                        let v = pop_value(fb);
                        fb.call_runtime_void(RuntimeFn::PutChar, &[v]);
                    }
                    b'^' => {
                        let v = fb.call_runtime_value(RuntimeFn::GetChar, &[]);
                        push_value(fb, v);
                    }
                    0xdf if self.options.decode_latin1 => {
                        ch = b'B';
                        continue 'reparse;
                    }
                    b'B' => fb.call_runtime_void(RuntimeFn::Flush, &[]),
                    other => return Err(self.invalid_char(other)),
                }
                break 'reparse;
            }
        }

        fb.build_ret_void();
        Ok(())
    }

    fn build_string(&mut self, fb: &mut B::Builder) -> FalseResult<()> {
        let mut buf = GrowBuffer::new();
        loop {
            match self.reader.next() {
                Some(b'"') => break,
                Some(b) => buf.append(b),
                None => return Err(self.fatal("Unexpected end of file inside string.")),
            }
        }
        let sref = self.module.define_string_constant(&buf.finalize());
        let ptr = fb.string_ptr(sref);
        fb.call_runtime_void(RuntimeFn::PrintString, &[ptr]);
        Ok(())
    }
}
