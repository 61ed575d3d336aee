use wasm_encoder::{
    CodeSection, ConstExpr, DataSection, ElementSection, Elements, EntityType, ExportKind,
    ExportSection, FunctionSection, GlobalSection, GlobalType, ImportSection, Instruction,
    MemorySection, MemoryType, Module, RefType, TableSection, TableType, TypeSection, ValType,
};

use falsec_types::CompileOptions;

use crate::builder::ModuleBuilder;
use crate::error::IrError;
use crate::layout;
use crate::ops::{RuntimeFn, StringRef};
use crate::wasm::func::WasmFuncBuilder;

/// `() -> ()`: every lambda's signature, and the type `call_indirect` uses
/// against the lambda table.
pub(crate) const LAMBDA_CALL_TYPE: u32 = 0;
/// `(i32) -> ()`: `lf_printnum`, `lf_printstring`, `lf_putchar`.
const TYPE_I32_VOID: u32 = 1;
/// `() -> i32`: `lf_getchar`, and the module's exported entry point.
const TYPE_VOID_I32: u32 = 2;

const IMPORT_COUNT: u32 = 5;

/// Absolute WASM function index of each runtime import, in import-section
/// declaration order (which matches [`RuntimeFn::ALL`]).
pub(crate) const RT_FUNC_IDX: [u32; 5] = [0, 1, 2, 3, 4];

/// The one WASM global: the live depth of the evaluation stack.
pub(crate) const STACK_INDEX_GLOBAL: u32 = 0;

/// Assembles a False program into a standalone WASM module: a funcref table
/// doubling as the lambda table, linear memory holding the 26 global
/// variables and the evaluation stack at fixed offsets (see [`layout`]), and
/// five `env`-module imports realizing the runtime ABI.
pub struct WasmModuleBuilder {
    options: CompileOptions,
    lambda_bodies: Vec<Option<wasm_encoder::Function>>,
    data: Vec<u8>,
}

impl ModuleBuilder for WasmModuleBuilder {
    type Func = u32;
    type Builder = WasmFuncBuilder;

    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            lambda_bodies: Vec::new(),
            data: Vec::new(),
        }
    }

    fn declare_lambda(&mut self, id: u32) -> (u32, WasmFuncBuilder) {
        let func = IMPORT_COUNT + id;
        let idx = id as usize;
        if self.lambda_bodies.len() <= idx {
            self.lambda_bodies.resize_with(idx + 1, || None);
        }
        (func, WasmFuncBuilder::new(func, self.options.unsigned_mode))
    }

    fn finish_lambda(&mut self, builder: WasmFuncBuilder) {
        let func = builder.id;
        let idx = (func - IMPORT_COUNT) as usize;
        self.lambda_bodies[idx] = Some(builder.lower());
    }

    fn define_string_constant(&mut self, bytes: &[u8]) -> StringRef {
        let offset = layout::data_offset(self.options.stack_size) + self.data.len() as u32;
        self.data.extend_from_slice(bytes);
        self.data.push(0); // NUL terminator, per lf_printstring's contract
        StringRef(offset)
    }

    fn assemble(self, lambdas: &[u32]) -> Result<Vec<u8>, IrError> {
        if lambdas.is_empty() {
            return Err(IrError::Internal(
                "lambda tree must contain at least the top-level program".into(),
            ));
        }
        let lambda_count = self.lambda_bodies.len() as u32;
        let entry_func = IMPORT_COUNT + lambda_count;

        let mut module = Module::new();

        module.section(&emit_types());
        module.section(&emit_imports());

        let mut func_section = FunctionSection::new();
        for _ in 0..lambda_count {
            func_section.function(LAMBDA_CALL_TYPE);
        }
        func_section.function(TYPE_VOID_I32); // entry point
        module.section(&func_section);

        module.section(&emit_table(lambda_count));
        module.section(&emit_memory(self.options.stack_size, self.data.len() as u32));
        module.section(&emit_globals());
        module.section(&emit_exports(entry_func));
        module.section(&emit_elements(lambda_count));

        let mut code_section = CodeSection::new();
        for body in &self.lambda_bodies {
            let body = body.as_ref().ok_or_else(|| {
                IrError::Internal("lambda declared but never finished".into())
            })?;
            code_section.function(body);
        }
        code_section.function(&emit_entry_point(lambdas[0]));
        module.section(&code_section);

        module.section(&emit_data(self.options.stack_size, &self.data));

        let bytes = module.finish();
        wasmparser::validate(&bytes).map_err(|e| IrError::ValidationFailed(e.to_string()))?;
        Ok(bytes)
    }
}

fn emit_types() -> TypeSection {
    let mut types = TypeSection::new();
    types.ty().function(vec![], vec![]); // LAMBDA_CALL_TYPE
    types.ty().function(vec![ValType::I32], vec![]); // TYPE_I32_VOID
    types.ty().function(vec![], vec![ValType::I32]); // TYPE_VOID_I32
    types
}

fn emit_imports() -> ImportSection {
    let mut imports = ImportSection::new();
    for f in RuntimeFn::ALL {
        let ty = if f.has_result() {
            TYPE_VOID_I32
        } else if f.has_arg() {
            TYPE_I32_VOID
        } else {
            LAMBDA_CALL_TYPE
        };
        imports.import("env", f.name(), EntityType::Function(ty));
    }
    imports
}

fn emit_table(lambda_count: u32) -> TableSection {
    let mut table = TableSection::new();
    let size = lambda_count.max(1) as u64;
    table.table(TableType {
        element_type: RefType::FUNCREF,
        minimum: size,
        maximum: Some(size),
        table64: false,
        shared: false,
    });
    table
}

fn emit_memory(stack_size: u32, data_len: u32) -> MemorySection {
    let mut memory = MemorySection::new();
    let pages = layout::pages_for(stack_size, data_len);
    memory.memory(MemoryType {
        minimum: pages,
        maximum: None,
        memory64: false,
        shared: false,
        page_size_log2: None,
    });
    memory
}

fn emit_globals() -> GlobalSection {
    let mut globals = GlobalSection::new();
    globals.global(
        GlobalType {
            val_type: ValType::I32,
            mutable: true,
            shared: false,
        },
        &ConstExpr::i32_const(0),
    );
    globals
}

fn emit_exports(entry_func: u32) -> ExportSection {
    let mut exports = ExportSection::new();
    exports.export("main", ExportKind::Func, entry_func);
    exports.export("memory", ExportKind::Memory, 0);
    exports
}

fn emit_elements(lambda_count: u32) -> ElementSection {
    let mut elements = ElementSection::new();
    let indices: Vec<u32> = (0..lambda_count).map(|i| IMPORT_COUNT + i).collect();
    elements.active(
        Some(0),
        &ConstExpr::i32_const(0),
        Elements::Functions(std::borrow::Cow::Owned(indices)),
    );
    elements
}

fn emit_data(stack_size: u32, data: &[u8]) -> DataSection {
    let mut section = DataSection::new();
    if !data.is_empty() {
        section.active(
            0,
            &ConstExpr::i32_const(layout::data_offset(stack_size) as i32),
            data.to_vec(),
        );
    }
    section
}

/// `main() -> i32`: reset the stack depth, call the top-level program as an
/// ordinary lambda through the table, and report success to the host.
fn emit_entry_point(top_level: u32) -> wasm_encoder::Function {
    let mut f = wasm_encoder::Function::new(vec![]);
    f.instruction(&Instruction::I32Const(0));
    f.instruction(&Instruction::GlobalSet(STACK_INDEX_GLOBAL));
    f.instruction(&Instruction::I32Const((top_level - IMPORT_COUNT) as i32));
    f.instruction(&Instruction::CallIndirect {
        type_index: LAMBDA_CALL_TYPE,
        table_index: 0,
    });
    f.instruction(&Instruction::I32Const(0));
    f.instruction(&Instruction::Return);
    f.instruction(&Instruction::End);
    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FuncBuilder;

    #[test]
    fn empty_program_assembles_to_valid_module() {
        let mut module = WasmModuleBuilder::new(CompileOptions::default());
        let (lambda0, mut fb) = module.declare_lambda(0);
        fb.build_ret_void();
        module.finish_lambda(fb);

        let bytes = module.assemble(&[lambda0]).expect("assemble");
        wasmparser::validate(&bytes).expect("valid module");
    }

    #[test]
    fn string_constant_offset_lands_after_the_stack_region() {
        let opts = CompileOptions {
            stack_size: 16,
            ..CompileOptions::default()
        };
        let mut module = WasmModuleBuilder::new(opts);
        let s = module.define_string_constant(b"hi");
        assert_eq!(s.0, layout::data_offset(16));
    }

    #[test]
    fn multi_lambda_program_validates() {
        let mut module = WasmModuleBuilder::new(CompileOptions::default());
        let (l0, mut fb0) = module.declare_lambda(0);
        let id = fb0.const_i32(1);
        fb0.call_lambda(id);
        fb0.build_ret_void();
        module.finish_lambda(fb0);

        let (l1, mut fb1) = module.declare_lambda(1);
        fb1.build_ret_void();
        module.finish_lambda(fb1);

        let bytes = module.assemble(&[l0, l1]).expect("assemble");
        wasmparser::validate(&bytes).expect("valid module");
    }
}
