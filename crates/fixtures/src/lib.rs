//! Builds minimal, real-format `.class` byte buffers for tests.
//!
//! This mirrors the role the hand-written assembler crate plays for the
//! rest of this codebase's bytecode format: the interpreter's own tests
//! have no interest in shelling out to `javac`, so this crate assembles
//! the handful of class-file shapes the test suites need, byte for byte,
//! the same way a real `.class` file is laid out.

use mjvm_isa::Opcode;

const MAGIC: u32 = 0xCAFE_BABE;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_CLASS: u8 = 7;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHODREF: u8 = 10;

/// One method to be written into the class file's method table.
pub struct MethodSpec {
    pub name: String,
    pub descriptor: String,
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

impl MethodSpec {
    pub fn new(
        name: impl Into<String>,
        descriptor: impl Into<String>,
        max_stack: u16,
        max_locals: u16,
        code: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            max_stack,
            max_locals,
            code,
        }
    }
}

/// Accumulates constant-pool entries and hands back their 1-based index,
/// the same numbering the JVM specification and `mjvm-classfile` use.
#[derive(Default)]
struct ConstantPoolWriter {
    entries: Vec<Vec<u8>>,
}

impl ConstantPoolWriter {
    fn push(&mut self, bytes: Vec<u8>) -> u16 {
        self.entries.push(bytes);
        self.entries.len() as u16
    }

    fn utf8(&mut self, value: &str) -> u16 {
        let mut bytes = vec![TAG_UTF8];
        bytes.extend((value.len() as u16).to_be_bytes());
        bytes.extend(value.as_bytes());
        self.push(bytes)
    }

    fn integer(&mut self, value: i32) -> u16 {
        let mut bytes = vec![TAG_INTEGER];
        bytes.extend(value.to_be_bytes());
        self.push(bytes)
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        let mut bytes = vec![TAG_CLASS];
        bytes.extend(name_index.to_be_bytes());
        self.push(bytes)
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        let mut bytes = vec![TAG_NAME_AND_TYPE];
        bytes.extend(name_index.to_be_bytes());
        bytes.extend(descriptor_index.to_be_bytes());
        self.push(bytes)
    }

    /// Registers a `Methodref` pointing at `class_name.method_name:descriptor`
    /// and returns its constant-pool index, ready to be embedded as the
    /// operand of an `invokestatic` instruction.
    fn method_ref(&mut self, class_name: &str, method_name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class_name);
        let name_and_type_index = self.name_and_type(method_name, descriptor);
        let mut bytes = vec![TAG_METHODREF];
        bytes.extend(class_index.to_be_bytes());
        bytes.extend(name_and_type_index.to_be_bytes());
        self.push(bytes)
    }

    fn into_bytes(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend((self.entries.len() as u16 + 1).to_be_bytes());
        for entry in self.entries {
            out.extend(entry);
        }
        out
    }
}

/// Builds the raw bytes of a one-class `.class` file containing the given
/// methods, in order. The first method is conventionally `main`, but the
/// caller decides.
pub struct ClassFileWriter {
    class_name: String,
    pool: ConstantPoolWriter,
    methods: Vec<MethodSpec>,
}

impl ClassFileWriter {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            pool: ConstantPoolWriter::default(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Registers an `Integer` constant and returns the 1-based pool index
    /// to use as the operand of an `ldc` instruction.
    pub fn push_integer_constant(&mut self, value: i32) -> u8 {
        self.pool.integer(value) as u8
    }

    /// Registers a `Methodref` to a method of this same class and returns
    /// the constant-pool index to use as the two-byte operand of
    /// `invokestatic`.
    pub fn push_method_ref(&mut self, method_name: &str, descriptor: &str) -> u16 {
        let class_name = self.class_name.clone();
        self.pool.method_ref(&class_name, method_name, descriptor)
    }

    pub fn build(mut self) -> Vec<u8> {
        let this_class_index = self.pool.class(&self.class_name.clone());

        let mut methods_bytes = Vec::new();
        methods_bytes.extend((self.methods.len() as u16).to_be_bytes());
        for method in &self.methods {
            let name_index = self.pool.utf8(&method.name);
            let descriptor_index = self.pool.utf8(&method.descriptor);
            let code_attribute_name_index = self.pool.utf8("Code");

            let mut code_attribute_info = Vec::new();
            code_attribute_info.extend(method.max_stack.to_be_bytes());
            code_attribute_info.extend(method.max_locals.to_be_bytes());
            code_attribute_info.extend((method.code.len() as u32).to_be_bytes());
            code_attribute_info.extend(&method.code);
            code_attribute_info.extend(0u16.to_be_bytes()); // exception_table_length
            code_attribute_info.extend(0u16.to_be_bytes()); // nested attributes_count

            methods_bytes.extend(0u16.to_be_bytes()); // access_flags (ACC_STATIC etc. unused by the parser)
            methods_bytes.extend(name_index.to_be_bytes());
            methods_bytes.extend(descriptor_index.to_be_bytes());
            methods_bytes.extend(1u16.to_be_bytes()); // attributes_count
            methods_bytes.extend(code_attribute_name_index.to_be_bytes());
            methods_bytes.extend((code_attribute_info.len() as u32).to_be_bytes());
            methods_bytes.extend(code_attribute_info);
        }

        let mut out = Vec::new();
        out.extend(MAGIC.to_be_bytes());
        out.extend(0u16.to_be_bytes()); // minor_version
        out.extend(52u16.to_be_bytes()); // major_version (Java 8)
        out.extend(self.pool.into_bytes());
        out.extend(0u16.to_be_bytes()); // access_flags
        out.extend(this_class_index.to_be_bytes());
        out.extend(0u16.to_be_bytes()); // super_class (0: not modeled)
        out.extend(0u16.to_be_bytes()); // interfaces_count
        out.extend(0u16.to_be_bytes()); // fields_count
        out.extend(methods_bytes);
        out.extend(0u16.to_be_bytes()); // attributes_count

        out
    }
}

/// A tiny fluent assembler for method bodies, in the spirit of this
/// codebase's own bytecode writers: one `append_*` call per instruction,
/// each returning the address it was written at.
pub struct CodeWriter {
    buffer: Vec<u8>,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn addr(&self) -> usize {
        self.buffer.len()
    }

    pub fn append(&mut self, opcode: Opcode) -> &mut Self {
        self.buffer.push(opcode as u8);
        self
    }

    pub fn append_u8(&mut self, opcode: Opcode, operand: u8) -> &mut Self {
        self.buffer.push(opcode as u8);
        self.buffer.push(operand);
        self
    }

    pub fn append_i8(&mut self, opcode: Opcode, operand: i8) -> &mut Self {
        self.append_u8(opcode, operand as u8)
    }

    pub fn append_i16(&mut self, opcode: Opcode, operand: i16) -> &mut Self {
        self.buffer.push(opcode as u8);
        self.buffer.extend(operand.to_be_bytes());
        self
    }

    /// Writes a two-operand instruction such as `iinc index, delta`.
    pub fn append_u8_i8(&mut self, opcode: Opcode, index: u8, delta: i8) -> &mut Self {
        self.buffer.push(opcode as u8);
        self.buffer.push(index);
        self.buffer.push(delta as u8);
        self
    }

    pub fn append_u16(&mut self, opcode: Opcode, operand: u16) -> &mut Self {
        self.buffer.push(opcode as u8);
        self.buffer.extend(operand.to_be_bytes());
        self
    }

    /// Writes a branch instruction (`goto`, `ifeq`, `if_icmplt`, ...) with
    /// the offset left as a placeholder; use [`CodeWriter::patch_branch`]
    /// once the target address is known.
    pub fn append_branch_placeholder(&mut self, opcode: Opcode) -> usize {
        let addr = self.addr();
        self.buffer.push(opcode as u8);
        self.buffer.extend(0i16.to_be_bytes());
        addr
    }

    /// Back-patches a branch instruction written at `branch_addr` so it
    /// jumps to `target_addr`, matching the spec's `pc + s16(1)` rule
    /// (the offset is relative to the branch instruction's own address).
    pub fn patch_branch(&mut self, branch_addr: usize, target_addr: usize) {
        let offset = target_addr as isize - branch_addr as isize;
        let offset = offset as i16;
        self.buffer[branch_addr + 1..branch_addr + 3].copy_from_slice(&offset.to_be_bytes());
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_writer_emits_big_endian_operands() {
        let mut writer = CodeWriter::new();
        writer.append_i8(Opcode::bipush, -8);
        writer.append_i16(Opcode::sipush, -1000);
        let code = writer.finish();
        assert_eq!(code, vec![Opcode::bipush as u8, 0xf8, Opcode::sipush as u8, 0xfc, 0x18]);
    }

    #[test]
    fn test_patch_branch_computes_relative_offset() {
        let mut writer = CodeWriter::new();
        let branch = writer.append_branch_placeholder(Opcode::goto);
        writer.append(Opcode::nop);
        writer.append(Opcode::nop);
        let target = writer.addr();
        writer.patch_branch(branch, target);
        let code = writer.finish();
        assert_eq!(&code[1..3], &5i16.to_be_bytes());
    }
}
