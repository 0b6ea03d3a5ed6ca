use crate::constant_pool::ConstantPool;
use crate::error::ClassFileError;
use crate::method::{parse_methods, MethodInfo};
use crate::reader::Reader;

const MAGIC: u32 = 0xCAFE_BABE;

/// A parsed `.class` file, reduced to what the interpreter and its
/// calling convention need: the constant pool (for `ldc` and
/// `invokestatic` resolution) and the method table.
pub struct ClassFile {
    constant_pool: ConstantPool,
    methods: Vec<MethodInfo>,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFileError> {
        let mut reader = Reader::new(bytes);

        let magic = reader.read_u32()?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic);
        }
        let _minor_version = reader.read_u16()?;
        let _major_version = reader.read_u16()?;

        let constant_pool_count = reader.read_u16()?;
        let constant_pool = ConstantPool::parse(&mut reader, constant_pool_count)?;

        let _access_flags = reader.read_u16()?;
        let _this_class = reader.read_u16()?;
        let _super_class = reader.read_u16()?;

        let interfaces_count = reader.read_u16()?;
        for _ in 0..interfaces_count {
            reader.read_u16()?;
        }

        let fields_count = reader.read_u16()?;
        for _ in 0..fields_count {
            skip_field(&mut reader)?;
        }

        let methods = parse_methods(&mut reader, &constant_pool)?;

        // Class-level attributes (SourceFile, etc.) carry nothing this
        // interpreter needs; parsing stops here rather than walking them.

        Ok(Self { constant_pool, methods })
    }

    pub fn constant_pool(&self) -> &ConstantPool {
        &self.constant_pool
    }

    /// Looks up a method by its exact name and descriptor, the pair
    /// `invokestatic` resolves a `Methodref` down to.
    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name && m.descriptor == descriptor)
    }

    /// Resolves a `Methodref`/`InterfaceMethodref` constant pool entry
    /// directly to the method it names, the operation `invokestatic`
    /// performs on its two-byte operand.
    pub fn find_method_from_index(&self, index: u16) -> Option<&MethodInfo> {
        let (name, descriptor) = self.constant_pool.method_name_and_descriptor(index).ok()?;
        self.find_method(name, descriptor)
    }

    /// Resolves the `Integer` constant at `index`, where `index` is the
    /// zero-based position `ldc` computes as `u8(1) - 1` — already
    /// decremented from the real (1-based) constant-pool index by the
    /// caller.
    pub fn constant_integer(&self, index: usize) -> Option<i32> {
        self.constant_pool.integer(index as u16 + 1).ok()
    }
}

fn skip_field(reader: &mut Reader) -> Result<(), ClassFileError> {
    let _access_flags = reader.read_u16()?;
    let _name_index = reader.read_u16()?;
    let _descriptor_index = reader.read_u16()?;
    let attributes_count = reader.read_u16()?;
    for _ in 0..attributes_count {
        let _name_index = reader.read_u16()?;
        let length = reader.read_u32()?;
        reader.read_bytes(length as usize)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use mjvm_fixtures::{ClassFileWriter, MethodSpec};
    use mjvm_isa::Opcode;

    #[test]
    fn test_parses_minimal_class_and_finds_main() {
        let code = vec![Opcode::iconst_0 as u8, Opcode::ireturn as u8];
        let bytes = ClassFileWriter::new("Main")
            .with_method(MethodSpec::new("main", "([Ljava/lang/String;)V", 1, 1, code))
            .build();

        let class_file = ClassFile::parse(&bytes).unwrap();
        let main = class_file.find_method("main", "([Ljava/lang/String;)V").unwrap();
        assert_eq!(main.code.max_stack, 1);
        assert_eq!(main.code.code.len(), 2);
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let bytes = [0x00, 0x00, 0x00, 0x00];
        assert!(matches!(ClassFile::parse(&bytes), Err(ClassFileError::BadMagic)));
    }

    #[test]
    fn test_resolves_method_ref_and_integer_constant() {
        let mut writer = ClassFileWriter::new("Main");
        let ldc_index = writer.push_integer_constant(7);
        let method_ref_index = writer.push_method_ref("Main", "helper", "(I)I");
        let code = vec![Opcode::ldc as u8, ldc_index];
        let bytes = writer
            .with_method(MethodSpec::new("main", "()V", 2, 1, code))
            .build();

        let class_file = ClassFile::parse(&bytes).unwrap();
        assert_eq!(class_file.constant_integer(ldc_index as usize - 1).unwrap(), 7);
        // No `helper` method was actually defined; resolving the ref itself
        // (name/descriptor lookup through the constant pool) still works.
        assert_eq!(
            class_file.constant_pool().method_name_and_descriptor(method_ref_index).unwrap(),
            ("helper", "(I)I")
        );
    }

    #[test]
    fn test_missing_code_attribute_is_an_error() {
        // Hand-build a class whose only method has no Code attribute.
        let mut bytes = Vec::new();
        bytes.extend(MAGIC.to_be_bytes());
        bytes.extend(0u16.to_be_bytes());
        bytes.extend(52u16.to_be_bytes());
        // Constant pool: #1 Utf8 "Main", #2 Class(1), #3 Utf8 "main", #4 Utf8 "()V"
        bytes.extend(5u16.to_be_bytes());
        bytes.push(1);
        bytes.extend(4u16.to_be_bytes());
        bytes.extend(b"Main");
        bytes.push(7);
        bytes.extend(1u16.to_be_bytes());
        bytes.push(1);
        bytes.extend(4u16.to_be_bytes());
        bytes.extend(b"main");
        bytes.push(1);
        bytes.extend(3u16.to_be_bytes());
        bytes.extend(b"()V");
        bytes.extend(0u16.to_be_bytes()); // access_flags
        bytes.extend(2u16.to_be_bytes()); // this_class
        bytes.extend(0u16.to_be_bytes()); // super_class
        bytes.extend(0u16.to_be_bytes()); // interfaces_count
        bytes.extend(0u16.to_be_bytes()); // fields_count
        bytes.extend(1u16.to_be_bytes()); // methods_count
        bytes.extend(0u16.to_be_bytes()); // access_flags
        bytes.extend(3u16.to_be_bytes()); // name_index
        bytes.extend(4u16.to_be_bytes()); // descriptor_index
        bytes.extend(0u16.to_be_bytes()); // attributes_count (no Code!)
        bytes.extend(0u16.to_be_bytes()); // class attributes_count

        assert!(matches!(ClassFile::parse(&bytes), Err(ClassFileError::MissingCodeAttribute)));
    }
}
