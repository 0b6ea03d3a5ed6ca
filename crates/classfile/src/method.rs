use crate::constant_pool::ConstantPool;
use crate::error::ClassFileError;
use crate::reader::Reader;

/// The `Code` attribute of a method: its bytecode plus the frame sizes
/// the verifier computed for it.
#[derive(Debug, Clone)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

/// One entry of a class file's method table.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: String,
    pub descriptor: String,
    pub code: CodeAttribute,
}

pub fn parse_methods(
    reader: &mut Reader,
    constant_pool: &ConstantPool,
) -> Result<Vec<MethodInfo>, ClassFileError> {
    let count = reader.read_u16()?;
    let mut methods = Vec::with_capacity(count as usize);
    for _ in 0..count {
        methods.push(parse_method(reader, constant_pool)?);
    }
    Ok(methods)
}

fn parse_method(
    reader: &mut Reader,
    constant_pool: &ConstantPool,
) -> Result<MethodInfo, ClassFileError> {
    let _access_flags = reader.read_u16()?;
    let name_index = reader.read_u16()?;
    let descriptor_index = reader.read_u16()?;

    let name = constant_pool.utf8(name_index)?.to_string();
    let descriptor = constant_pool.utf8(descriptor_index)?.to_string();

    let attributes_count = reader.read_u16()?;
    let mut code = None;
    for _ in 0..attributes_count {
        let attribute_name_index = reader.read_u16()?;
        let attribute_length = reader.read_u32()?;
        let attribute_name = constant_pool.utf8(attribute_name_index)?;

        if attribute_name == "Code" {
            code = Some(parse_code_attribute(reader)?);
        } else {
            // Not interesting to this interpreter (LineNumberTable,
            // StackMapTable, etc.) — skip over it verbatim.
            reader.read_bytes(attribute_length as usize)?;
        }
    }

    let code = code.ok_or(ClassFileError::MissingCodeAttribute)?;
    Ok(MethodInfo { name, descriptor, code })
}

fn parse_code_attribute(reader: &mut Reader) -> Result<CodeAttribute, ClassFileError> {
    let max_stack = reader.read_u16()?;
    let max_locals = reader.read_u16()?;
    let code = reader.read_u32_length_bytes()?.to_vec();

    let exception_table_length = reader.read_u16()?;
    for _ in 0..exception_table_length {
        // start_pc, end_pc, handler_pc, catch_type: four u2 fields, unused
        // by this subset (no exception handling).
        reader.read_u16()?;
        reader.read_u16()?;
        reader.read_u16()?;
        reader.read_u16()?;
    }

    let nested_attributes_count = reader.read_u16()?;
    for _ in 0..nested_attributes_count {
        let _name_index = reader.read_u16()?;
        let length = reader.read_u32()?;
        reader.read_bytes(length as usize)?;
    }

    Ok(CodeAttribute { max_stack, max_locals, code })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::constant_pool::ConstantPool;
    use mjvm_fixtures::{ClassFileWriter, MethodSpec};
    use mjvm_isa::Opcode;

    #[test]
    fn test_parses_method_with_code_attribute() {
        let code = vec![Opcode::iconst_0 as u8, Opcode::ireturn as u8];

        let class_bytes = ClassFileWriter::new("Main")
            .with_method(MethodSpec::new("main", "()I", 1, 1, code))
            .build();

        // Skip the header/constant-pool/this_class/super/interfaces/fields
        // fields by reading through the real parser pipeline instead of
        // hand-walking offsets.
        let mut reader = Reader::new(&class_bytes);
        reader.read_u32().unwrap(); // magic
        reader.read_u16().unwrap(); // minor
        reader.read_u16().unwrap(); // major
        let constant_pool_count = reader.read_u16().unwrap();
        let constant_pool = ConstantPool::parse(&mut reader, constant_pool_count).unwrap();
        reader.read_u16().unwrap(); // access_flags
        reader.read_u16().unwrap(); // this_class
        reader.read_u16().unwrap(); // super_class
        reader.read_u16().unwrap(); // interfaces_count
        reader.read_u16().unwrap(); // fields_count

        let methods = parse_methods(&mut reader, &constant_pool).unwrap();

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "main");
        assert_eq!(methods[0].descriptor, "()I");
        assert_eq!(methods[0].code.max_stack, 1);
        assert_eq!(methods[0].code.max_locals, 1);
        assert_eq!(methods[0].code.code, vec![Opcode::iconst_0 as u8, Opcode::ireturn as u8]);
    }
}
