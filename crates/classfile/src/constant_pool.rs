use crate::error::ClassFileError;
use crate::reader::Reader;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_INVOKE_DYNAMIC: u8 = 18;

/// One constant pool entry.
///
/// Only `Utf8` and `Integer` are ever read by the interpreter itself
/// (method names/descriptors and `ldc` operands); the remaining variants
/// are parsed for structural completeness — so that a real `.class` file
/// round-trips through this parser at all — but never resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolEntry {
    Utf8(String),
    Integer(i32),
    Float(u32),
    Long(i64),
    Double(u64),
    Class { name_index: u16 },
    String { string_index: u16 },
    Fieldref { class_index: u16, name_and_type_index: u16 },
    Methodref { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodref { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    /// The unusable slot immediately following a `Long`/`Double` entry,
    /// per the JVM specification's "the constant pool index n+1 must be
    /// valid but is not usable" quirk.
    Unusable,
}

/// The constant pool of a class file: a 1-based indexed table, with index
/// 0 unused (matching the JVM specification's own numbering).
#[derive(Debug, Clone)]
pub struct ConstantPool {
    entries: Vec<Option<ConstantPoolEntry>>,
}

impl ConstantPool {
    pub fn parse(reader: &mut Reader, constant_pool_count: u16) -> Result<Self, ClassFileError> {
        let mut entries: Vec<Option<ConstantPoolEntry>> = vec![None];

        let mut index = 1u16;
        while index < constant_pool_count {
            let entry = parse_entry(reader)?;
            let occupies_two_slots = matches!(entry, ConstantPoolEntry::Long(_) | ConstantPoolEntry::Double(_));
            entries.push(Some(entry));
            index += 1;
            if occupies_two_slots {
                entries.push(Some(ConstantPoolEntry::Unusable));
                index += 1;
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, index: u16) -> Result<&ConstantPoolEntry, ClassFileError> {
        self.entries
            .get(index as usize)
            .and_then(|slot| slot.as_ref())
            .ok_or(ClassFileError::InvalidConstantPoolIndex(index))
    }

    pub fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            ConstantPoolEntry::Utf8(value) => Ok(value),
            _ => Err(ClassFileError::InvalidConstantPoolIndex(index)),
        }
    }

    pub fn integer(&self, index: u16) -> Result<i32, ClassFileError> {
        match self.get(index)? {
            ConstantPoolEntry::Integer(value) => Ok(*value),
            _ => Err(ClassFileError::InvalidConstantPoolIndex(index)),
        }
    }

    /// Resolves a `Methodref`/`InterfaceMethodref` entry down to the
    /// `(name, descriptor)` pair `invokestatic` needs to look up its
    /// target, following the `class_index`/`name_and_type_index` chain.
    pub fn method_name_and_descriptor(&self, index: u16) -> Result<(&str, &str), ClassFileError> {
        let name_and_type_index = match self.get(index)? {
            ConstantPoolEntry::Methodref { name_and_type_index, .. }
            | ConstantPoolEntry::InterfaceMethodref { name_and_type_index, .. } => *name_and_type_index,
            _ => return Err(ClassFileError::InvalidConstantPoolIndex(index)),
        };
        match self.get(name_and_type_index)? {
            ConstantPoolEntry::NameAndType { name_index, descriptor_index } => {
                Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?))
            }
            _ => Err(ClassFileError::InvalidConstantPoolIndex(name_and_type_index)),
        }
    }
}

fn parse_entry(reader: &mut Reader) -> Result<ConstantPoolEntry, ClassFileError> {
    let tag = reader.read_u8()?;
    let entry = match tag {
        TAG_UTF8 => {
            let bytes = reader.read_u16_length_bytes()?;
            let text = std::str::from_utf8(bytes).map_err(|_| ClassFileError::InvalidUtf8)?;
            ConstantPoolEntry::Utf8(text.to_string())
        }
        TAG_INTEGER => ConstantPoolEntry::Integer(reader.read_i32()?),
        TAG_FLOAT => ConstantPoolEntry::Float(reader.read_u32()?),
        TAG_LONG => {
            let high = reader.read_u32()? as u64;
            let low = reader.read_u32()? as u64;
            ConstantPoolEntry::Long(((high << 32) | low) as i64)
        }
        TAG_DOUBLE => {
            let high = reader.read_u32()? as u64;
            let low = reader.read_u32()? as u64;
            ConstantPoolEntry::Double((high << 32) | low)
        }
        TAG_CLASS => ConstantPoolEntry::Class { name_index: reader.read_u16()? },
        TAG_STRING => ConstantPoolEntry::String { string_index: reader.read_u16()? },
        TAG_FIELDREF => ConstantPoolEntry::Fieldref {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        TAG_METHODREF => ConstantPoolEntry::Methodref {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        TAG_INTERFACE_METHODREF => ConstantPoolEntry::InterfaceMethodref {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        TAG_NAME_AND_TYPE => ConstantPoolEntry::NameAndType {
            name_index: reader.read_u16()?,
            descriptor_index: reader.read_u16()?,
        },
        TAG_METHOD_HANDLE => ConstantPoolEntry::MethodHandle {
            reference_kind: reader.read_u8()?,
            reference_index: reader.read_u16()?,
        },
        TAG_METHOD_TYPE => ConstantPoolEntry::MethodType { descriptor_index: reader.read_u16()? },
        TAG_INVOKE_DYNAMIC => ConstantPoolEntry::InvokeDynamic {
            bootstrap_method_attr_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        other => return Err(ClassFileError::InvalidConstantPoolTag(other)),
    };
    Ok(entry)
}
