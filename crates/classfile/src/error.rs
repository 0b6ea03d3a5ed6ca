use std::fmt::Display;

/// Failures while parsing a `.class` file.
///
/// Following the pattern used throughout this codebase for interpreter
/// faults: a plain enum implementing `Display` and `std::error::Error`,
/// no external error-handling crate.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ClassFileError {
    BadMagic,
    UnexpectedEof,
    InvalidConstantPoolTag(u8),
    InvalidConstantPoolIndex(u16),
    InvalidUtf8,
    MissingCodeAttribute,
}

impl Display for ClassFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassFileError::BadMagic => write!(f, "Class file error: bad magic number"),
            ClassFileError::UnexpectedEof => {
                write!(f, "Class file error: unexpected end of file")
            }
            ClassFileError::InvalidConstantPoolTag(tag) => {
                write!(f, "Class file error: invalid constant pool tag {}", tag)
            }
            ClassFileError::InvalidConstantPoolIndex(index) => write!(
                f,
                "Class file error: invalid constant pool index {}",
                index
            ),
            ClassFileError::InvalidUtf8 => {
                write!(f, "Class file error: constant pool entry is not valid UTF-8")
            }
            ClassFileError::MissingCodeAttribute => {
                write!(f, "Class file error: method is missing its Code attribute")
            }
        }
    }
}

impl std::error::Error for ClassFileError {}
