//! A reader for the real JVM `.class` file format, reduced to what the
//! core interpreter needs to run: the constant pool, and each method's
//! name, descriptor and `Code` attribute.
//!
//! Parsing a class file — locating `main`, resolving a `Methodref` to a
//! method body — is a necessary collaborator for running anything at
//! all, but is not part of the interpreter's own semantics; that lives
//! in `mjvm-runtime`.

mod class_file;
mod constant_pool;
mod descriptor;
mod error;
mod method;
mod reader;

pub use class_file::ClassFile;
pub use constant_pool::{ConstantPool, ConstantPoolEntry};
pub use descriptor::count_parameters;
pub use error::ClassFileError;
pub use method::{CodeAttribute, MethodInfo};
