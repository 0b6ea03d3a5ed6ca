//! The core interpreter: the bytecode dispatch loop together with its
//! operand stack, local-variable frame management, inter-frame calling
//! convention, and array heap.
//!
//! Class file parsing and the process entry shim are deliberately not
//! part of this crate; it only ever touches a class through the narrow,
//! read-only [`mjvm_classfile::ClassFile`] interface.

mod decoder;
mod error;
mod frame;
mod heap;
mod interpreter;

pub use error::{Location, RuntimeError, RuntimeErrorKind};
pub use heap::Heap;
pub use interpreter::execute;
