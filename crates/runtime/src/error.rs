use std::fmt::{self, Display};

use mjvm_isa::Opcode;

/// The underlying reason a bytecode fault occurred: stack under/overflow,
/// division by zero, an unknown opcode, an out-of-range local index, a
/// bad heap reference or array index, or an unresolved constant/
/// `invokestatic` target.
///
/// These all indicate malformed or unverified bytecode. The interpreter
/// has no exception channel for the guest program, so every variant here
/// is fatal to the call in progress; the entry shim is the only place
/// that turns one into a process exit.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RuntimeErrorKind {
    StackUnderflow,
    StackOverflow,
    DivisionByZero,
    UnknownOpcode(u8),
    LocalIndexOutOfRange(u16),
    InvalidHeapReference(i32),
    ArrayIndexOutOfBounds(i32),
    UnresolvedInvokestaticTarget(u16),
    UnresolvedConstant(u8),
    /// The program counter ran past the end of the method's code buffer
    /// without encountering a `return`/`ireturn`/`areturn`.
    ProgramCounterOutOfBounds,
}

impl Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeErrorKind::StackUnderflow => write!(f, "operand stack underflow"),
            RuntimeErrorKind::StackOverflow => write!(f, "operand stack overflow"),
            RuntimeErrorKind::DivisionByZero => write!(f, "division by zero"),
            RuntimeErrorKind::UnknownOpcode(opcode) => write!(f, "unknown opcode 0x{:02x}", opcode),
            RuntimeErrorKind::LocalIndexOutOfRange(index) => {
                write!(f, "local variable index {} out of range", index)
            }
            RuntimeErrorKind::InvalidHeapReference(reference) => {
                write!(f, "invalid heap reference {}", reference)
            }
            RuntimeErrorKind::ArrayIndexOutOfBounds(index) => {
                write!(f, "array index {} out of bounds", index)
            }
            RuntimeErrorKind::UnresolvedInvokestaticTarget(index) => write!(
                f,
                "could not resolve invokestatic target at constant pool index {}",
                index
            ),
            RuntimeErrorKind::UnresolvedConstant(index) => {
                write!(f, "could not resolve ldc constant at index {}", index)
            }
            RuntimeErrorKind::ProgramCounterOutOfBounds => {
                write!(f, "program counter ran past the end of the method body")
            }
        }
    }
}

/// A few bytes either side of the faulting instruction's address — the
/// "short hex dump of the surrounding code" the diagnostic promises.
const HEX_WINDOW_RADIUS: usize = 6;

/// Where in the method body a [`RuntimeErrorKind`] occurred.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Location {
    pub pc: usize,
    pub opcode: u8,
    pub bytecode: Vec<u8>,
}

/// A [`RuntimeErrorKind`] located to the instruction that raised it.
///
/// Handler functions raise a bare `RuntimeErrorKind`, which converts into
/// this type with no location attached; `execute`'s dispatch loop is the
/// only place with both the current `pc` and the opcode byte in hand, so
/// it calls [`RuntimeError::locate`] once the error crosses back out of
/// `dispatch`. That call is a no-op if a location is already present,
/// which is what keeps a fault raised inside a recursive `invokestatic`
/// callee pointing at the callee's own instruction rather than the
/// caller's.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub location: Option<Location>,
}

impl RuntimeError {
    pub fn locate(mut self, pc: usize, opcode: u8, code: &[u8]) -> Self {
        if self.location.is_none() {
            let start = pc.saturating_sub(HEX_WINDOW_RADIUS);
            let end = (pc + HEX_WINDOW_RADIUS + 1).min(code.len());
            self.location = Some(Location { pc, opcode, bytecode: code[start..end].to_vec() });
        }
        self
    }
}

impl From<RuntimeErrorKind> for RuntimeError {
    fn from(kind: RuntimeErrorKind) -> Self {
        RuntimeError { kind, location: None }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.kind)?;
        if let Some(location) = &self.location {
            // ProgramCounterOutOfBounds means there was no byte at `pc` to
            // read in the first place, so there's no real opcode to name.
            if !matches!(self.kind, RuntimeErrorKind::ProgramCounterOutOfBounds) {
                let mnemonic = Opcode::from_u8(location.opcode).map(|op| op.get_name()).unwrap_or("??");
                write!(f, "\nOpcode: 0x{:02x} ({})", location.opcode, mnemonic)?;
            }
            let hex = location.bytecode.iter().map(|byte| format!("{:02x}", byte)).collect::<Vec<_>>().join(" ");
            write!(f, "\nInstruction address: 0x{:04x}\nBytecode:\n{}", location.pc, hex)?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}
