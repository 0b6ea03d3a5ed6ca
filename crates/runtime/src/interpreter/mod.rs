//! The dispatch loop: fetches one opcode, mutates the current frame and
//! program counter, possibly recurses into a callee, and eventually
//! returns an optional 32-bit value to its caller.

mod arithmetic;
mod arrays;
mod bitwise;
mod calling;
mod control_flow;
mod fundamental;
mod host;
mod locals;

use std::io::Write;

use mjvm_classfile::{ClassFile, MethodInfo};
use mjvm_isa::Opcode;

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::frame::Frame;
use crate::heap::Heap;

/// Everything a per-opcode handler needs: the frame it mutates, the code
/// buffer it reads operands from, read-only access to the class (for
/// `ldc`/`invokestatic` resolution), the shared heap, and the sink for
/// `invokevirtual`'s program output.
pub struct ExecutionContext<'a> {
    pub frame: &'a mut Frame,
    pub code: &'a [u8],
    pub class: &'a ClassFile,
    pub heap: &'a mut Heap,
    pub out: &'a mut dyn Write,
}

/// The outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Advance the program counter by this many bytes from where the
    /// instruction started.
    Move(isize),
    /// Set the program counter to this absolute address (branch target).
    Jump(usize),
    /// This frame is done; unwind to the caller with the given value.
    Return(Option<i32>),
}

/// Runs `method` to completion with the given (already fully populated)
/// `locals`, returning the value it produced, if any.
///
/// The operand stack is allocated here and dropped on every return path,
/// including the early ones reached through `?`.
pub fn execute(
    method: &MethodInfo,
    locals: Vec<i32>,
    class: &ClassFile,
    heap: &mut Heap,
    out: &mut dyn Write,
) -> Result<Option<i32>, RuntimeError> {
    let code = &method.code.code;
    let mut frame = Frame::new(method.code.max_stack, locals);

    loop {
        let opcode_byte = *code
            .get(frame.pc)
            .ok_or_else(|| RuntimeError::from(RuntimeErrorKind::ProgramCounterOutOfBounds).locate(frame.pc, 0, code))?;
        let pc = frame.pc;
        let opcode = Opcode::from_u8(opcode_byte)
            .ok_or_else(|| RuntimeError::from(RuntimeErrorKind::UnknownOpcode(opcode_byte)).locate(pc, opcode_byte, code))?;

        let mut ctx = ExecutionContext { frame: &mut frame, code, class, heap, out };
        let step = dispatch(opcode, &mut ctx).map_err(|err| err.locate(pc, opcode_byte, code))?;

        match step {
            Step::Move(delta) => frame.pc = (frame.pc as isize + delta) as usize,
            Step::Jump(target) => frame.pc = target,
            Step::Return(value) => return Ok(value),
        }
    }
}

fn dispatch(opcode: Opcode, ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    use Opcode::*;

    match opcode {
        nop => fundamental::nop(ctx),
        iconst_m1 => fundamental::iconst(-1, ctx),
        iconst_0 => fundamental::iconst(0, ctx),
        iconst_1 => fundamental::iconst(1, ctx),
        iconst_2 => fundamental::iconst(2, ctx),
        iconst_3 => fundamental::iconst(3, ctx),
        iconst_4 => fundamental::iconst(4, ctx),
        iconst_5 => fundamental::iconst(5, ctx),
        bipush => fundamental::bipush(ctx),
        sipush => fundamental::sipush(ctx),
        ldc => fundamental::ldc(ctx),
        dup => fundamental::dup(ctx),

        iload | aload => locals::load(ctx),
        iload_0 | aload_0 => locals::load_n(0, ctx),
        iload_1 | aload_1 => locals::load_n(1, ctx),
        iload_2 | aload_2 => locals::load_n(2, ctx),
        iload_3 | aload_3 => locals::load_n(3, ctx),
        istore | astore => locals::store(ctx),
        istore_0 | astore_0 => locals::store_n(0, ctx),
        istore_1 | astore_1 => locals::store_n(1, ctx),
        istore_2 | astore_2 => locals::store_n(2, ctx),
        istore_3 | astore_3 => locals::store_n(3, ctx),
        iinc => locals::iinc(ctx),

        iadd => arithmetic::iadd(ctx),
        isub => arithmetic::isub(ctx),
        imul => arithmetic::imul(ctx),
        idiv => arithmetic::idiv(ctx),
        irem => arithmetic::irem(ctx),
        ineg => arithmetic::ineg(ctx),

        iand => bitwise::iand(ctx),
        ior => bitwise::ior(ctx),
        ixor => bitwise::ixor(ctx),
        ishl => bitwise::ishl(ctx),
        ishr => bitwise::ishr(ctx),
        iushr => bitwise::iushr(ctx),

        goto => control_flow::goto(ctx),
        ifeq => control_flow::if_single(|a, b| a == b, ctx),
        ifne => control_flow::if_single(|a, b| a != b, ctx),
        iflt => control_flow::if_single(|a, b| a < b, ctx),
        ifge => control_flow::if_single(|a, b| a >= b, ctx),
        ifgt => control_flow::if_single(|a, b| a > b, ctx),
        ifle => control_flow::if_single(|a, b| a <= b, ctx),
        if_icmpeq => control_flow::if_cmp(|a, b| a == b, ctx),
        if_icmpne => control_flow::if_cmp(|a, b| a != b, ctx),
        if_icmplt => control_flow::if_cmp(|a, b| a < b, ctx),
        if_icmpge => control_flow::if_cmp(|a, b| a >= b, ctx),
        if_icmpgt => control_flow::if_cmp(|a, b| a > b, ctx),
        if_icmple => control_flow::if_cmp(|a, b| a <= b, ctx),

        invokestatic => calling::invokestatic(ctx),
        ireturn | areturn => control_flow::ireturn(ctx),
        return_ => control_flow::return_void(ctx),

        getstatic => host::getstatic(ctx),
        invokevirtual => host::invokevirtual(ctx),

        newarray => arrays::newarray(ctx),
        arraylength => arrays::arraylength(ctx),
        iaload => arrays::iaload(ctx),
        iastore => arrays::iastore(ctx),
    }
}
