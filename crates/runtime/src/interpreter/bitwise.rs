use super::{ExecutionContext, Step};
use crate::error::RuntimeError;

const SHIFT_MASK: u32 = 0x1F;

pub fn iand(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    ctx.frame.push(a & b)?;
    Ok(Step::Move(1))
}

pub fn ior(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    ctx.frame.push(a | b)?;
    Ok(Step::Move(1))
}

pub fn ixor(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    ctx.frame.push(a ^ b)?;
    Ok(Step::Move(1))
}

pub fn ishl(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    let shift = (b as u32) & SHIFT_MASK;
    ctx.frame.push(a << shift)?;
    Ok(Step::Move(1))
}

/// Arithmetic (sign-preserving) shift.
pub fn ishr(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    let shift = (b as u32) & SHIFT_MASK;
    ctx.frame.push(a >> shift)?;
    Ok(Step::Move(1))
}

/// Logical (zero-filling) shift, computed on the unsigned interpretation
/// of the operand and cast back to signed.
pub fn iushr(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    let shift = (b as u32) & SHIFT_MASK;
    ctx.frame.push(((a as u32) >> shift) as i32)?;
    Ok(Step::Move(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::frame::Frame;
    use crate::heap::Heap;
    use mjvm_classfile::ClassFile;
    use mjvm_fixtures::ClassFileWriter;

    fn run(values: &[i32], f: fn(&mut ExecutionContext) -> Result<Step, RuntimeError>) -> i32 {
        let class_bytes = ClassFileWriter::new("Main").build();
        let class = ClassFile::parse(&class_bytes).unwrap();
        let mut heap = Heap::new();
        let mut out = Vec::new();
        let mut frame = Frame::new(8, vec![]);
        for &v in values {
            frame.push(v).unwrap();
        }
        let code: Vec<u8> = Vec::new();
        {
            let mut ctx = ExecutionContext { frame: &mut frame, code: &code, class: &class, heap: &mut heap, out: &mut out };
            f(&mut ctx).unwrap();
        }
        frame.pop().unwrap()
    }

    #[test]
    fn test_ishr_is_sign_preserving() {
        assert_eq!(run(&[-1, 1], ishr), -1);
    }

    #[test]
    fn test_iushr_zero_fills() {
        assert_eq!(run(&[-8, 1], iushr), 0x7FFF_FFFC);
    }

    #[test]
    fn test_shift_count_is_masked_to_five_bits() {
        assert_eq!(run(&[1, 32], ishl), run(&[1, 0], ishl));
    }
}
