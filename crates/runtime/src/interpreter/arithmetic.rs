use super::{ExecutionContext, Step};
use crate::error::{RuntimeError, RuntimeErrorKind};

pub fn iadd(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    ctx.frame.push(a.wrapping_add(b))?;
    Ok(Step::Move(1))
}

pub fn isub(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    ctx.frame.push(a.wrapping_sub(b))?;
    Ok(Step::Move(1))
}

pub fn imul(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    ctx.frame.push(a.wrapping_mul(b))?;
    Ok(Step::Move(1))
}

pub fn idiv(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    if b == 0 {
        return Err(RuntimeErrorKind::DivisionByZero.into());
    }
    // C-style truncation toward zero; `wrapping_div` only changes behavior
    // at the single i32::MIN / -1 overflow case, which still wraps rather
    // than panicking.
    ctx.frame.push(a.wrapping_div(b))?;
    Ok(Step::Move(1))
}

pub fn irem(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    if b == 0 {
        return Err(RuntimeErrorKind::DivisionByZero.into());
    }
    ctx.frame.push(a.wrapping_rem(b))?;
    Ok(Step::Move(1))
}

pub fn ineg(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let a = ctx.frame.pop()?;
    ctx.frame.push(a.wrapping_neg())?;
    Ok(Step::Move(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::frame::Frame;
    use crate::heap::Heap;
    use mjvm_fixtures::ClassFileWriter;
    use mjvm_classfile::ClassFile;

    fn with_context<F: FnOnce(&mut ExecutionContext) -> Result<Step, RuntimeError>>(
        values: &[i32],
        f: F,
    ) -> (Result<Step, RuntimeError>, Frame) {
        let class_bytes = ClassFileWriter::new("Main").build();
        let class = ClassFile::parse(&class_bytes).unwrap();
        let mut heap = Heap::new();
        let mut out = Vec::new();
        let mut frame = Frame::new(8, vec![0; 4]);
        for &v in values {
            frame.push(v).unwrap();
        }
        let code: Vec<u8> = Vec::new();
        let result = {
            let mut ctx = ExecutionContext { frame: &mut frame, code: &code, class: &class, heap: &mut heap, out: &mut out };
            f(&mut ctx)
        };
        (result, frame)
    }

    #[test]
    fn test_iadd_wraps_on_overflow() {
        let (step, mut frame) = with_context(&[i32::MAX, 1], iadd);
        assert!(matches!(step, Ok(Step::Move(1))));
        assert_eq!(frame.pop().unwrap(), i32::MIN);
    }

    #[test]
    fn test_idiv_truncates_toward_zero() {
        let (_, mut frame) = with_context(&[-7, 2], idiv);
        assert_eq!(frame.pop().unwrap(), -3);
    }

    #[test]
    fn test_irem_takes_sign_of_dividend() {
        let (_, mut frame) = with_context(&[-7, 2], irem);
        assert_eq!(frame.pop().unwrap(), -1);
    }

    #[test]
    fn test_idiv_by_zero_is_an_error() {
        let (step, _) = with_context(&[1, 0], idiv);
        assert_eq!(step, Err(RuntimeErrorKind::DivisionByZero.into()));
    }
}
