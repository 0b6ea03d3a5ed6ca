use super::{ExecutionContext, Step};
use crate::decoder;
use crate::error::RuntimeError;

fn branch_target(ctx: &ExecutionContext) -> Result<usize, RuntimeError> {
    let offset = decoder::s16(ctx.code, ctx.frame.pc, 1)?;
    Ok((ctx.frame.pc as isize + offset as isize) as usize)
}

pub fn goto(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    Ok(Step::Jump(branch_target(ctx)?))
}

/// `ifeq`/`ifne`/`iflt`/`ifge`/`ifgt`/`ifle`: pop one value and branch on
/// `predicate(value, 0)`.
pub fn if_single(predicate: fn(i32, i32) -> bool, ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let a = ctx.frame.pop()?;
    branch_on(predicate(a, 0), ctx)
}

/// `if_icmpeq`/.../`if_icmple`: pop two values and branch on
/// `predicate(a, b)`.
pub fn if_cmp(predicate: fn(i32, i32) -> bool, ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let b = ctx.frame.pop()?;
    let a = ctx.frame.pop()?;
    branch_on(predicate(a, b), ctx)
}

fn branch_on(taken: bool, ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    if taken {
        Ok(Step::Jump(branch_target(ctx)?))
    } else {
        Ok(Step::Move(3))
    }
}

pub fn ireturn(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    Ok(Step::Return(Some(ctx.frame.pop()?)))
}

pub fn return_void(_ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    Ok(Step::Return(None))
}
