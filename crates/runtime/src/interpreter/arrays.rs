use super::{ExecutionContext, Step};
use crate::error::{RuntimeError, RuntimeErrorKind};

/// Pops a length and allocates a zeroed `int[]` of that size. The
/// element-type byte at offset 1 is ignored: only `int[]` is supported.
pub fn newarray(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let length = ctx.frame.pop()?;
    let array = vec![0i32; length.max(0) as usize];
    let reference = ctx.heap.allocate(array);
    ctx.frame.push(reference)?;
    Ok(Step::Move(2))
}

pub fn arraylength(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let reference = ctx.frame.pop()?;
    let array = ctx.heap.get(reference)?;
    ctx.frame.push(array.len() as i32)?;
    Ok(Step::Move(1))
}

pub fn iaload(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let index = ctx.frame.pop()?;
    let reference = ctx.frame.pop()?;
    let array = ctx.heap.get(reference)?;
    let value = *array
        .get(index as usize)
        .ok_or_else(|| RuntimeErrorKind::ArrayIndexOutOfBounds(index))?;
    ctx.frame.push(value)?;
    Ok(Step::Move(1))
}

pub fn iastore(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let value = ctx.frame.pop()?;
    let index = ctx.frame.pop()?;
    let reference = ctx.frame.pop()?;
    let array = ctx.heap.get_mut(reference)?;
    let slot = array
        .get_mut(index as usize)
        .ok_or_else(|| RuntimeErrorKind::ArrayIndexOutOfBounds(index))?;
    *slot = value;
    Ok(Step::Move(1))
}
