use mjvm_classfile::ClassFile;

use super::{ExecutionContext, Step};
use crate::decoder;
use crate::error::{RuntimeError, RuntimeErrorKind};

pub fn nop(_ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    Ok(Step::Move(1))
}

pub fn iconst(value: i32, ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    ctx.frame.push(value)?;
    Ok(Step::Move(1))
}

pub fn bipush(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let value = decoder::s8(ctx.code, ctx.frame.pc, 1)?;
    ctx.frame.push(value as i32)?;
    Ok(Step::Move(2))
}

pub fn sipush(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let value = decoder::s16(ctx.code, ctx.frame.pc, 1)?;
    ctx.frame.push(value as i32)?;
    Ok(Step::Move(3))
}

pub fn ldc(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let pool_index = decoder::u8(ctx.code, ctx.frame.pc, 1)?;
    let value = constant_integer(ctx.class, pool_index)?;
    ctx.frame.push(value)?;
    Ok(Step::Move(2))
}

fn constant_integer(class: &ClassFile, pool_index: u8) -> Result<i32, RuntimeError> {
    let zero_based = (pool_index as usize)
        .checked_sub(1)
        .ok_or(RuntimeErrorKind::UnresolvedConstant(pool_index))?;
    class
        .constant_integer(zero_based)
        .ok_or_else(|| RuntimeErrorKind::UnresolvedConstant(pool_index).into())
}

pub fn dup(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    ctx.frame.dup()?;
    Ok(Step::Move(1))
}
