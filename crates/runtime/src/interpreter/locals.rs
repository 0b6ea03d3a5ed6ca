use super::{ExecutionContext, Step};
use crate::decoder;
use crate::error::RuntimeError;

pub fn load(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let index = decoder::u8(ctx.code, ctx.frame.pc, 1)? as u16;
    ctx.frame.push(ctx.frame.local(index)?)?;
    Ok(Step::Move(2))
}

pub fn load_n(index: u16, ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    ctx.frame.push(ctx.frame.local(index)?)?;
    Ok(Step::Move(1))
}

pub fn store(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let index = decoder::u8(ctx.code, ctx.frame.pc, 1)? as u16;
    let value = ctx.frame.pop()?;
    ctx.frame.set_local(index, value)?;
    Ok(Step::Move(2))
}

pub fn store_n(index: u16, ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let value = ctx.frame.pop()?;
    ctx.frame.set_local(index, value)?;
    Ok(Step::Move(1))
}

pub fn iinc(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let index = decoder::u8(ctx.code, ctx.frame.pc, 1)? as u16;
    let delta = decoder::s8(ctx.code, ctx.frame.pc, 2)?;
    let current = ctx.frame.local(index)?;
    ctx.frame.set_local(index, current.wrapping_add(delta as i32))?;
    Ok(Step::Move(3))
}
