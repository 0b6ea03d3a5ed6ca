use super::{execute, ExecutionContext, Step};
use crate::decoder;
use crate::error::{RuntimeError, RuntimeErrorKind};
use mjvm_classfile::count_parameters;

/// `invokestatic`: resolves the constant-pool method reference at the
/// two-byte operand, builds the callee's locals from the popped
/// arguments (left-to-right calling order, first popped into the lowest
/// slot below the argument count), recurses into [`execute`], and pushes
/// the result back if the callee returned one.
pub fn invokestatic(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    let pool_index = decoder::u16(ctx.code, ctx.frame.pc, 1)?;
    let method = ctx
        .class
        .find_method_from_index(pool_index)
        .ok_or_else(|| RuntimeErrorKind::UnresolvedInvokestaticTarget(pool_index))?;

    let parameter_count = count_parameters(&method.descriptor);
    let mut locals = vec![0i32; method.code.max_locals as usize];
    for slot in (0..parameter_count).rev() {
        locals[slot] = ctx.frame.pop()?;
    }

    let result = execute(method, locals, ctx.class, ctx.heap, ctx.out)?;
    if let Some(value) = result {
        ctx.frame.push(value)?;
    }

    Ok(Step::Move(3))
}
