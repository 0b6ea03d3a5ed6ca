use std::io::Write;

use super::{ExecutionContext, Step};
use crate::error::RuntimeError;

/// `getstatic` is never given real field semantics in this subset (see
/// the Non-goals): the only static ever referenced is `System.out`, and
/// its value is never inspected, so this is a pure width-3 no-op.
pub fn getstatic(_ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    Ok(Step::Move(3))
}

/// `invokevirtual` likewise never resolves a real receiver or method; the
/// only virtual call this subset models is `println(int)`, so this pops
/// the top of stack and prints it. Kept behind this one named function so
/// it's the single place to replace with a real dispatch later.
pub fn invokevirtual(ctx: &mut ExecutionContext) -> Result<Step, RuntimeError> {
    print_top_of_stack(ctx)?;
    Ok(Step::Move(3))
}

fn print_top_of_stack(ctx: &mut ExecutionContext) -> Result<(), RuntimeError> {
    let value = ctx.frame.pop()?;
    writeln!(ctx.out, "{}", value).expect("writing program output failed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::frame::Frame;
    use crate::heap::Heap;
    use mjvm_classfile::ClassFile;
    use mjvm_fixtures::ClassFileWriter;

    #[test]
    fn test_invokevirtual_prints_decimal_and_newline() {
        let class_bytes = ClassFileWriter::new("Main").build();
        let class = ClassFile::parse(&class_bytes).unwrap();
        let mut heap = Heap::new();
        let mut out = Vec::new();
        let mut frame = Frame::new(1, vec![]);
        frame.push(42).unwrap();
        let code = vec![];
        {
            let mut ctx = ExecutionContext { frame: &mut frame, code: &code, class: &class, heap: &mut heap, out: &mut out };
            invokevirtual(&mut ctx).unwrap();
        }
        assert_eq!(out, b"42\n");
    }
}
