use crate::error::{RuntimeError, RuntimeErrorKind};

/// Per-invocation state: the operand stack, the local variable array, and
/// the program counter. Allocated fresh for each call and released on
/// every return path, including fatal ones.
pub struct Frame {
    operand_stack: Vec<i32>,
    max_stack: usize,
    locals: Vec<i32>,
    pub pc: usize,
}

impl Frame {
    /// `locals` must already be the full, zero-padded `max_locals` slots
    /// with the caller's arguments in the leading positions; the callee
    /// owns it from here.
    pub fn new(max_stack: u16, locals: Vec<i32>) -> Self {
        Self {
            operand_stack: Vec::with_capacity(max_stack as usize),
            max_stack: max_stack as usize,
            locals,
            pc: 0,
        }
    }

    pub fn push(&mut self, value: i32) -> Result<(), RuntimeError> {
        if self.operand_stack.len() >= self.max_stack {
            return Err(RuntimeErrorKind::StackOverflow.into());
        }
        self.operand_stack.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<i32, RuntimeError> {
        self.operand_stack.pop().ok_or_else(|| RuntimeErrorKind::StackUnderflow.into())
    }

    pub fn dup(&mut self) -> Result<(), RuntimeError> {
        let top = *self
            .operand_stack
            .last()
            .ok_or_else(|| RuntimeError::from(RuntimeErrorKind::StackUnderflow))?;
        self.push(top)
    }

    pub fn local(&self, index: u16) -> Result<i32, RuntimeError> {
        self.locals
            .get(index as usize)
            .copied()
            .ok_or_else(|| RuntimeErrorKind::LocalIndexOutOfRange(index).into())
    }

    pub fn set_local(&mut self, index: u16, value: i32) -> Result<(), RuntimeError> {
        let slot = self
            .locals
            .get_mut(index as usize)
            .ok_or_else(|| RuntimeErrorKind::LocalIndexOutOfRange(index))?;
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_pop_round_trips() {
        let mut frame = Frame::new(2, vec![0]);
        frame.push(10).unwrap();
        frame.push(20).unwrap();
        assert_eq!(frame.pop().unwrap(), 20);
        assert_eq!(frame.pop().unwrap(), 10);
    }

    #[test]
    fn test_pop_on_empty_stack_underflows() {
        let mut frame = Frame::new(1, vec![]);
        assert_eq!(frame.pop().unwrap_err().kind, RuntimeErrorKind::StackUnderflow);
    }

    #[test]
    fn test_push_beyond_max_stack_overflows() {
        let mut frame = Frame::new(1, vec![]);
        frame.push(1).unwrap();
        assert_eq!(frame.push(2).unwrap_err().kind, RuntimeErrorKind::StackOverflow);
    }

    #[test]
    fn test_local_index_out_of_range() {
        let frame = Frame::new(1, vec![0, 0]);
        assert_eq!(frame.local(5).unwrap_err().kind, RuntimeErrorKind::LocalIndexOutOfRange(5));
    }
}
