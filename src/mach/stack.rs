use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Stack<T> {
    overflow_message: &'static str,
    stack: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &'static str) -> Stack<T> {
        Stack {
            overflow_message,
            stack: vec![],
        }
    }

    fn overflow_check(&self) -> Result<()> {
        if self.stack.len() > u16::MAX as usize {
            Err(error!(OutOfMemory; "{}", self.overflow_message))
        } else {
            Ok(())
        }
    }

    fn underflow_error(&self) -> Error {
        error!(InternalError; "UNDERFLOW")
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, val: T) -> Result<()> {
        self.stack.push(val);
        self.overflow_check()
    }

    pub fn pop(&mut self) -> Result<T> {
        match self.stack.pop() {
            Some(v) => Ok(v),
            None => Err(self.underflow_error()),
        }
    }

    /// Pops two values, returning them in (lhs, rhs) order.
    pub fn pop_2(&mut self) -> Result<(T, T)> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        Ok((lhs, rhs))
    }
}
