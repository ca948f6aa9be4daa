use super::effects::Effects;
use super::opcode::Opcode;
use super::operation;
use super::program::Program;
use super::stack::Stack;
use super::val::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Virtual machine
///
/// Decodes and executes a bytecode stream against the value stack and
/// the slot table. Side effects go through the injected `Effects`
/// collaborator; the machine itself never touches an output device.
///
/// Execution ends when the instruction pointer reaches the end of the
/// stream. A failure carries the source range of the statement whose
/// code was executing, taken from the program's side table.
pub struct Runtime<E: Effects> {
    effects: E,
    stack: Stack<Val>,
    slots: Vec<Val>,
}

impl<E: Effects> Runtime<E> {
    pub fn new(effects: E) -> Runtime<E> {
        Runtime {
            effects,
            stack: Stack::new("STACK OVERFLOW"),
            slots: vec![],
        }
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn into_effects(self) -> E {
        self.effects
    }

    /// Stack depth; zero after any successful run of a well-compiled
    /// program.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// The current value of a slot, for embedders that inspect state
    /// after a run.
    pub fn slot(&self, index: usize) -> Option<&Val> {
        self.slots.get(index)
    }

    pub fn run(&mut self, program: &Program) -> Result<()> {
        let code = program.code();
        let mut pc = 0;
        while pc < code.len() {
            let at = pc;
            if let Err(error) = self.step(code, &mut pc) {
                return Err(match program.range_at(at) {
                    Some(range) => error.in_range(&range),
                    None => error,
                });
            }
        }
        Ok(())
    }

    fn step(&mut self, code: &[u8], pc: &mut usize) -> Result<()> {
        use Opcode::*;
        match Opcode::decode(code, pc)? {
            PushImmInteger(n) => self.stack.push(Val::Integer(n))?,
            PushImmLong(n) => self.stack.push(Val::Long(n))?,
            PushImmSingle(n) => self.stack.push(Val::Single(n))?,
            PushImmDouble(n) => self.stack.push(Val::Double(n))?,
            PushImmString(s) => self.stack.push(Val::String(s))?,
            PushVariable(slot) => {
                let val = match self.slots.get(slot as usize) {
                    Some(val) => val.clone(),
                    None => return Err(error!(InternalError; "UNASSIGNED SLOT {}", slot)),
                };
                self.stack.push(val)?;
            }
            Let(slot) => self.r#let(slot)?,
            Add(ty) => {
                let (lhs, rhs) = self.stack.pop_2()?;
                self.stack.push(operation::add(ty, lhs, rhs)?)?;
            }
            Subtract(ty) => {
                let (lhs, rhs) = self.stack.pop_2()?;
                self.stack.push(operation::subtract(ty, lhs, rhs)?)?;
            }
            Multiply(ty) => {
                let (lhs, rhs) = self.stack.pop_2()?;
                self.stack.push(operation::multiply(ty, lhs, rhs)?)?;
            }
            FDivide(ty) => {
                let (lhs, rhs) = self.stack.pop_2()?;
                self.stack.push(operation::fdivide(ty, lhs, rhs)?)?;
            }
            IDivide(ty) => {
                let (lhs, rhs) = self.stack.pop_2()?;
                self.stack.push(operation::idivide(ty, lhs, rhs)?)?;
            }
            Negate(ty) => {
                let val = self.stack.pop()?;
                self.stack.push(operation::negate(ty, val)?)?;
            }
            Print => {
                let val = self.stack.pop()?;
                self.effects.print(&val)?;
            }
            PrintComma => self.effects.print_comma()?,
            PrintLinefeed => self.effects.print_linefeed()?,
            PragmaPrinted(s) => self.effects.pragma_printed(&s)?,
            conversion => {
                let (from, to) = match conversion.conversion() {
                    Some(pair) => pair,
                    None => return Err(error!(InternalError; "UNHANDLED OPCODE")),
                };
                let val = self.stack.pop()?;
                self.stack.push(operation::convert(from, to, val)?)?;
            }
        }
        Ok(())
    }

    /// Stores the popped value, extending the slot table by at most one.
    /// The replaced value is dropped, which frees a replaced string. The
    /// variant check never fires when the compiler is correct.
    fn r#let(&mut self, slot: u8) -> Result<()> {
        let val = self.stack.pop()?;
        let index = slot as usize;
        if index == self.slots.len() {
            self.slots.push(val);
        } else if let Some(cell) = self.slots.get_mut(index) {
            if cell.val_type() != val.val_type() {
                return Err(error!(TypeMismatch; "wrong value type for slot {}", slot));
            }
            *cell = val;
        } else {
            return Err(error!(InternalError; "SLOT OUT OF ORDER {}", slot));
        }
        Ok(())
    }
}
