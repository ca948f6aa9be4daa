use super::opcode::Opcode;
use super::program::Program;
use super::val::ValType;
use crate::error;
use crate::lang::ast::{Expression, Statement};
use crate::lang::{Error, Ident, Range};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

pub fn compile(ast: &[Statement]) -> Result<Program> {
    Compiler::compile(ast)
}

struct Slot {
    index: u8,
    ty: ValType,
}

/// ## Compiler
///
/// Walks the statement list and emits bytecode. Expression fragments are
/// generated bottom-up together with their inferred type; coercion
/// opcodes raise each operand to the join type before the monomorphized
/// operator, so the machine never sees mixed operand types.
///
/// Slots are assigned one per distinct sigil-qualified name, in
/// first-assignment order; the slot's type is fixed by the sigil at
/// allocation. A variable read before any assignment compiles to a push
/// of its sigil-implied zero value.
struct Compiler {
    program: Program,
    slots: HashMap<String, Slot>,
}

impl Compiler {
    fn compile(ast: &[Statement]) -> Result<Program> {
        let mut this = Compiler {
            program: Program::new(),
            slots: HashMap::new(),
        };
        for statement in ast {
            if !this.statement(statement)? {
                break;
            }
        }
        Ok(this.program)
    }

    /// Returns false when code emission is finished (`END`); everything
    /// after it is unreachable in a straight-line program.
    fn statement(&mut self, statement: &Statement) -> Result<bool> {
        use Statement::*;
        self.program.begin_statement(statement.range());
        match statement {
            Remark(..) | JumpLabel(..) => Ok(true),
            End(..) => Ok(false),
            Let(_, _, (_, ident), expr) => {
                self.r#let(ident, expr)?;
                Ok(true)
            }
            Call(_, (name_range, name), args) => {
                self.call(name_range, name, args)?;
                Ok(true)
            }
            Pragma(range, (name_range, name), args) => {
                self.pragma(range, name_range, name, args)?;
                Ok(true)
            }
            If(..) | If1(..) | If2(..) | Else(..) | ElseIf(..) | EndIf(..) | For(..)
            | ForStep(..) | Next(..) | Goto(..) | Gosub(..) | Return(..) | Stop(..)
            | While(..) | Wend(..) | Do(..) | Loop(..) => {
                Err(error!(NotImplemented; "control flow is not compiled")
                    .in_range(&statement.range()))
            }
        }
    }

    fn r#let(&mut self, ident: &Ident, expr: &Expression) -> Result<()> {
        let (ty, mut ops) = self.expression(expr)?;
        let (index, slot_ty) = self.slot(ident)?;
        self.coerce(&mut ops, ty, slot_ty, &expr.range())?;
        self.fragment(ops);
        self.program.emit(&Opcode::Let(index));
        Ok(())
    }

    fn call(&mut self, name_range: &Range, name: &Ident, args: &[Expression]) -> Result<()> {
        if !name.name().eq_ignore_ascii_case("PRINT") {
            return Err(error!(SyntaxError; "unknown statement").in_range(name_range));
        }
        for arg in args {
            match arg {
                Expression::Char(_, ',') => self.program.emit(&Opcode::PrintComma),
                Expression::Char(_, '\n') => self.program.emit(&Opcode::PrintLinefeed),
                Expression::Char(range, _) => {
                    return Err(error!(InternalError; "BAD SEPARATOR").in_range(range));
                }
                expr => {
                    let (_, ops) = self.expression(expr)?;
                    self.fragment(ops);
                    self.program.emit(&Opcode::Print);
                }
            }
        }
        Ok(())
    }

    fn pragma(
        &mut self,
        range: &Range,
        name_range: &Range,
        name: &Ident,
        args: &[Expression],
    ) -> Result<()> {
        if !name.name().eq_ignore_ascii_case("PRINTED") {
            return Err(error!(SyntaxError; "unknown pragma").in_range(name_range));
        }
        match args {
            [Expression::String(_, s)] => {
                self.check_string_len(s, range)?;
                self.program.emit(&Opcode::PragmaPrinted(s.clone()));
                Ok(())
            }
            _ => Err(error!(SyntaxError; "PRAGMA PRINTED takes one string literal")
                .in_range(range)),
        }
    }

    fn slot(&mut self, ident: &Ident) -> Result<(u8, ValType)> {
        // classic BASIC: names are case-insensitive, so slots key on the
        // folded spelling
        let key = ident.name().to_ascii_uppercase();
        if let Some(slot) = self.slots.get(&key) {
            return Ok((slot.index, slot.ty));
        }
        let index = self.slots.len();
        if index > u8::MAX as usize {
            return Err(error!(OutOfMemory; "too many variables"));
        }
        let ty = ValType::of_ident(ident);
        self.slots.insert(
            key,
            Slot {
                index: index as u8,
                ty,
            },
        );
        Ok((index as u8, ty))
    }

    fn fragment(&mut self, ops: Vec<Opcode>) {
        for op in &ops {
            self.program.emit(op);
        }
    }

    /// Appends the conversion raising (or narrowing) a fragment's result
    /// from one type to another; refuses string/numeric crossings.
    fn coerce(
        &self,
        ops: &mut Vec<Opcode>,
        from: ValType,
        to: ValType,
        range: &Range,
    ) -> Result<()> {
        if from == to {
            return Ok(());
        }
        match Opcode::coercion(from, to) {
            Some(op) => {
                ops.push(op);
                Ok(())
            }
            None => {
                Err(error!(TypeMismatch; "cannot coerce {} to {}", from, to).in_range(range))
            }
        }
    }

    fn check_string_len(&self, s: &str, range: &Range) -> Result<()> {
        if s.len() > u16::MAX as usize {
            Err(error!(OutOfMemory; "string too long").in_range(range))
        } else {
            Ok(())
        }
    }

    fn expression(&mut self, expr: &Expression) -> Result<(ValType, Vec<Opcode>)> {
        use Expression::*;
        match expr {
            Integer(_, n) => Ok((ValType::Integer, vec![Opcode::PushImmInteger(*n)])),
            Long(_, n) => Ok((ValType::Long, vec![Opcode::PushImmLong(*n)])),
            Single(_, n) => Ok((ValType::Single, vec![Opcode::PushImmSingle(*n)])),
            Double(_, n) => Ok((ValType::Double, vec![Opcode::PushImmDouble(*n)])),
            String(range, s) => {
                self.check_string_len(s, range)?;
                Ok((ValType::String, vec![Opcode::PushImmString(s.clone())]))
            }
            Ident(_, ident) => Ok(self.variable(ident)),
            Char(range, _) => Err(error!(InternalError; "BAD SEPARATOR").in_range(range)),
            Negation(range, operand) => {
                let (ty, mut ops) = self.expression(operand)?;
                if ty == ValType::String {
                    return Err(error!(TypeMismatch; "cannot negate STRING").in_range(range));
                }
                ops.push(Opcode::Negate(ty));
                Ok((ty, ops))
            }
            Add(range, lhs, rhs) => self.add(range, lhs, rhs),
            Subtract(range, lhs, rhs) => {
                self.arithmetic(range, lhs, rhs, Opcode::Subtract, "subtract")
            }
            Multiply(range, lhs, rhs) => {
                self.arithmetic(range, lhs, rhs, Opcode::Multiply, "multiply")
            }
            Divide(range, lhs, rhs) => self.fdivide(range, lhs, rhs),
            DivideInt(range, lhs, rhs) => self.idivide(range, lhs, rhs),
            Modulo(range, ..) => {
                Err(error!(NotImplemented; "MOD is not compiled").in_range(range))
            }
            Equal(range, ..) | NotEqual(range, ..) | Less(range, ..)
            | LessEqual(range, ..) | Greater(range, ..) | GreaterEqual(range, ..) => {
                Err(error!(NotImplemented; "relational operators are not compiled")
                    .in_range(range))
            }
            And(range, ..) | Or(range, ..) | Xor(range, ..) => {
                Err(error!(NotImplemented; "logical operators are not compiled")
                    .in_range(range))
            }
        }
    }

    fn variable(&mut self, ident: &Ident) -> (ValType, Vec<Opcode>) {
        let key = ident.name().to_ascii_uppercase();
        match self.slots.get(&key) {
            Some(slot) => (slot.ty, vec![Opcode::PushVariable(slot.index)]),
            // not yet assigned: autovivify as the sigil-implied zero
            None => {
                let ty = ValType::of_ident(ident);
                (ty, vec![zero_imm(ty)])
            }
        }
    }

    fn operands(
        &mut self,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<(ValType, Vec<Opcode>, ValType, Vec<Opcode>)> {
        let (lt, lops) = self.expression(lhs)?;
        let (rt, rops) = self.expression(rhs)?;
        Ok((lt, lops, rt, rops))
    }

    fn add(
        &mut self,
        range: &Range,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<(ValType, Vec<Opcode>)> {
        let (lt, mut lops, rt, rops) = self.operands(lhs, rhs)?;
        if lt == ValType::String && rt == ValType::String {
            lops.extend(rops);
            lops.push(Opcode::Add(ValType::String));
            return Ok((ValType::String, lops));
        }
        self.join(range, lt, lops, rt, rops, Opcode::Add, "add")
    }

    fn arithmetic(
        &mut self,
        range: &Range,
        lhs: &Expression,
        rhs: &Expression,
        make: fn(ValType) -> Opcode,
        verb: &str,
    ) -> Result<(ValType, Vec<Opcode>)> {
        let (lt, lops, rt, rops) = self.operands(lhs, rhs)?;
        self.join(range, lt, lops, rt, rops, make, verb)
    }

    /// Raises both operands to their numeric join and emits the
    /// monomorphized operator for the join type.
    fn join(
        &mut self,
        range: &Range,
        lt: ValType,
        mut lops: Vec<Opcode>,
        rt: ValType,
        mut rops: Vec<Opcode>,
        make: fn(ValType) -> Opcode,
        verb: &str,
    ) -> Result<(ValType, Vec<Opcode>)> {
        let join = self.numeric_join(range, lt, rt, verb)?;
        self.coerce(&mut lops, lt, join, range)?;
        self.coerce(&mut rops, rt, join, range)?;
        lops.append(&mut rops);
        lops.push(make(join));
        Ok((join, lops))
    }

    fn numeric_join(
        &self,
        range: &Range,
        lt: ValType,
        rt: ValType,
        verb: &str,
    ) -> Result<ValType> {
        if lt == ValType::String || rt == ValType::String {
            if lt != rt {
                return Err(
                    error!(TypeMismatch; "cannot coerce {} to {}", rt, lt).in_range(range)
                );
            }
            return Err(error!(TypeMismatch; "cannot {} STRING", verb).in_range(range));
        }
        Ok(lt.max(rt))
    }

    /// Float divide: operands promote to single, or double when either
    /// side is double; the result is never an integer type.
    fn fdivide(
        &mut self,
        range: &Range,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<(ValType, Vec<Opcode>)> {
        let (lt, mut lops, rt, mut rops) = self.operands(lhs, rhs)?;
        self.numeric_join(range, lt, rt, "divide")?;
        let target = if lt == ValType::Double || rt == ValType::Double {
            ValType::Double
        } else {
            ValType::Single
        };
        self.coerce(&mut lops, lt, target, range)?;
        self.coerce(&mut rops, rt, target, range)?;
        lops.append(&mut rops);
        lops.push(Opcode::FDivide(target));
        Ok((target, lops))
    }

    /// Integer divide: the operator itself rounds float operands; the
    /// result narrows to integer only for integer operands, else long.
    fn idivide(
        &mut self,
        range: &Range,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<(ValType, Vec<Opcode>)> {
        let (lt, mut lops, rt, mut rops) = self.operands(lhs, rhs)?;
        let join = self.numeric_join(range, lt, rt, "divide")?;
        self.coerce(&mut lops, lt, join, range)?;
        self.coerce(&mut rops, rt, join, range)?;
        lops.append(&mut rops);
        lops.push(Opcode::IDivide(join));
        let result = if join == ValType::Integer {
            ValType::Integer
        } else {
            ValType::Long
        };
        Ok((result, lops))
    }
}

fn zero_imm(ty: ValType) -> Opcode {
    match ty {
        ValType::Integer => Opcode::PushImmInteger(0),
        ValType::Long => Opcode::PushImmLong(0),
        ValType::Single => Opcode::PushImmSingle(0.0),
        ValType::Double => Opcode::PushImmDouble(0.0),
        ValType::String => Opcode::PushImmString(String::new()),
    }
}
