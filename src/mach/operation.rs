use super::val::{Val, ValType};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Monomorphized arithmetic
///
/// The compiler coerces both operands to the operator's type before the
/// operator runs, so every function here expects exactly one variant and
/// treats anything else as a defensive type mismatch. Integer overflow
/// is checked and surfaces as a runtime error rather than wrapping.

fn mismatch(op: &str) -> Error {
    error!(TypeMismatch; "wrong operand type for {}", op)
}

pub fn add(ty: ValType, lhs: Val, rhs: Val) -> Result<Val> {
    use Val::*;
    match (ty, lhs, rhs) {
        (ValType::Integer, Integer(l), Integer(r)) => match l.checked_add(r) {
            Some(n) => Ok(Integer(n)),
            None => Err(error!(Overflow)),
        },
        (ValType::Long, Long(l), Long(r)) => match l.checked_add(r) {
            Some(n) => Ok(Long(n)),
            None => Err(error!(Overflow)),
        },
        (ValType::Single, Single(l), Single(r)) => Ok(Single(l + r)),
        (ValType::Double, Double(l), Double(r)) => Ok(Double(l + r)),
        (ValType::String, String(mut l), String(r)) => {
            l.push_str(&r);
            Ok(String(l))
        }
        _ => Err(mismatch("ADD")),
    }
}

pub fn subtract(ty: ValType, lhs: Val, rhs: Val) -> Result<Val> {
    use Val::*;
    match (ty, lhs, rhs) {
        (ValType::Integer, Integer(l), Integer(r)) => match l.checked_sub(r) {
            Some(n) => Ok(Integer(n)),
            None => Err(error!(Overflow)),
        },
        (ValType::Long, Long(l), Long(r)) => match l.checked_sub(r) {
            Some(n) => Ok(Long(n)),
            None => Err(error!(Overflow)),
        },
        (ValType::Single, Single(l), Single(r)) => Ok(Single(l - r)),
        (ValType::Double, Double(l), Double(r)) => Ok(Double(l - r)),
        _ => Err(mismatch("SUBTRACT")),
    }
}

pub fn multiply(ty: ValType, lhs: Val, rhs: Val) -> Result<Val> {
    use Val::*;
    match (ty, lhs, rhs) {
        (ValType::Integer, Integer(l), Integer(r)) => match l.checked_mul(r) {
            Some(n) => Ok(Integer(n)),
            None => Err(error!(Overflow)),
        },
        (ValType::Long, Long(l), Long(r)) => match l.checked_mul(r) {
            Some(n) => Ok(Long(n)),
            None => Err(error!(Overflow)),
        },
        (ValType::Single, Single(l), Single(r)) => Ok(Single(l * r)),
        (ValType::Double, Double(l), Double(r)) => Ok(Double(l * r)),
        _ => Err(mismatch("MULTIPLY")),
    }
}

/// Float divide. The compiler promotes operands to single or double
/// first; the integer encodings exist in the instruction set but nothing
/// emits them, so they land in the defensive arm.
pub fn fdivide(ty: ValType, lhs: Val, rhs: Val) -> Result<Val> {
    use Val::*;
    match (ty, lhs, rhs) {
        (ValType::Single, Single(l), Single(r)) => Ok(Single(l / r)),
        (ValType::Double, Double(l), Double(r)) => Ok(Double(l / r)),
        _ => Err(mismatch("FDIVIDE")),
    }
}

/// Integer divide. Float operands are rounded half-to-even, then the
/// division truncates toward zero; the result narrows to integer only
/// when both operands were integer, otherwise long.
pub fn idivide(ty: ValType, lhs: Val, rhs: Val) -> Result<Val> {
    use Val::*;
    match (ty, lhs, rhs) {
        (ValType::Integer, Integer(l), Integer(r)) => {
            if r == 0 {
                return Err(error!(DivisionByZero));
            }
            match l.checked_div(r) {
                Some(n) => Ok(Integer(n)),
                None => Err(error!(Overflow)),
            }
        }
        (ValType::Long, Long(l), Long(r)) => {
            if r == 0 {
                return Err(error!(DivisionByZero));
            }
            match l.checked_div(r) {
                Some(n) => Ok(Long(n)),
                None => Err(error!(Overflow)),
            }
        }
        (ValType::Single, Single(l), Single(r)) => {
            idivide_rounded(l.round_ties_even() as f64, r.round_ties_even() as f64)
        }
        (ValType::Double, Double(l), Double(r)) => {
            idivide_rounded(l.round_ties_even(), r.round_ties_even())
        }
        _ => Err(mismatch("IDIVIDE")),
    }
}

fn idivide_rounded(lhs: f64, rhs: f64) -> Result<Val> {
    const MIN: f64 = i32::MIN as f64;
    const MAX: f64 = i32::MAX as f64;
    if !(MIN..=MAX).contains(&lhs) || !(MIN..=MAX).contains(&rhs) {
        return Err(error!(Overflow));
    }
    let (lhs, rhs) = (lhs as i32, rhs as i32);
    if rhs == 0 {
        return Err(error!(DivisionByZero));
    }
    match lhs.checked_div(rhs) {
        Some(n) => Ok(Val::Long(n)),
        None => Err(error!(Overflow)),
    }
}

pub fn negate(ty: ValType, val: Val) -> Result<Val> {
    use Val::*;
    match (ty, val) {
        (ValType::Integer, Integer(n)) => match n.checked_neg() {
            Some(n) => Ok(Integer(n)),
            None => Err(error!(Overflow)),
        },
        (ValType::Long, Long(n)) => match n.checked_neg() {
            Some(n) => Ok(Long(n)),
            None => Err(error!(Overflow)),
        },
        (ValType::Single, Single(n)) => Ok(Single(-n)),
        (ValType::Double, Double(n)) => Ok(Double(-n)),
        _ => Err(mismatch("NEGATE")),
    }
}

/// Executes one conversion opcode. Widening is exact; narrowing from a
/// float truncates toward zero after a range check and saturates to the
/// target's minimum when out of range; narrowing LONG to INTEGER is a
/// runtime overflow when the value does not fit.
pub fn convert(from: ValType, to: ValType, val: Val) -> Result<Val> {
    use Val::*;
    if val.val_type() != from {
        return Err(mismatch("COERCE"));
    }
    Ok(match (val, to) {
        (Integer(n), ValType::Long) => Long(n as i32),
        (Integer(n), ValType::Single) => Single(n as f32),
        (Integer(n), ValType::Double) => Double(n as f64),
        (Long(n), ValType::Integer) => {
            if n < i16::MIN as i32 || n > i16::MAX as i32 {
                return Err(error!(Overflow; "overflow coercing LONG to INTEGER"));
            }
            Integer(n as i16)
        }
        (Long(n), ValType::Single) => Single(n as f32),
        (Long(n), ValType::Double) => Double(n as f64),
        (Single(n), ValType::Integer) => Integer(trunc_i16(n as f64)),
        (Single(n), ValType::Long) => Long(trunc_i32(n as f64)),
        (Single(n), ValType::Double) => Double(n as f64),
        (Double(n), ValType::Integer) => Integer(trunc_i16(n)),
        (Double(n), ValType::Long) => Long(trunc_i32(n)),
        (Double(n), ValType::Single) => Single(n as f32),
        _ => return Err(mismatch("COERCE")),
    })
}

fn trunc_i16(n: f64) -> i16 {
    let t = n.trunc();
    if t >= i16::MIN as f64 && t <= i16::MAX as f64 {
        t as i16
    } else {
        i16::MIN
    }
}

fn trunc_i32(n: f64) -> i32 {
    let t = n.trunc();
    if t >= i32::MIN as f64 && t <= i32::MAX as f64 {
        t as i32
    } else {
        i32::MIN
    }
}
