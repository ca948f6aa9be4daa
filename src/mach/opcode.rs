use super::val::ValType;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Virtual machine instruction set
///
/// The machine has no registers; every operation works on the value
/// stack. Instructions serialize to a flat byte stream: one opcode byte
/// followed by its immediates, all multi-byte values little-endian,
/// strings as a u16 length and raw bytes.
///
/// Arithmetic is monomorphized: the operand type is part of the opcode,
/// encoded as `0xa0 + 5 * family + type`. The twelve type conversions
/// occupy 0x40..=0x4b, row-major source x target with the diagonal
/// skipped.

#[derive(Clone, PartialEq)]
pub enum Opcode {
    // *** Stack manipulation
    PushImmInteger(i16),
    PushImmLong(i32),
    PushImmSingle(f32),
    PushImmDouble(f64),
    PushImmString(String),
    /// Push a clone of the slot's value. Infallible.
    PushVariable(u8),
    /// Pop one value into the slot, extending the slot table by at most
    /// one. This is the `LET` statement.
    Let(u8),

    // *** Type conversion on top-of-stack
    PromoteIntegerLong,
    CoerceIntegerSingle,
    CoerceIntegerDouble,
    CoerceLongInteger,
    CoerceLongSingle,
    CoerceLongDouble,
    CoerceSingleInteger,
    CoerceSingleLong,
    PromoteSingleDouble,
    CoerceDoubleInteger,
    CoerceDoubleLong,
    CoerceDoubleSingle,

    // *** Typed arithmetic
    Add(ValType),
    Multiply(ValType),
    FDivide(ValType),
    IDivide(ValType),
    Subtract(ValType),
    Negate(ValType),

    // *** Builtins
    Print,
    PrintComma,
    PrintLinefeed,

    // *** Testing hook
    PragmaPrinted(String),
}

const OPERATOR_BASE: u8 = 0xa0;

fn family_of(opcode: &Opcode) -> Option<(u8, ValType)> {
    use Opcode::*;
    match opcode {
        Add(ty) => Some((0, *ty)),
        Multiply(ty) => Some((1, *ty)),
        FDivide(ty) => Some((2, *ty)),
        IDivide(ty) => Some((3, *ty)),
        Subtract(ty) => Some((4, *ty)),
        Negate(ty) => Some((5, *ty)),
        _ => None,
    }
}

fn type_offset(ty: ValType) -> u8 {
    use ValType::*;
    match ty {
        Integer => 0,
        Long => 1,
        Single => 2,
        Double => 3,
        String => 4,
    }
}

fn offset_type(offset: u8) -> ValType {
    use ValType::*;
    match offset {
        0 => Integer,
        1 => Long,
        2 => Single,
        3 => Double,
        _ => String,
    }
}

/// The coercion lattice as a data table: source x target over the four
/// numeric types, `None` on the diagonal and for anything touching
/// STRING.
const COERCE: [[Option<Opcode>; 4]; 4] = [
    [
        None,
        Some(Opcode::PromoteIntegerLong),
        Some(Opcode::CoerceIntegerSingle),
        Some(Opcode::CoerceIntegerDouble),
    ],
    [
        Some(Opcode::CoerceLongInteger),
        None,
        Some(Opcode::CoerceLongSingle),
        Some(Opcode::CoerceLongDouble),
    ],
    [
        Some(Opcode::CoerceSingleInteger),
        Some(Opcode::CoerceSingleLong),
        None,
        Some(Opcode::PromoteSingleDouble),
    ],
    [
        Some(Opcode::CoerceDoubleInteger),
        Some(Opcode::CoerceDoubleLong),
        Some(Opcode::CoerceDoubleSingle),
        None,
    ],
];

impl Opcode {
    /// Looks up the conversion opcode that raises or narrows
    /// top-of-stack from one numeric type to another.
    pub fn coercion(from: ValType, to: ValType) -> Option<Opcode> {
        if from == ValType::String || to == ValType::String {
            return None;
        }
        COERCE[type_offset(from) as usize][type_offset(to) as usize].clone()
    }

    /// The (source, target) pair of a conversion opcode.
    pub fn conversion(&self) -> Option<(ValType, ValType)> {
        use Opcode::*;
        use ValType::*;
        match self {
            PromoteIntegerLong => Some((Integer, Long)),
            CoerceIntegerSingle => Some((Integer, Single)),
            CoerceIntegerDouble => Some((Integer, Double)),
            CoerceLongInteger => Some((Long, Integer)),
            CoerceLongSingle => Some((Long, Single)),
            CoerceLongDouble => Some((Long, Double)),
            CoerceSingleInteger => Some((Single, Integer)),
            CoerceSingleLong => Some((Single, Long)),
            PromoteSingleDouble => Some((Single, Double)),
            CoerceDoubleInteger => Some((Double, Integer)),
            CoerceDoubleLong => Some((Double, Long)),
            CoerceDoubleSingle => Some((Double, Single)),
            _ => None,
        }
    }

    fn conversion_byte(&self) -> Option<u8> {
        let (from, to) = self.conversion()?;
        let row = type_offset(from);
        let col = type_offset(to);
        // row-major over the off-diagonal cells
        Some(0x40 + row * 3 + if col < row { col } else { col - 1 })
    }

    pub fn encode(&self, code: &mut Vec<u8>) {
        use Opcode::*;
        match self {
            PushImmInteger(n) => {
                code.push(0x01);
                code.extend_from_slice(&n.to_le_bytes());
            }
            PushImmLong(n) => {
                code.push(0x02);
                code.extend_from_slice(&n.to_le_bytes());
            }
            PushImmSingle(n) => {
                code.push(0x03);
                code.extend_from_slice(&n.to_le_bytes());
            }
            PushImmDouble(n) => {
                code.push(0x04);
                code.extend_from_slice(&n.to_le_bytes());
            }
            PushImmString(s) => {
                code.push(0x05);
                encode_string(code, s);
            }
            PushVariable(slot) => {
                code.push(0x0a);
                code.push(*slot);
            }
            Let(slot) => {
                code.push(0x20);
                code.push(*slot);
            }
            Print => code.push(0x80),
            PrintComma => code.push(0x81),
            PrintLinefeed => code.push(0x82),
            PragmaPrinted(s) => {
                code.push(0xc0);
                encode_string(code, s);
            }
            _ => {
                if let Some(byte) = self.conversion_byte() {
                    code.push(byte);
                } else if let Some((family, ty)) = family_of(self) {
                    code.push(OPERATOR_BASE + 5 * family + type_offset(ty));
                } else {
                    debug_assert!(false);
                }
            }
        }
    }

    pub fn decode(code: &[u8], pc: &mut usize) -> Result<Opcode> {
        use Opcode::*;
        let byte = match code.get(*pc) {
            Some(byte) => *byte,
            None => return Err(error!(InternalError; "TRUNCATED BYTECODE")),
        };
        *pc += 1;
        Ok(match byte {
            0x01 => PushImmInteger(i16::from_le_bytes(take(code, pc)?)),
            0x02 => PushImmLong(i32::from_le_bytes(take(code, pc)?)),
            0x03 => PushImmSingle(f32::from_le_bytes(take(code, pc)?)),
            0x04 => PushImmDouble(f64::from_le_bytes(take(code, pc)?)),
            0x05 => PushImmString(decode_string(code, pc)?),
            0x0a => PushVariable(take_byte(code, pc)?),
            0x20 => Let(take_byte(code, pc)?),
            0x40 => PromoteIntegerLong,
            0x41 => CoerceIntegerSingle,
            0x42 => CoerceIntegerDouble,
            0x43 => CoerceLongInteger,
            0x44 => CoerceLongSingle,
            0x45 => CoerceLongDouble,
            0x46 => CoerceSingleInteger,
            0x47 => CoerceSingleLong,
            0x48 => PromoteSingleDouble,
            0x49 => CoerceDoubleInteger,
            0x4a => CoerceDoubleLong,
            0x4b => CoerceDoubleSingle,
            0x80 => Print,
            0x81 => PrintComma,
            0x82 => PrintLinefeed,
            0xc0 => PragmaPrinted(decode_string(code, pc)?),
            _ => {
                let n = byte.wrapping_sub(OPERATOR_BASE);
                if n >= 30 {
                    return Err(error!(InternalError; "UNKNOWN OPCODE {:#04x}", byte));
                }
                let ty = offset_type(n % 5);
                let op = match n / 5 {
                    0 => Add(ty),
                    1 => Multiply(ty),
                    2 => FDivide(ty),
                    3 => IDivide(ty),
                    4 => Subtract(ty),
                    _ => Negate(ty),
                };
                if ty == ValType::String && op != Add(ValType::String) {
                    return Err(error!(InternalError; "UNKNOWN OPCODE {:#04x}", byte));
                }
                op
            }
        })
    }
}

fn encode_string(code: &mut Vec<u8>, s: &str) {
    debug_assert!(s.len() <= u16::MAX as usize);
    code.extend_from_slice(&(s.len() as u16).to_le_bytes());
    code.extend_from_slice(s.as_bytes());
}

fn decode_string(code: &[u8], pc: &mut usize) -> Result<String> {
    let len = u16::from_le_bytes(take(code, pc)?) as usize;
    match code.get(*pc..*pc + len) {
        Some(bytes) => {
            *pc += len;
            match String::from_utf8(bytes.to_vec()) {
                Ok(s) => Ok(s),
                Err(_) => Err(error!(InternalError; "INVALID STRING BYTES")),
            }
        }
        None => Err(error!(InternalError; "TRUNCATED BYTECODE")),
    }
}

fn take<const N: usize>(code: &[u8], pc: &mut usize) -> Result<[u8; N]> {
    match code.get(*pc..*pc + N) {
        Some(bytes) => {
            *pc += N;
            let mut out = [0u8; N];
            out.copy_from_slice(bytes);
            Ok(out)
        }
        None => Err(error!(InternalError; "TRUNCATED BYTECODE")),
    }
}

fn take_byte(code: &[u8], pc: &mut usize) -> Result<u8> {
    match code.get(*pc) {
        Some(byte) => {
            *pc += 1;
            Ok(*byte)
        }
        None => Err(error!(InternalError; "TRUNCATED BYTECODE")),
    }
}

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            PushImmInteger(n) => write!(f, "PUSH_IMM_INTEGER {}", n),
            PushImmLong(n) => write!(f, "PUSH_IMM_LONG {}", n),
            PushImmSingle(n) => write!(f, "PUSH_IMM_SINGLE {}", n),
            PushImmDouble(n) => write!(f, "PUSH_IMM_DOUBLE {}", n),
            PushImmString(s) => write!(f, "PUSH_IMM_STRING {:?}", s),
            PushVariable(slot) => write!(f, "PUSH_VARIABLE {}", slot),
            Let(slot) => write!(f, "LET {}", slot),
            PromoteIntegerLong => write!(f, "PROMOTE_INTEGER_LONG"),
            CoerceIntegerSingle => write!(f, "COERCE_INTEGER_SINGLE"),
            CoerceIntegerDouble => write!(f, "COERCE_INTEGER_DOUBLE"),
            CoerceLongInteger => write!(f, "COERCE_LONG_INTEGER"),
            CoerceLongSingle => write!(f, "COERCE_LONG_SINGLE"),
            CoerceLongDouble => write!(f, "COERCE_LONG_DOUBLE"),
            CoerceSingleInteger => write!(f, "COERCE_SINGLE_INTEGER"),
            CoerceSingleLong => write!(f, "COERCE_SINGLE_LONG"),
            PromoteSingleDouble => write!(f, "PROMOTE_SINGLE_DOUBLE"),
            CoerceDoubleInteger => write!(f, "COERCE_DOUBLE_INTEGER"),
            CoerceDoubleLong => write!(f, "COERCE_DOUBLE_LONG"),
            CoerceDoubleSingle => write!(f, "COERCE_DOUBLE_SINGLE"),
            Add(ty) => write!(f, "OPERATOR_ADD_{}", ty),
            Multiply(ty) => write!(f, "OPERATOR_MULTIPLY_{}", ty),
            FDivide(ty) => write!(f, "OPERATOR_FDIVIDE_{}", ty),
            IDivide(ty) => write!(f, "OPERATOR_IDIVIDE_{}", ty),
            Subtract(ty) => write!(f, "OPERATOR_SUBTRACT_{}", ty),
            Negate(ty) => write!(f, "OPERATOR_NEGATE_{}", ty),
            Print => write!(f, "BUILTIN_PRINT"),
            PrintComma => write!(f, "BUILTIN_PRINT_COMMA"),
            PrintLinefeed => write!(f, "BUILTIN_PRINT_LINEFEED"),
            PragmaPrinted(s) => write!(f, "PRAGMA_PRINTED {:?}", s),
        }
    }
}
