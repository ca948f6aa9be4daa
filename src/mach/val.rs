use crate::lang::Ident;

/// ## Runtime stack values
///
/// Exactly five variants, one per sigil. Numerics travel by value;
/// strings own their bytes, so popping one transfers ownership and
/// pushing a slot's string clones it.

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Integer(i16),
    Long(i32),
    Single(f32),
    Double(f64),
    String(String),
}

impl Val {
    pub fn val_type(&self) -> ValType {
        use Val::*;
        match self {
            Integer(_) => ValType::Integer,
            Long(_) => ValType::Long,
            Single(_) => ValType::Single,
            Double(_) => ValType::Double,
            String(_) => ValType::String,
        }
    }
}

/// The canonical print formatter: non-negative numbers get a leading
/// space and a trailing space, negative numbers a minus and a trailing
/// space, strings print verbatim.
impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Val::*;
        fn number(f: &mut std::fmt::Formatter, s: std::string::String) -> std::fmt::Result {
            if s.starts_with('-') {
                write!(f, "{} ", s)
            } else {
                write!(f, " {} ", s)
            }
        }
        match self {
            Integer(n) => number(f, n.to_string()),
            Long(n) => number(f, n.to_string()),
            Single(n) => number(f, n.to_string()),
            Double(n) => number(f, n.to_string()),
            String(s) => write!(f, "{}", s),
        }
    }
}

/// The type tag alone. The declaration order is the numeric promotion
/// lattice; the join of two numeric types is the greater of the two.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum ValType {
    Integer,
    Long,
    Single,
    Double,
    String,
}

impl ValType {
    /// The type a variable reference carries, implied by its sigil.
    /// A bare name is single, the default numeric type of this dialect.
    pub fn of_ident(ident: &Ident) -> ValType {
        match ident {
            Ident::Plain(_) => ValType::Single,
            Ident::String(_) => ValType::String,
            Ident::Single(_) => ValType::Single,
            Ident::Double(_) => ValType::Double,
            Ident::Integer(_) => ValType::Integer,
            Ident::Long(_) => ValType::Long,
        }
    }
}

impl std::fmt::Display for ValType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ValType::*;
        let s = match self {
            Integer => "INTEGER",
            Long => "LONG",
            Single => "SINGLE",
            Double => "DOUBLE",
            String => "STRING",
        };
        write!(f, "{}", s)
    }
}
