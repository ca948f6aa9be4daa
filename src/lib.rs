//! # BASIC core
//!
//! The compilation pipeline and virtual machine of a sigil-typed BASIC
//! dialect: source text becomes tokens, tokens become a statement list,
//! the statement list compiles to typed bytecode, and a stack machine
//! executes the bytecode against an injected effects sink.
//!
//! ```
//! use basic::{lang, mach};
//!
//! let tokens = lang::lex("PRINT 1 + 2 * 3\n").unwrap();
//! let ast = lang::parse(&tokens).unwrap();
//! let program = mach::compile(&ast).unwrap();
//! let mut runtime = mach::Runtime::new(mach::Capture::new());
//! runtime.run(&program).unwrap();
//! assert_eq!(runtime.effects().output(), " 7 \n");
//! ```

#[macro_use]
pub mod lang;
pub mod mach;
