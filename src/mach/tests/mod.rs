use super::{compile, Capture, Program, Runtime};
use crate::lang::{self, Error};

mod compile_test;

fn program(source: &str) -> Program {
    let tokens = lang::lex(source).unwrap();
    let ast = lang::parse(&tokens).unwrap();
    compile(&ast).unwrap()
}

fn listing(source: &str) -> String {
    program(source).listing().unwrap()
}

fn compile_err(source: &str) -> Error {
    let tokens = lang::lex(source).unwrap();
    let ast = lang::parse(&tokens).unwrap();
    compile(&ast).unwrap_err()
}

fn run(source: &str) -> String {
    let mut runtime = Runtime::new(Capture::new());
    runtime.run(&program(source)).unwrap();
    assert_eq!(runtime.stack_depth(), 0);
    runtime.into_effects().output().to_string()
}

fn run_err(source: &str) -> Error {
    let mut runtime = Runtime::new(Capture::new());
    runtime.run(&program(source)).unwrap_err()
}
