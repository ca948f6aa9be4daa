use basic::lang::{self, Error};
use basic::mach::{self, Capture, Program, Runtime};

pub fn compile(source: &str) -> Result<Program, Error> {
    let tokens = lang::lex(source)?;
    let ast = lang::parse(&tokens)?;
    mach::compile(&ast)
}

/// Runs a source program through the whole pipeline and returns what it
/// printed. Panics on any failure; use `exec_err` for failure paths.
pub fn exec(source: &str) -> String {
    let mut runtime = Runtime::new(Capture::new());
    runtime.run(&compile(source).unwrap()).unwrap();
    assert_eq!(runtime.stack_depth(), 0, "stack not empty after run");
    runtime.into_effects().output().to_string()
}

/// Runs a source program and returns the error any stage produced.
pub fn exec_err(source: &str) -> Error {
    match compile(source) {
        Err(error) => error,
        Ok(program) => {
            let mut runtime = Runtime::new(Capture::new());
            match runtime.run(&program) {
                Err(error) => error,
                Ok(()) => panic!("program ran without error"),
            }
        }
    }
}
