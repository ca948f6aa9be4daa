//! # BASIC core driver
//!
//! Reads a source file, runs it through the pipeline, and executes it
//! against standard output. `--list` dumps the bytecode disassembly
//! instead of running.

use ansi_term::Style;
use basic::lang::{self, Error};
use basic::mach::{self, Console};
use clap::Parser;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// BASIC source file
    input: String,

    /// Print the bytecode disassembly instead of running
    #[arg(long)]
    list: bool,
}

fn main() {
    let args = Args::parse();
    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("{}: {}", args.input, error);
            std::process::exit(1);
        }
    };
    if let Err(error) = run(&source, args.list) {
        let style = Style::new().bold();
        match error.range() {
            Some(range) => {
                eprintln!("?{} at {}:{}", style.paint(error.to_string()), args.input, range)
            }
            None => eprintln!("?{}", style.paint(error.to_string())),
        }
        std::process::exit(1);
    }
}

fn run(source: &str, list: bool) -> Result<(), Error> {
    let tokens = lang::lex(source)?;
    let ast = lang::parse(&tokens)?;
    let program = mach::compile(&ast)?;
    if list {
        print!("{}", program.listing()?);
        return Ok(());
    }
    let mut runtime = mach::Runtime::new(Console::stdout());
    runtime.run(&program)
}
