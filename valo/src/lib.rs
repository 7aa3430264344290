//! Front-end glue for the valo language: tokenize, parse and evaluate in
//! one call.

use std::io::{BufRead, Write};
use valo_interp::interpreter::Interpreter;
use valo_interp::value::Value;
use valo_parser::lexer::tokenize;
use valo_parser::parser::Parser;
use valo_source::Result;

/// Runs `source` to completion against the given streams and returns the
/// program's final value. The first error aborts the run.
pub fn run_program(
    source: &str,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<Value> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(&tokens);
    let ast = parser.parse_program()?;
    Interpreter::new(input, output).interpret(&ast)
}
