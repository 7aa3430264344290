use crate::value::Value;
use std::io::{BufRead, Write};
use valo_source::{Error, ErrorKind, Loc, Result};

/// Dispatches a call to one of the three fixed builtin functions.
///
/// Builtins are resolved by literal name, never through the scope chain,
/// so a variable binding cannot shadow them. Any other name is an error.
pub fn call(
    name: &str,
    args: &[Value],
    loc: Loc,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<Value> {
    match name {
        "print_int" => {
            expect_arity(name, args, 1, loc)?;
            print_int(args[0], loc, output)
        }
        "print_bool" => {
            expect_arity(name, args, 1, loc)?;
            print_bool(args[0], loc, output)
        }
        "read_int" => {
            expect_arity(name, args, 0, loc)?;
            read_int(loc, input)
        }
        _ => Err(Error::new(
            ErrorKind::Arity,
            format!("unknown function \"{}\"", name),
            loc,
        )),
    }
}

fn expect_arity(name: &str, args: &[Value], arity: usize, loc: Loc) -> Result<()> {
    if args.len() != arity {
        return Err(Error::new(
            ErrorKind::Arity,
            format!(
                "{} takes {} argument(s), got {}",
                name,
                arity,
                args.len()
            ),
            loc,
        ));
    }
    Ok(())
}

/// Writes the decimal representation of an int, followed by a newline.
fn print_int(arg: Value, loc: Loc, output: &mut dyn Write) -> Result<Value> {
    match arg {
        Value::Int(value) => {
            writeln!(output, "{}", value)
                .map_err(|err| Error::new(ErrorKind::Io, format!("print_int: {}", err), loc))?;
            Ok(Value::Unit)
        }
        other => Err(Error::new(
            ErrorKind::Type,
            format!("argument for print_int is not an int, got {}", other.kind_name()),
            loc,
        )),
    }
}

/// Writes `true` or `false`, followed by a newline.
fn print_bool(arg: Value, loc: Loc, output: &mut dyn Write) -> Result<Value> {
    match arg {
        Value::Bool(value) => {
            writeln!(output, "{}", value)
                .map_err(|err| Error::new(ErrorKind::Io, format!("print_bool: {}", err), loc))?;
            Ok(Value::Unit)
        }
        other => Err(Error::new(
            ErrorKind::Type,
            format!(
                "argument for print_bool is not a bool, got {}",
                other.kind_name()
            ),
            loc,
        )),
    }
}

/// Blocks reading one line from the input stream and parses it as an int.
fn read_int(loc: Loc, input: &mut dyn BufRead) -> Result<Value> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|err| Error::new(ErrorKind::Io, format!("read_int: {}", err), loc))?;
    if read == 0 {
        return Err(Error::new(
            ErrorKind::InputFormat,
            "read_int: unexpected end of input",
            loc,
        ));
    }
    match line.trim().parse::<i64>() {
        Ok(value) => Ok(Value::Int(value)),
        Err(_) => Err(Error::new(
            ErrorKind::InputFormat,
            format!("read_int: not an integer: \"{}\"", line.trim()),
            loc,
        )),
    }
}
