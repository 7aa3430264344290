use console::style;
use std::io::{self, Write};
use std::{env, fs, process};
use valo::run_program;
use valo_interp::value::Value;
use valo_source::Error;

fn main() {
    let args: Vec<String> = env::args().collect();
    match args.len() {
        1 => repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("usage: valo [script]");
            process::exit(64);
        }
    }
}

fn report(error: &Error) {
    eprintln!("{}: {}", style("error").red().bold(), error);
}

fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {}: {}", style("error").red().bold(), path, err);
            process::exit(66);
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    if let Err(error) = run_program(&source, &mut input, &mut output) {
        report(&error);
        process::exit(70);
    }
}

fn repl() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let mut input = stdin.lock();
        match run_program(&line, &mut input, &mut stdout) {
            Ok(Value::Unit) => {}
            Ok(value) => println!("{}", value),
            Err(error) => report(&error),
        }
    }
}
