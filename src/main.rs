use std::{
    fs,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use axo::{
    error::{ParseError, RuntimeError},
    interpreter::evaluator::core::Interpreter,
    parse_source,
};
use clap::Parser;

/// axo is a small, statically-annotated scripting language with first-class
/// functions, structural types, modules and background programs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an .axo script. Without it, an interactive session starts.
    script: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match args.script {
        Some(path) => run_script(&path),
        None => repl(),
    }
}

fn run_script(path: &str) -> ExitCode {
    let Ok(source) = fs::read_to_string(path) else {
        eprintln!("Failed to read the input file '{path}'. Perhaps this file does not exist?");
        return ExitCode::FAILURE;
    };

    match parse_source(&source) {
        Err(e) => {
            report_parse_error(path, &source, &e);
            ExitCode::FAILURE
        },
        Ok(program) => {
            let mut interpreter = Interpreter::new();
            match interpreter.run(&program) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    report_runtime_error(&e);
                    ExitCode::FAILURE
                },
            }
        },
    }
}

/// The interactive session: lines accumulate until one contains a `;` or a
/// `}`, then the buffer is evaluated. Definitions persist across snippets
/// because the interpreter lives for the whole session.
fn repl() -> ExitCode {
    println!("axo {}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' to quit.");

    let mut interpreter = Interpreter::new();
    let mut buffer = String::new();
    print_prompt();

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim() == "exit" {
            break;
        }
        if line.trim().is_empty() {
            print_prompt();
            continue;
        }

        buffer.push_str(&line);
        buffer.push('\n');

        if line.contains(';') || line.contains('}') {
            match parse_source(&buffer) {
                Ok(program) => {
                    if let Err(e) = interpreter.run(&program) {
                        report_runtime_error(&e);
                    }
                },
                Err(e) => report_parse_error("<stdin>", &buffer, &e),
            }
            buffer.clear();
        }
        print_prompt();
    }

    ExitCode::SUCCESS
}

fn print_prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

/// Prints a parse error with a file/line/column pointer and a caret run
/// under the offending lexeme.
fn report_parse_error(path: &str, source: &str, e: &ParseError) {
    eprintln!("Fatal error: {e}");
    eprintln!("  File: {path}:{}:{}", e.line(), e.column());

    if let Some(text) = source.lines().nth(e.line().saturating_sub(1)) {
        eprintln!("{text}");
        let column = e.column().max(1);
        let caret_len = e.lexeme().chars().count().max(1);
        eprintln!("{}{}", " ".repeat(column - 1), "^".repeat(caret_len));
    }
}

/// Prints a runtime error as a boxed message.
fn report_runtime_error(e: &RuntimeError) {
    let message = e.to_string();
    let width = message.chars().count() + 2;
    eprintln!("╭{}╮", "─".repeat(width));
    eprintln!("│ {message} │");
    eprintln!("╰{}╯", "─".repeat(width));
}
