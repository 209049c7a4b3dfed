mod ast;
mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod highlighter;
mod lexer;
mod macros;
mod parser;
mod token;
mod value;

use clap::{Parser, Subcommand};
use env::Environment;
use eval::eval_program;
use highlighter::MonkeyHelper;
use lexer::Lexer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use value::Value;

/// CLI tool for the Monkey programming language
#[derive(Parser, Debug)]
#[command(name = "monkey")]
#[command(version = config::VERSION)]
#[command(about = "CLI tool for the Monkey programming language")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive REPL
    Repl,
    /// Run a Monkey program from a file
    Run {
        /// Script file to execute
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match args.command {
        Command::Repl => run_repl(),
        Command::Run { file } => run_file(file),
    }
}

// ============================================================================
// REPL mode
// ============================================================================

fn run_repl() -> ExitCode {
    println!("{}", config::greeting(&whoami::username()));
    println!("{}", config::WELCOME_FOOTER);

    let rl_config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<MonkeyHelper, DefaultHistory> = match Editor::with_config(rl_config) {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to initialize REPL: {}", e);
            return ExitCode::FAILURE;
        }
    };
    rl.set_helper(Some(MonkeyHelper::new()));
    let _ = rl.load_history(config::HISTORY_FILE);

    // One environment for values and one for macros, both persistent across
    // lines so definitions accumulate over the session.
    let env = Environment::new();
    let macro_env = Environment::new();

    loop {
        match rl.readline(config::PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                eval_line(&line, &env, &macro_env);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    let _ = rl.save_history(config::HISTORY_FILE);
    ExitCode::SUCCESS
}

fn eval_line(line: &str, env: &Rc<Environment>, macro_env: &Rc<Environment>) {
    let mut p = parser::Parser::new(Lexer::new(line));
    let mut program = p.parse_program();
    if !p.errors().is_empty() {
        println!("parser errors:");
        for message in p.errors() {
            println!("\t{}", message);
        }
        return;
    }

    macros::define_macros(&mut program, macro_env);
    let expanded = match macros::expand_macros(program, macro_env) {
        Ok(program) => program,
        Err(e) => {
            println!("ERROR: {}", e);
            return;
        }
    };

    match eval_program(&expanded, env) {
        Ok(Value::Null) => {}
        Ok(value) => println!("{}", value),
        Err(e) => println!("ERROR: {}", e),
    }
}

// ============================================================================
// Script mode
// ============================================================================

fn run_file(file: Option<PathBuf>) -> ExitCode {
    let Some(path) = file else {
        eprintln!("File not specified");
        return ExitCode::FAILURE;
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Cannot read script file {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match run_source(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

/// Pipes a whole source file through parse → define_macros → expand_macros →
/// eval. Returns the already-formatted failure report, if any.
fn run_source(source: &str) -> Result<(), String> {
    let mut p = parser::Parser::new(Lexer::new(source));
    let mut program = p.parse_program();
    if !p.errors().is_empty() {
        let mut report = String::from("ERROR:");
        for message in p.errors() {
            report.push_str("\n\t");
            report.push_str(message);
        }
        return Err(report);
    }

    let env = Environment::new();
    let macro_env = Environment::new();

    macros::define_macros(&mut program, &macro_env);
    let expanded = macros::expand_macros(program, &macro_env).map_err(|e| format!("ERROR: {}", e))?;

    eval_program(&expanded, &env).map_err(|e| format!("ERROR: {}", e))?;
    Ok(())
}
