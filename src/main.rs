use std::{fs, io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use monkey::{
    display_error,
    errors::errors::Error,
    evaluator::evaluator::{EvalConfig, Evaluator, DEFAULT_MAX_CALL_DEPTH},
    object::environment::{Env, Environment},
    parser::parser::parse,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PROMPT: &str = ">> ";

#[derive(Parser)]
#[command(author, version, about = "Monkey language interpreter")]
struct Args {
    /// Deepest nesting of function calls before evaluation fails
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Monkey script file
    Run { script: PathBuf },
    /// Evaluate a snippet and print its value
    Eval { source: String },
    /// Start an interactive session (the default)
    Repl,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
    #[error("found {0} parse error(s)")]
    Parse(usize),
    #[error("{0}")]
    Runtime(String),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = EvalConfig::default().with_max_call_depth(args.max_depth);

    let result = match args.command.unwrap_or(Command::Repl) {
        Command::Run { script } => run_script(script, config),
        Command::Eval { source } => execute(&source, config, true),
        Command::Repl => repl(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_script(path: PathBuf, config: EvalConfig) -> Result<(), CliError> {
    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(source) => return Err(CliError::Read { path, source }),
    };
    debug!(path = %path.display(), bytes = source.len(), "running script");

    execute(&source, config, false)
}

/// Parses and evaluates `source` in a fresh global environment.
fn execute(source: &str, config: EvalConfig, print_result: bool) -> Result<(), CliError> {
    let (program, errors) = parse(source);

    if !errors.is_empty() {
        for error in &errors {
            eprint!("{}", display_error(error, source));
        }
        return Err(CliError::Parse(errors.len()));
    }

    let evaluator = Evaluator::with_config(config);
    let env = Environment::new();

    match evaluator.eval(&program, &env) {
        Some(result) if result.is_error() => Err(CliError::Runtime(result.inspect())),
        Some(result) if print_result => {
            println!("{}", result.inspect());
            Ok(())
        }
        _ => Ok(()),
    }
}

fn repl(config: EvalConfig) -> Result<(), CliError> {
    let mut editor = DefaultEditor::new()?;
    let evaluator = Evaluator::with_config(config);
    let env: Env = Environment::new();

    let user = std::env::var("USER").unwrap_or_else(|_| String::from("there"));
    println!("Hello {user}! This is the Monkey programming language!");
    println!("Feel free to type in commands (:quit to leave)");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == ":quit" || trimmed == ":exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                let (program, errors) = parse(trimmed);
                if !errors.is_empty() {
                    print_parser_errors(&errors);
                    continue;
                }

                if let Some(result) = evaluator.eval(&program, &env) {
                    println!("{}", result.inspect());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn print_parser_errors(errors: &[Error]) {
    println!("Woops! We ran into some monkey business here!");
    println!(" parser errors:");
    for error in errors {
        println!("\t{error}");
    }
}
