use std::env;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, ValueHint};

use crate::error::EditorExited;

mod cli;
mod config;
mod error;
mod logging;
mod panic;
mod pipeline;
mod platform;
mod stream;
mod utils;

fn main() {
    std::process::exit(real_main());
}

fn real_main() -> i32 {
    if let Err(e) = panic::init() {
        return report(&e);
    }

    // Enhance the help message for the log-file argument
    let help = match config::get_log_path() {
        Ok(def) => format!("Diagnostic log destination (default: {})", def.display()),
        Err(_) => "Diagnostic log destination".to_owned(),
    };
    let cmd = cli::Cli::command()
        .mut_arg("log_file", |a| a.help(help).value_hint(ValueHint::FilePath));
    let matches = cmd.get_matches_from(cli::normalize_args(env::args_os()));
    let mut args = cli::Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let trailing = std::mem::take(&mut args.trailing);
    let config = config::Config::new(args);
    if let Err(e) = logging::init(&config) {
        return report(&e);
    }
    if !trailing.is_empty() {
        tracing::debug!(?trailing, "ignoring arguments after the options");
    }

    let platform = platform::current();
    let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<()> {
        pipeline::run(&config, platform.as_ref())
    }));
    exit_code(outcome)
}

fn exit_code(outcome: thread::Result<Result<()>>) -> i32 {
    match outcome {
        Ok(Ok(())) => libc::EXIT_SUCCESS,
        Ok(Err(e)) => report(&e),
        // already reported by the panic hook
        Err(_) => libc::EXIT_FAILURE,
    }
}

fn report(err: &anyhow::Error) -> i32 {
    if let Some(exited) = err.downcast_ref::<EditorExited>() {
        tracing::warn!(command = %exited.command, status = exited.status, "editor failed");
    } else {
        tracing::error!("{:?}", err);
    }
    eprintln!("{}", render(err));
    libc::EXIT_FAILURE
}

/// The single line shown on stderr, with the context chain inlined.
fn render(err: &anyhow::Error) -> String {
    format!("{}: {:#}", env!("CARGO_PKG_NAME"), err)
}
