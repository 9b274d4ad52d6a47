// Entrypoint for the CLI application.
// - Keeps `main` small: parse the two arguments, start logging, run.
// - This is the only place the process exit status is decided.

use clap::error::ErrorKind;
use std::process::ExitCode;
use trello_move::{app, cli, TrelloMoveError};

mod logging;

fn main() -> ExitCode {
    let args = match cli::parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("{}", cli::usage());
            return ExitCode::FAILURE;
        }
    };

    logging::init_tracing();

    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// A failed match is guidance rather than a crash: show what exists.
fn report(err: &anyhow::Error) {
    if let Some(TrelloMoveError::NoMatch { needle, available }) = err.downcast_ref::<TrelloMoveError>() {
        println!("\nNo matches found for '{needle}'");
        println!("Available options:");
        for name in available {
            println!("- {name}");
        }
        return;
    }
    eprintln!("Error: {err:#}");
}
