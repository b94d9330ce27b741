//! pxdiag - offline pxctl shell
//!
//! Loads a Portworx diagnostic bundle once and answers pxctl-style queries
//! from the captured files, interactively or through `-c` commands.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bundle;
mod cli;
mod dispatcher;
mod error;
mod grammar;
mod progress;
mod resolver;
mod shell;
mod temp;
mod ui;

#[cfg(test)]
mod test_fixtures;

use bundle::DiagnosticBundle;
use cli::Cli;
use error::Result;
use grammar::CommandGrammar;
use shell::Shell;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Load everything and run the session; returns the number of failed `-c` commands
fn run(cli: &Cli) -> Result<usize> {
    let grammar = CommandGrammar::builtin()?;
    let bundle = DiagnosticBundle::load(&cli.archive)?;
    if let Some(warning) = bundle.missing_warning() {
        ui::print_warning(&warning);
    }

    let shell = Shell::new(&bundle, &grammar);
    if cli.commands.is_empty() {
        shell.run_interactive()?;
        Ok(0)
    } else {
        Ok(shell.run_commands(&cli.commands))
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(0) => {}
        Ok(failed) => {
            tracing::debug!(failed, "some commands failed");
            std::process::exit(1);
        }
        Err(e) => {
            ui::print_error(&e);
            std::process::exit(1);
        }
    }
}
