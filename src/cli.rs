//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

/// pxdiag - offline pxctl shell
///
/// Explore a Portworx diagnostic bundle with the pxctl commands you already know.
#[derive(Parser, Debug)]
#[command(
    name = "pxdiag",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Offline pxctl shell for Portworx diagnostic bundles",
    long_about = "pxdiag loads a Portworx diagnostic bundle once and answers pxctl-style \
                  queries (volumes, status, alerts, kvdb members, host captures) from the \
                  captured files, without access to the live cluster.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  pxdiag diags.tar.gz                       \x1b[90m# Start the interactive shell\x1b[0m\n   \
                  pxdiag diags.tar.gz -c 'v l'              \x1b[90m# List volumes and exit\x1b[0m\n   \
                  pxdiag diags.tar.gz -c 'v i 1234 -j'      \x1b[90m# One volume as JSON\x1b[0m\n   \
                  pxdiag ./extracted -c status -c version   \x1b[90m# Run several commands\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Diagnostic archive (.tar.gz, .tgz, .tar) or a directory it was extracted to
    #[arg(env = "PXDIAG_BUNDLE")]
    pub archive: PathBuf,

    /// Run a command instead of starting the shell (repeatable)
    #[arg(long = "command", short = 'c', value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
