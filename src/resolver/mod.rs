//! Command line resolution
//!
//! Turns one raw input line into a [`ResolvedCommand`]:
//! - Empty lines, `exit`/`quit` and help requests are recognized first
//! - A leading `pxctl` is optional
//! - Tokens starting with `-` are flags wherever they appear
//! - The remaining tokens are matched against the grammar's prefix tree and
//!   whatever follows the matched path is bound as positional arguments

use std::collections::BTreeSet;

use crate::error::{Result, ambiguous, unknown_command};
use crate::grammar::{CommandGrammar, CommandSpec, Flag, PathMatch};

/// Optional prefix typed in front of `pxctl` commands
const PXCTL: &str = "pxctl";

/// What a line asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical<'g> {
    /// Nothing was typed
    Noop,
    /// End the session
    Exit,
    /// Show the command list
    Help,
    Command(&'g CommandSpec),
}

/// Positional arguments bound to a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs {
    pub values: Vec<String>,
    /// False when the count is outside the command's arity
    pub complete: bool,
}

impl BoundArgs {
    fn none() -> Self {
        Self {
            values: Vec::new(),
            complete: true,
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// One resolved input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand<'g> {
    pub canonical: Canonical<'g>,
    pub flags: BTreeSet<Flag>,
    pub args: BoundArgs,
    /// Flags typed that the command does not accept
    pub ignored_flags: Vec<String>,
}

impl<'g> ResolvedCommand<'g> {
    fn special(canonical: Canonical<'g>) -> Self {
        Self {
            canonical,
            flags: BTreeSet::new(),
            args: BoundArgs::none(),
            ignored_flags: Vec::new(),
        }
    }

    pub fn noop() -> Self {
        Self::special(Canonical::Noop)
    }

    pub fn exit() -> Self {
        Self::special(Canonical::Exit)
    }

    pub fn help() -> Self {
        Self::special(Canonical::Help)
    }

    pub fn is_exit(&self) -> bool {
        self.canonical == Canonical::Exit
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// The matched command, if the line named one
    pub fn spec(&self) -> Option<&'g CommandSpec> {
        match self.canonical {
            Canonical::Command(spec) => Some(spec),
            _ => None,
        }
    }
}

/// Split a line on whitespace; quotes have no special meaning
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

fn is_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

fn is_help_request(tokens: &[&str]) -> bool {
    matches!(tokens, ["help" | "?"] | ["pxctl"] | ["pxctl", "help"])
        || tokens.iter().any(|t| matches!(*t, "--help" | "-h"))
}

/// Resolve one input line against the grammar
///
/// Fails with `UnknownCommand` when no command is a prefix of the line and
/// with `AmbiguousCommand` when an abbreviation cannot be settled. A wrong
/// argument count is not an error here; the arguments come back marked
/// incomplete.
pub fn resolve<'g>(grammar: &'g CommandGrammar, line: &str) -> Result<ResolvedCommand<'g>> {
    let tokens = tokenize(line);

    match tokens.as_slice() {
        [] => return Ok(ResolvedCommand::noop()),
        ["exit" | "quit"] => return Ok(ResolvedCommand::exit()),
        _ if is_help_request(&tokens) => return Ok(ResolvedCommand::help()),
        _ => {}
    }

    let body = match tokens.split_first() {
        Some((&PXCTL, rest)) => rest,
        _ => tokens.as_slice(),
    };
    let (flag_tokens, path): (Vec<&str>, Vec<&str>) =
        body.iter().copied().partition(|t| is_flag(t));

    let (spec, consumed) = match grammar.match_path(&path) {
        PathMatch::Found { spec, consumed } => grammar
            .spec(spec)
            .map(|s| (s, consumed))
            .ok_or_else(|| unknown_command(line.trim()))?,
        PathMatch::NoMatch => return Err(unknown_command(line.trim())),
        PathMatch::Ambiguous { token, candidates } => return Err(ambiguous(token, candidates)),
    };

    let mut flags = BTreeSet::new();
    let mut ignored_flags = Vec::new();
    for token in flag_tokens {
        match Flag::parse(token) {
            Some(flag) if spec.accepts(flag) => {
                flags.insert(flag);
            }
            _ => ignored_flags.push(token.to_string()),
        }
    }

    let values: Vec<String> = path[consumed..].iter().map(|t| t.to_string()).collect();
    let complete = spec.accepts_arg_count(values.len());

    tracing::debug!(
        command = %spec.canonical(),
        args = values.len(),
        complete,
        "resolved command line"
    );

    Ok(ResolvedCommand {
        canonical: Canonical::Command(spec),
        flags,
        args: BoundArgs { values, complete },
        ignored_flags,
    })
}
