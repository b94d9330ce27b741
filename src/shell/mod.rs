//! Interactive prompt and one-shot command runner
//!
//! Both front ends feed lines through [`Shell::eval`], which resolves,
//! dispatches and prints. Errors are printed and the session goes on; only a
//! failure of the prompt itself ends it early.

use console::Style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::bundle::DiagnosticBundle;
use crate::dispatcher::dispatch;
use crate::error::Result;
use crate::grammar::CommandGrammar;
use crate::resolver::resolve;
use crate::ui;

pub const PROMPT: &str = "pxctl> ";

/// What the session does after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// The line was reported as an error
    Failed,
    Exit,
}

/// A session over one loaded bundle
pub struct Shell<'a> {
    bundle: &'a DiagnosticBundle,
    grammar: &'a CommandGrammar,
}

impl<'a> Shell<'a> {
    pub fn new(bundle: &'a DiagnosticBundle, grammar: &'a CommandGrammar) -> Self {
        Self { bundle, grammar }
    }

    /// Evaluate one line and print its outcome
    pub fn eval(&self, line: &str) -> Step {
        let resolved = match resolve(self.grammar, line) {
            Ok(resolved) => resolved,
            Err(e) => {
                ui::print_error(&e);
                return Step::Failed;
            }
        };
        if resolved.is_exit() {
            return Step::Exit;
        }
        ui::print_ignored_flags(&resolved.ignored_flags);

        match dispatch(self.bundle, self.grammar, &resolved) {
            Ok(result) => {
                tracing::debug!(line, kind = ?result.kind(), "command succeeded");
                ui::print_result(&result);
                Step::Continue
            }
            Err(e) => {
                tracing::debug!(line, error = %e, "command failed");
                ui::print_error(&e);
                Step::Failed
            }
        }
    }

    /// Read-eval-print loop until `exit`, `quit` or end of input
    ///
    /// Ctrl-C abandons the current line.
    pub fn run_interactive(&self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        self.print_banner();

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        editor.add_history_entry(trimmed).ok();
                    }
                    if self.eval(trimmed) == Step::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Evaluate `-c` commands in order, stopping at `exit`
    ///
    /// Returns how many commands failed.
    pub fn run_commands(&self, lines: &[String]) -> usize {
        let mut failed = 0;
        for line in lines {
            match self.eval(line) {
                Step::Continue => {}
                Step::Failed => failed += 1,
                Step::Exit => break,
            }
        }
        failed
    }

    fn print_banner(&self) {
        let node = self
            .bundle
            .node()
            .map(|n| format!(" (node {})", n))
            .unwrap_or_default();
        println!(
            "{} {}{}",
            Style::new().bold().green().apply_to("Portworx pxctl (offline diag shell)"),
            self.bundle.source(),
            node
        );
        println!("Type 'help' for commands, 'exit' or 'quit' to leave.");
    }
}
