//! Spinner shown while a diagnostic archive is unpacked

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for archive extraction
///
/// Draws to stderr and stays hidden when stderr is not a terminal, so piped
/// sessions and tests see no progress output.
pub struct ExtractProgress {
    spinner: ProgressBar,
}

impl ExtractProgress {
    /// Start a spinner for the given archive name
    pub fn new(archive_name: &str) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} ({pos} files)")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(format!("Extracting {}", archive_name));

        Self { spinner }
    }

    /// Record one unpacked archive member
    pub fn inc_entry(&self, entry_path: &str) {
        // Truncate long paths for display
        let display_path = if entry_path.len() > 50 {
            let cut = entry_path.len() - 47;
            let cut = (cut..entry_path.len())
                .find(|&i| entry_path.is_char_boundary(i))
                .unwrap_or(cut);
            format!("...{}", &entry_path[cut..])
        } else {
            entry_path.to_string()
        };
        self.spinner.set_message(display_path);
        self.spinner.inc(1);
    }

    /// Clear the spinner once every member is unpacked
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.spinner.abandon();
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.spinner.position()
    }
}
