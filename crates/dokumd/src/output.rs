//! Colored terminal output and prompting.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::{Style, Term};
use dokumd_sync::SyncReport;

/// Terminal output formatter.
///
/// Messages go to stderr so that `dokumd page` can write markdown to stdout.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Whether questions can be asked on the terminal.
    pub(crate) fn is_interactive(&self) -> bool {
        self.term.is_term() && io::stdin().is_terminal()
    }

    /// Ask a question and read one line.
    ///
    /// Returns `None` at end of input.
    pub(crate) fn ask(&self, question: &str) -> io::Result<Option<String>> {
        self.term
            .write_str(&format!("{} ", self.cyan_bold.apply_to(format!("{question}:"))))?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print the end-of-run summary.
    pub(crate) fn summary(&self, report: &SyncReport, elapsed: Duration) {
        for failure in &report.failures {
            self.warning(&format!(
                "  {}: {}",
                failure.path.display(),
                failure.message
            ));
        }
        for line in summary_lines(report) {
            self.info(&line);
        }
        let done = format!("Done in {:.2}s", elapsed.as_secs_f64());
        if report.has_failures() {
            self.warning(&done);
        } else {
            let _ = self.term.write_line(&self.green.apply_to(done).to_string());
        }
    }
}

/// Counts shown after a run.
fn summary_lines(report: &SyncReport) -> Vec<String> {
    vec![
        format!(
            "Pages: {} found, {} written, {} unchanged, {} failed",
            report.pages_found, report.pages_written, report.pages_unchanged, report.pages_failed
        ),
        format!(
            "Media: {} found, {} copied, {} up to date, {} failed",
            report.media_found, report.media_copied, report.media_skipped, report.media_failed
        ),
    ]
}
