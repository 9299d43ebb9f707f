//! Styled terminal output for release progress.

use console::{Term, style};
use std::io;

/// Writes user-facing progress to the terminal, honoring `--verbose`/`--quiet`.
///
/// Progress goes to stdout; warnings and errors go to stderr and survive
/// `--quiet` (errors) or are suppressed by it (warnings).
#[derive(Debug, Clone)]
pub struct OutputManager {
    stdout: Term,
    stderr: Term,
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates a new output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
            verbose,
            quiet,
        }
    }

    /// Bold section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout.write_line("")?;
        self.stdout.write_line(&style(title).bold().cyan().to_string())
    }

    /// Progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout
            .write_line(&format!("{} {}", style("→").blue(), message))
    }

    /// Success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout
            .write_line(&format!("{} {}", style("✓").green().bold(), message))
    }

    /// Warning line on stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stderr
            .write_line(&format!("{} {}", style("⚠").yellow().bold(), style(message).yellow()))
    }

    /// Error line on stderr; printed even when quiet.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.stderr
            .write_line(&format!("{} {}", style("✗").red().bold(), style(message).red()))
    }

    /// Indented detail line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout.write_line(&format!("    {}", message))
    }

    /// Detail line shown only with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.stdout
            .write_line(&format!("    {}", style(message).dim()))
    }
}
