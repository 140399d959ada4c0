//! Per-document import reporting.
//!
//! Reports observable progress during `wkb populate` so users see each
//! document land (or fail) as the batch runs. Events are emitted on
//! **stderr** so stdout remains parseable for scripts; the final summary
//! block on stdout is unaffected.
//!
//! The reporter is passed into the import pipeline explicitly rather than
//! living in a global logger.

use std::io::Write;

/// A single per-document event during an import.
#[derive(Clone, Debug)]
pub enum ImportEvent<'a> {
    /// Document `n` of `total` was accepted by the remote database.
    Written { n: u64, total: u64 },
    /// Document `n` of `total` was rejected; the batch continues.
    Failed { n: u64, total: u64, error: &'a str },
}

/// Reports import progress. Implementations write to stderr.
pub trait ImportReporter {
    /// Emit a progress event. Called once per document from the importer.
    fn report(&self, event: ImportEvent<'_>);
}

/// Human-friendly lines: "document 3/10 added", "document 4/10 failed: ...".
pub struct StderrReporter;

impl ImportReporter for StderrReporter {
    fn report(&self, event: ImportEvent<'_>) {
        let line = match &event {
            ImportEvent::Written { n, total } => {
                format!("document {}/{} added\n", n, total)
            }
            ImportEvent::Failed { n, total, error } => {
                format!("document {}/{} failed: {}\n", n, total, error)
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// No-op reporter when progress is disabled.
pub struct NoReporter;

impl ImportReporter for NoReporter {
    fn report(&self, _event: ImportEvent<'_>) {}
}

/// Progress mode for the CLI: off, or human-readable lines on stderr.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportMode {
    Off,
    Human,
}

impl ReportMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ReportMode::Human
        } else {
            ReportMode::Off
        }
    }

    /// `--verbose` forces human progress regardless of TTY.
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            ReportMode::Human
        } else {
            Self::default_for_tty()
        }
    }

    /// Build a reporter for this mode. Caller passes it to the importer.
    pub fn reporter(&self) -> Box<dyn ImportReporter> {
        match self {
            ReportMode::Off => Box::new(NoReporter),
            ReportMode::Human => Box::new(StderrReporter),
        }
    }
}
