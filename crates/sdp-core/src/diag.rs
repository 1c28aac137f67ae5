//! Warning/error channel for recoverable data problems.
//!
//! Vendor data is large and imperfect.  A malformed record never becomes an
//! `Err`; the stage reports it here (naming the offending identifier) and
//! skips or defaults the record.  `error` is only called immediately before
//! a fatal `Err` is returned.

/// Sink for human-readable diagnostics.
pub trait Diagnostics {
    fn warning(&mut self, message: String);

    fn error(&mut self, message: String) {
        log::error!("{message}");
    }

    /// Warnings seen so far.
    fn warning_count(&self) -> usize;
}

// ── LogDiagnostics ────────────────────────────────────────────────────────────

/// Forwards to the `log` facade and keeps a count.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    warnings: usize,
    errors: usize,
}

impl LogDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }
}

impl Diagnostics for LogDiagnostics {
    fn warning(&mut self, message: String) {
        self.warnings += 1;
        log::warn!("{message}");
    }

    fn error(&mut self, message: String) {
        self.errors += 1;
        log::error!("{message}");
    }

    fn warning_count(&self) -> usize {
        self.warnings
    }
}

// ── CollectedDiagnostics ──────────────────────────────────────────────────────

/// Stores every message in memory.  Used by tests and by callers that want
/// to write a warning report after the run.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if any warning contains `needle`.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn warning(&mut self, message: String) {
        log::debug!("collected warning: {message}");
        self.warnings.push(message);
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}
