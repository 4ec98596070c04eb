//! The error-reporting sink and a collecting queue.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of identical records (same code, span and message)

use crate::Diagnostic;

/// Receiver of structured error records.
///
/// Implemented by whatever renders or stores diagnostics; the evaluator only
/// ever calls `emit`.
pub trait DiagnosticSink {
    /// Accept a diagnostic. Returns `false` if it was dropped.
    fn emit(&mut self, diagnostic: Diagnostic) -> bool;
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) -> bool {
        self.push(diagnostic);
        true
    }
}

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further errors are dropped (0 = unlimited).
    pub error_limit: usize,
    /// Drop a record identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue collecting diagnostics in emission order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            config,
        }
    }

    /// Whether the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Number of queued errors.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Queued diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take all queued diagnostics, leaving the queue empty.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn emit(&mut self, diagnostic: Diagnostic) -> bool {
        let is_error = diagnostic.is_error();
        if is_error && self.limit_reached() {
            return false;
        }
        if self.config.deduplicate && self.diagnostics.contains(&diagnostic) {
            return false;
        }
        if is_error {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
        true
    }
}

#[cfg(test)]
mod tests;
