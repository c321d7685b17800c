//! Collects diagnostics from lint rules, possibly across threads.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Collected {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

/// Shared accumulator handed to every lint rule.
///
/// Counts survive [`take_all`](Self::take_all), so a caller can drain the
/// findings for rendering and still ask whether the run failed.
#[derive(Default)]
pub struct DiagnosticSink {
    inner: Mutex<Collected>,
}

impl DiagnosticSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        let mut inner = self.lock();
        match diag.severity {
            Severity::Error => inner.errors += 1,
            Severity::Warning => inner.warnings += 1,
            Severity::Note => {}
        }
        inner.diagnostics.push(diag);
    }

    /// Records every diagnostic from `diags`.
    pub fn extend(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.emit(diag);
        }
    }

    /// `true` once any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.lock().errors
    }

    /// Warnings recorded so far.
    pub fn warning_count(&self) -> usize {
        self.lock().warnings
    }

    /// Drains the recorded diagnostics in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.lock().diagnostics)
    }

    /// Copies the recorded diagnostics without draining them.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().diagnostics.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Collected> {
        // Poisoning only means a rule panicked; the counts are still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
