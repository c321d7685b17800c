//! Diagnostic rendering for terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-like terminal format:
///
/// ```text
/// error[E101]: signal is never driven
///   --> clocking.locked
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{code}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();
        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(diag.severity, &header),
            diag.message
        ));
        out.push_str(&format!("  --> {}\n", diag.location));
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::diagnostic::Location;

    #[test]
    fn render_plain() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Error, 101),
            "signal is never driven",
            Location::item("clocking", "locked"),
        )
        .with_note("read by csr field 'locked'")
        .with_help("drive it from a cell output or an assignment");
        let out = TerminalRenderer::new(false).render(&diag);
        assert!(out.starts_with("error[E101]: signal is never driven"));
        assert!(out.contains("--> clocking.locked"));
        assert!(out.contains("= note: read by csr field 'locked'"));
        assert!(out.contains("= help: drive it"));
    }

    #[test]
    fn render_colored_wraps_header() {
        let diag = Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 101),
            "unused",
            Location::module("m"),
        );
        let out = TerminalRenderer::new(true).render(&diag);
        assert!(out.contains("\x1b[1;33mwarning[W101]\x1b[0m"));
    }
}
