//! Findings reported against a built netlist.
//!
//! A [`Diagnostic`] names a rule [`DiagnosticCode`], a [`Severity`] and the
//! [`Location`] (module plus optional signal or cell) it concerns. Lint
//! rules push into a shared [`DiagnosticSink`]; the CLI drains it through
//! a [`TerminalRenderer`] or serializes it to JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode, ParseCodeError};
pub use diagnostic::{Diagnostic, Location};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
