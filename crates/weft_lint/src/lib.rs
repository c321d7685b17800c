//! Lint rules and engine for static checks of structural modules.
//!
//! Every rule inspects one finished [`Module`] and reports problems as
//! [`Diagnostic`](weft_diagnostics::Diagnostic)s. Errors (E-series) describe
//! netlists that cannot work: undriven or multiply driven nets, broken
//! register maps, bad cell bindings. Warnings (W-series) describe netlists
//! that are suspicious: dangling signals and width mismatches.

#![warn(missing_docs)]

mod engine;
mod helpers;
mod rules;

pub use engine::LintEngine;
pub use helpers::{analyze_usage, bit_ranges, Driver, SignalUsage};
pub use rules::register_builtin_rules;
pub use rules::{
    BadConnection, CsrMapConflict, InvalidDomain, MultipleDrivers, UndrivenSignal, UnusedSignal,
    WidthMismatch,
};

use weft_common::Interner;
use weft_diagnostics::{DiagnosticCode, DiagnosticSink, Severity};
use weft_netlist::Module;

/// A single lint rule that checks a module for design issues.
///
/// Each rule has a unique diagnostic code, a short kebab-case name, a
/// description, and a default severity.
pub trait LintRule: Send + Sync {
    /// Returns the diagnostic code for this rule (e.g., W101, E102).
    fn code(&self) -> DiagnosticCode;

    /// Returns the short kebab-case name of this rule (e.g., "unused-signal").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this rule checks.
    fn description(&self) -> &str;

    /// Returns the default severity for diagnostics emitted by this rule.
    fn default_severity(&self) -> Severity;

    /// Checks a module and emits diagnostics to the sink.
    fn check_module(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink);
}
