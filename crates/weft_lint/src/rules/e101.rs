//! E101: Undriven signal. Bits of a consumed or exported signal have no driver.

use weft_common::Interner;
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use weft_netlist::Module;

use crate::helpers::{analyze_usage, bit_ranges};
use crate::LintRule;

/// Detects signals with bits that nothing drives.
///
/// Input and inout ports are driven from outside the module and never fire.
pub struct UndrivenSignal;

impl LintRule for UndrivenSignal {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 101)
    }

    fn name(&self) -> &str {
        "undriven-signal"
    }

    fn description(&self) -> &str {
        "signal bits have no driver"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink) {
        let usage = analyze_usage(module);
        let module_name = interner.resolve(module.name);
        for (id, signal) in module.signals.iter() {
            let undriven = usage[id.index()].undriven_bits();
            if undriven.is_empty() {
                continue;
            }
            let name = interner.resolve(signal.name);
            let message = if undriven.len() as u32 == signal.width {
                format!("signal '{name}' is not driven")
            } else {
                format!("bits {} of '{name}' are not driven", bit_ranges(&undriven))
            };
            sink.emit(Diagnostic::error(
                self.code(),
                message,
                Location::item(module_name, name),
            ));
        }
    }
}
