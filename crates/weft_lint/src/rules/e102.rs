//! E102: Multiple drivers. Bits of a signal are driven by more than one source.

use weft_common::Interner;
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use weft_netlist::Module;

use crate::helpers::{analyze_usage, bit_ranges};
use crate::LintRule;

/// Detects bits with more than one driver.
pub struct MultipleDrivers;

impl LintRule for MultipleDrivers {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 102)
    }

    fn name(&self) -> &str {
        "multiple-drivers"
    }

    fn description(&self) -> &str {
        "signal bits are driven from more than one source"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink) {
        let usage = analyze_usage(module);
        let module_name = interner.resolve(module.name);
        for (id, signal) in module.signals.iter() {
            let u = &usage[id.index()];
            let conflicts = u.conflicting_bits();
            let Some(&first) = conflicts.first() else {
                continue;
            };
            let name = interner.resolve(signal.name);
            let mut diag = Diagnostic::error(
                self.code(),
                format!("bits {} of '{name}' have multiple drivers", bit_ranges(&conflicts)),
                Location::item(module_name, name),
            );
            for driver in &u.drivers[first as usize] {
                diag = diag.with_note(format!(
                    "bit {first} is driven by {}",
                    driver.describe(module, interner)
                ));
            }
            sink.emit(diag);
        }
    }
}
