//! W101: Unused signal. An internal signal nothing reads.

use weft_common::Interner;
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use weft_netlist::Module;

use crate::helpers::analyze_usage;
use crate::LintRule;

/// Detects internal signals that are never read by an assignment, a cell
/// input, the CSR bank, or an output port.
///
/// Signals on the module boundary are excluded: unused inputs are the
/// integrator's business.
pub struct UnusedSignal;

impl LintRule for UnusedSignal {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 101)
    }

    fn name(&self) -> &str {
        "unused-signal"
    }

    fn description(&self) -> &str {
        "signal is declared but never read"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink) {
        let usage = analyze_usage(module);
        let module_name = interner.resolve(module.name);
        for (id, signal) in module.signals.iter() {
            if module.port_of(id).is_some() || usage[id.index()].consumed {
                continue;
            }
            let name = interner.resolve(signal.name);
            sink.emit(
                Diagnostic::warning(
                    self.code(),
                    format!("signal '{name}' is never read"),
                    Location::item(module_name, name),
                )
                .with_help("connect it to a sink or expose it as an output port"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_netlist::{Expr, ModuleBuilder};

    #[test]
    fn unused_wire_fires() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let a = b.input("a", 1).unwrap();
        let w = b.wire("dangling", 1).unwrap();
        b.assign(w, Expr::signal(a));
        let m = b.finish().unwrap();

        let sink = DiagnosticSink::new();
        UnusedSignal.check_module(&m, &interner, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "W101");
        assert_eq!(diags[0].location.to_string(), "top.dangling");
    }

    #[test]
    fn read_wire_is_clean() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let a = b.input("a", 1).unwrap();
        let w = b.wire("w", 1).unwrap();
        let y = b.output("y", 1).unwrap();
        b.assign(w, Expr::signal(a));
        b.assign(y, Expr::signal(w));
        let m = b.finish().unwrap();

        let sink = DiagnosticSink::new();
        UnusedSignal.check_module(&m, &interner, &sink);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn unused_input_port_is_ignored() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        b.input("spare", 1).unwrap();
        let m = b.finish().unwrap();

        let sink = DiagnosticSink::new();
        UnusedSignal.check_module(&m, &interner, &sink);
        assert!(sink.take_all().is_empty());
    }
}
