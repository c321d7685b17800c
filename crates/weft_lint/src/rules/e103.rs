//! E103: Bad cell connection.

use std::collections::HashSet;

use weft_common::Interner;
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use weft_netlist::cell::{MULTIREG_I, MULTIREG_O, TRISTATE_I, TRISTATE_O, TRISTATE_OE, TRISTATE_PAD};
use weft_netlist::{CellKind, Module, PortDirection, SignalRef};

use crate::LintRule;

/// Detects malformed cell bindings: outputs tied to constants, ports bound
/// twice, and built-in cells missing one of their ports.
pub struct BadConnection;

impl LintRule for BadConnection {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 103)
    }

    fn name(&self) -> &str {
        "bad-connection"
    }

    fn description(&self) -> &str {
        "cell port is bound incorrectly"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink) {
        let module_name = interner.resolve(module.name);
        for cell in module.cells.values() {
            let cell_name = interner.resolve(cell.name);
            let location = || Location::item(module_name, cell_name);
            let mut seen = HashSet::new();
            for conn in &cell.connections {
                let port = interner.resolve(conn.port_name);
                if !seen.insert(conn.port_name) {
                    sink.emit(Diagnostic::error(
                        self.code(),
                        format!("port '{port}' of '{cell_name}' is bound more than once"),
                        location(),
                    ));
                }
                if conn.direction != PortDirection::Input
                    && matches!(conn.signal, SignalRef::Const(_))
                {
                    sink.emit(Diagnostic::error(
                        self.code(),
                        format!("{} port '{port}' of '{cell_name}' is tied to a constant", conn.direction.keyword()),
                        location(),
                    ));
                }
            }

            let required: &[&str] = match cell.kind {
                CellKind::Tristate => &[TRISTATE_PAD, TRISTATE_O, TRISTATE_OE, TRISTATE_I],
                CellKind::MultiReg { .. } => &[MULTIREG_I, MULTIREG_O],
                CellKind::Instance { .. } => &[],
            };
            for port in required {
                let bound = interner
                    .get(port)
                    .is_some_and(|ident| cell.connection(ident).is_some());
                if !bound {
                    sink.emit(Diagnostic::error(
                        self.code(),
                        format!("'{cell_name}' has no '{port}' connection"),
                        location(),
                    ));
                }
            }
        }
    }
}
