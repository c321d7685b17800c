//! E104: CSR map conflict.

use std::collections::HashMap;

use weft_common::Interner;
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use weft_netlist::{Module, CSR_DATA_WIDTH};

use crate::LintRule;

/// Detects register maps the CSR bank cannot implement: shared addresses,
/// fields wider than a data word or than their backing signal, addresses
/// outside the bus, and fields without a bus.
pub struct CsrMapConflict;

impl LintRule for CsrMapConflict {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 104)
    }

    fn name(&self) -> &str {
        "csr-map-conflict"
    }

    fn description(&self) -> &str {
        "register fields overlap or do not fit the CSR bus"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink) {
        if module.csr.is_empty() {
            return;
        }
        let module_name = interner.resolve(module.name);
        let Some(bus) = &module.csr_bus else {
            sink.emit(Diagnostic::error(
                self.code(),
                "module declares register fields but has no CSR bus",
                Location::module(module_name),
            ));
            return;
        };
        let adr_width = module.signals.try_get(bus.adr).map_or(0, |s| s.width);

        let mut by_address: HashMap<u32, &str> = HashMap::new();
        for field in &module.csr {
            let name = interner.resolve(field.name);
            let location = || Location::item(module_name, name);
            if let Some(other) = by_address.insert(field.address, name) {
                sink.emit(
                    Diagnostic::error(
                        self.code(),
                        format!("fields '{other}' and '{name}' share address {}", field.address),
                        location(),
                    )
                    .with_help("each field occupies its own word"),
                );
            }
            if field.width > CSR_DATA_WIDTH {
                sink.emit(Diagnostic::error(
                    self.code(),
                    format!(
                        "field '{name}' is {} bits wide; the data bus is {CSR_DATA_WIDTH}",
                        field.width
                    ),
                    location(),
                ));
            }
            if let Some(signal) = module.signals.try_get(field.signal) {
                if signal.width != field.width {
                    sink.emit(Diagnostic::error(
                        self.code(),
                        format!(
                            "field '{name}' is {} bits wide but its signal has {}",
                            field.width, signal.width
                        ),
                        location(),
                    ));
                }
            }
            if adr_width < 32 && u64::from(field.address) >= 1u64 << adr_width {
                sink.emit(Diagnostic::error(
                    self.code(),
                    format!(
                        "field '{name}' at address {} is not reachable with a {adr_width}-bit address",
                        field.address
                    ),
                    location(),
                ));
            }
        }
    }
}
