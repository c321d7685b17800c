//! C101: Invalid clock domain reference.

use weft_common::Interner;
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use weft_netlist::{CellKind, Module, PortDirection};

use crate::LintRule;

/// Detects clocked elements that point at a domain the module does not
/// know, and domains whose clock or reset is not on the boundary the way
/// their origin requires.
pub struct InvalidDomain;

impl LintRule for InvalidDomain {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Clocking, 101)
    }

    fn name(&self) -> &str {
        "invalid-domain"
    }

    fn description(&self) -> &str {
        "clocked element references an unknown or malformed clock domain"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink) {
        let module_name = interner.resolve(module.name);

        for cell in module.cells.values() {
            if let CellKind::MultiReg { domain, .. } = &cell.kind {
                if module.clock_domains.try_get(*domain).is_none() {
                    let cell_name = interner.resolve(cell.name);
                    sink.emit(Diagnostic::error(
                        self.code(),
                        format!("synchronizer '{cell_name}' is clocked by an unknown domain"),
                        Location::item(module_name, cell_name),
                    ));
                }
            }
        }

        if let Some(bus) = &module.csr_bus {
            if module.clock_domains.try_get(bus.domain).is_none() {
                sink.emit(Diagnostic::error(
                    self.code(),
                    "the CSR bank is clocked by an unknown domain",
                    Location::module(module_name),
                ));
            }
        }

        for domain in module.clock_domains.values() {
            let name = interner.resolve(domain.name);
            let expected = match domain.origin {
                weft_netlist::DomainOrigin::Local => PortDirection::Output,
                weft_netlist::DomainOrigin::Imported => PortDirection::Input,
            };
            for signal in [domain.clock, domain.reset] {
                let ok = module
                    .port_of(signal)
                    .is_some_and(|p| p.direction == expected);
                if !ok {
                    sink.emit(Diagnostic::error(
                        self.code(),
                        format!(
                            "domain '{name}' must expose its clock and reset as {} ports",
                            expected.keyword()
                        ),
                        Location::item(module_name, name),
                    ));
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_netlist::{ClockDomainId, ModuleBuilder, SignalRef};

    fn run(m: &Module, interner: &Interner) -> Vec<Diagnostic> {
        let sink = DiagnosticSink::new();
        InvalidDomain.check_module(m, interner, &sink);
        sink.take_all()
    }

    #[test]
    fn builder_domains_are_clean() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let sys = b.import_domain("sys").unwrap();
        b.local_domain("pix").unwrap();
        let a = b.input("a", 1).unwrap();
        let y = b.output("y", 1).unwrap();
        b.multi_reg("sync", a, y, sys, 2).unwrap();
        let m = b.finish().unwrap();
        assert!(run(&m, &interner).is_empty());
    }

    #[test]
    fn unknown_multireg_domain_fires() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let a = b.input("a", 1).unwrap();
        let y = b.output("y", 1).unwrap();
        b.multi_reg(
            "sync",
            SignalRef::Signal(a),
            SignalRef::Signal(y),
            ClockDomainId::from_raw(7),
            2,
        )
        .unwrap();
        let m = b.finish().unwrap();
        let diags = run(&m, &interner);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "C101");
    }
}
