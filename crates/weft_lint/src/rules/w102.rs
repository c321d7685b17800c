//! W102: Width mismatch between the two sides of a binding.

use weft_common::Interner;
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use weft_netlist::{CellKind, Expr, Module};

use crate::LintRule;

/// Detects bindings whose widths disagree.
///
/// Checked: assignment targets against their expression, operands of
/// bitwise operators, tristate connections (always one bit), and the
/// input and output of a synchronizer. External instances are opaque, so
/// their connections are not checked.
pub struct WidthMismatch;

impl WidthMismatch {
    fn check_expr(&self, module: &Module, e: &Expr, found: &mut Vec<(u32, u32)>) {
        match e {
            Expr::Ref(_) => {}
            Expr::Not(inner) => self.check_expr(module, inner, found),
            Expr::And(a, b) | Expr::Or(a, b) => {
                let (wa, wb) = (module.expr_width(a), module.expr_width(b));
                if wa != wb {
                    found.push((wa, wb));
                }
                self.check_expr(module, a, found);
                self.check_expr(module, b, found);
            }
        }
    }
}

impl LintRule for WidthMismatch {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 102)
    }

    fn name(&self) -> &str {
        "width-mismatch"
    }

    fn description(&self) -> &str {
        "bound signals have different widths"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, interner: &Interner, sink: &DiagnosticSink) {
        let module_name = interner.resolve(module.name);
        let target_name = |a: &weft_netlist::Assignment| {
            a.target
                .signal()
                .and_then(|id| module.signals.try_get(id))
                .map(|s| interner.resolve(s.name).to_string())
                .unwrap_or_else(|| "<const>".to_string())
        };

        for (i, a) in module.assignments.iter().enumerate() {
            let lhs = module.ref_width(&a.target);
            let rhs = module.expr_width(&a.value);
            let name = target_name(a);
            if lhs != rhs {
                sink.emit(
                    Diagnostic::warning(
                        self.code(),
                        format!("assignment #{i} drives {lhs}-bit '{name}' with a {rhs}-bit value"),
                        Location::item(module_name, name.as_str()),
                    )
                    .with_help("slice or extend the value to the target width"),
                );
            }
            let mut operands = Vec::new();
            self.check_expr(module, &a.value, &mut operands);
            for (wa, wb) in operands {
                sink.emit(Diagnostic::warning(
                    self.code(),
                    format!("assignment #{i} combines {wa}-bit and {wb}-bit operands"),
                    Location::item(module_name, name.as_str()),
                ));
            }
        }

        for cell in module.cells.values() {
            let cell_name = interner.resolve(cell.name);
            match &cell.kind {
                CellKind::Tristate => {
                    for conn in &cell.connections {
                        let w = module.ref_width(&conn.signal);
                        if w != 1 {
                            sink.emit(Diagnostic::warning(
                                self.code(),
                                format!(
                                    "tristate port '{}' is bound to {w} bits; tristates are one bit wide",
                                    interner.resolve(conn.port_name)
                                ),
                                Location::item(module_name, cell_name),
                            ));
                        }
                    }
                }
                CellKind::MultiReg { .. } => {
                    let widths: Vec<u32> = cell
                        .connections
                        .iter()
                        .map(|c| module.ref_width(&c.signal))
                        .collect();
                    if widths.windows(2).any(|w| w[0] != w[1]) {
                        sink.emit(Diagnostic::warning(
                            self.code(),
                            format!("synchronizer input and output widths differ: {widths:?}"),
                            Location::item(module_name, cell_name),
                        ));
                    }
                }
                CellKind::Instance { .. } => {}
            }
        }
    }
}
