//! The frozen module produced by [`ModuleBuilder::finish`](crate::builder::ModuleBuilder::finish).

use crate::arena::Arena;
use crate::cell::Cell;
use crate::clock::ClockDomain;
use crate::csr::{CsrBus, CsrField};
use crate::expr::Expr;
use crate::ids::{CellId, ClockDomainId, PortId, SignalId};
use crate::port::Port;
use crate::signal::{Signal, SignalRef};
use serde::{Deserialize, Serialize};
use weft_common::Ident;

/// A continuous assignment `target = value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// The driven signal or slice.
    pub target: SignalRef,
    /// The driving expression.
    pub value: Expr,
}

/// A structural hardware module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// The module name.
    pub name: Ident,
    /// Boundary ports, in declaration order.
    pub ports: Arena<PortId, Port>,
    /// All signals, including those backing ports.
    pub signals: Arena<SignalId, Signal>,
    /// External instances, tristates and synchronizers.
    pub cells: Arena<CellId, Cell>,
    /// Continuous assignments.
    pub assignments: Vec<Assignment>,
    /// Local and imported clock domains.
    pub clock_domains: Arena<ClockDomainId, ClockDomain>,
    /// Register fields, in address order.
    pub csr: Vec<CsrField>,
    /// The CSR bus, present when `csr` is non-empty.
    pub csr_bus: Option<CsrBus>,
    /// External HDL source files the module's instances come from.
    pub sources: Vec<String>,
}

impl Module {
    /// Finds a signal by name.
    pub fn find_signal(&self, name: Ident) -> Option<SignalId> {
        self.signals.iter().find(|(_, s)| s.name == name).map(|(id, _)| id)
    }

    /// Finds a port by name.
    pub fn find_port(&self, name: Ident) -> Option<&Port> {
        self.ports.values().find(|p| p.name == name)
    }

    /// Returns the port backed by `signal`, if the signal is on the boundary.
    pub fn port_of(&self, signal: SignalId) -> Option<&Port> {
        self.ports.values().find(|p| p.signal == signal)
    }

    /// Finds a clock domain by name.
    pub fn find_domain(&self, name: Ident) -> Option<&ClockDomain> {
        self.clock_domains.values().find(|d| d.name == name)
    }

    /// Finds a cell by instance name.
    pub fn find_cell(&self, name: Ident) -> Option<&Cell> {
        self.cells.values().find(|c| c.name == name)
    }

    /// Finds a CSR field by name.
    pub fn csr_field(&self, name: Ident) -> Option<&CsrField> {
        self.csr.iter().find(|f| f.name == name)
    }

    /// Returns the width in bits of a signal reference.
    pub fn ref_width(&self, r: &SignalRef) -> u32 {
        match r {
            SignalRef::Signal(id) => self.signals[*id].width,
            SignalRef::Bit { .. } => 1,
            SignalRef::Slice { high, low, .. } => high - low + 1,
            SignalRef::Const(v) => v.width(),
        }
    }

    /// Returns the width of an expression: the widest operand.
    pub fn expr_width(&self, e: &Expr) -> u32 {
        match e {
            Expr::Ref(r) => self.ref_width(r),
            Expr::Not(inner) => self.expr_width(inner),
            Expr::And(a, b) | Expr::Or(a, b) => self.expr_width(a).max(self.expr_width(b)),
        }
    }

    /// Iterates over the cells that instantiate the external block `module`.
    pub fn instances_of(&self, module: Ident) -> impl Iterator<Item = &Cell> + '_ {
        self.cells
            .values()
            .filter(move |c| c.instance_of() == Some(module))
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::ModuleBuilder;
    use crate::port::PortDirection;
    use crate::signal::SignalRef;
    use weft_common::{Interner, LogicVec};

    #[test]
    fn lookups_by_name() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let a = b.input("a", 4).unwrap();
        b.wire("n", 4).unwrap();
        let m = b.finish().unwrap();

        assert_eq!(m.find_signal(interner.get_or_intern("a")), Some(a));
        let port = m.find_port(interner.get_or_intern("a")).unwrap();
        assert_eq!(port.direction, PortDirection::Input);
        assert!(m.port_of(a).is_some());
        let n = m.find_signal(interner.get_or_intern("n")).unwrap();
        assert!(m.port_of(n).is_none());
        assert!(m.find_signal(interner.get_or_intern("missing")).is_none());
    }

    #[test]
    fn ref_widths() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let a = b.input("a", 32).unwrap();
        let m = b.finish().unwrap();

        assert_eq!(m.ref_width(&SignalRef::Signal(a)), 32);
        assert_eq!(m.ref_width(&SignalRef::Bit { signal: a, index: 3 }), 1);
        assert_eq!(
            m.ref_width(&SignalRef::Slice {
                signal: a,
                high: 15,
                low: 8
            }),
            8
        );
        assert_eq!(m.ref_width(&SignalRef::Const(LogicVec::zero(2))), 2);
    }
}
