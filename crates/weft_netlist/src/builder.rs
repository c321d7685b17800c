//! Incremental construction of a [`Module`].
//!
//! [`ModuleBuilder`] owns every arena of the module under construction and
//! checks names and widths as items are added. [`ModuleBuilder::finish`]
//! validates every signal reference, generates the CSR bus when register
//! fields were declared, and freezes the result.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use weft_common::{is_verilog_identifier, Ident, Interner};

use crate::arena::Arena;
use crate::cell::{
    Cell, CellKind, Connection, MULTIREG_I, MULTIREG_O, TRISTATE_I, TRISTATE_O, TRISTATE_OE,
    TRISTATE_PAD,
};
use crate::clock::{ClockDomain, DomainOrigin};
use crate::const_value::ConstValue;
use crate::csr::{address_width, CsrAccess, CsrBus, CsrField, CSR_DATA_WIDTH};
use crate::error::BuildError;
use crate::expr::Expr;
use crate::ids::{CellId, ClockDomainId, PortId, SignalId};
use crate::module::{Assignment, Module};
use crate::port::{Port, PortDirection};
use crate::signal::{Signal, SignalKind, SignalRef};

/// Name of the domain the CSR bank is clocked in.
pub const CSR_DOMAIN: &str = "sys";

fn check_name(name: &str) -> Result<(), BuildError> {
    if is_verilog_identifier(name) {
        Ok(())
    } else {
        Err(BuildError::InvalidName(name.to_string()))
    }
}

/// Mutable state for building one module.
pub struct ModuleBuilder<'a> {
    interner: &'a Interner,
    name: Ident,
    signals: Arena<SignalId, Signal>,
    signal_names: HashMap<Ident, SignalId>,
    ports: Arena<PortId, Port>,
    ported: HashSet<SignalId>,
    cells: Arena<CellId, Cell>,
    cell_names: HashSet<Ident>,
    assignments: Vec<Assignment>,
    domains: Arena<ClockDomainId, ClockDomain>,
    domain_names: HashMap<Ident, ClockDomainId>,
    csr: Vec<CsrField>,
    sources: Vec<String>,
}

impl<'a> ModuleBuilder<'a> {
    /// Starts a new module called `name`.
    pub fn new(interner: &'a Interner, name: &str) -> Self {
        Self {
            interner,
            name: interner.get_or_intern(name),
            signals: Arena::new(),
            signal_names: HashMap::new(),
            ports: Arena::new(),
            ported: HashSet::new(),
            cells: Arena::new(),
            cell_names: HashSet::new(),
            assignments: Vec::new(),
            domains: Arena::new(),
            domain_names: HashMap::new(),
            csr: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Returns the interner names are resolved against.
    pub fn interner(&self) -> &'a Interner {
        self.interner
    }

    /// Returns a signal declared earlier.
    pub fn signal(&self, id: SignalId) -> &Signal {
        &self.signals[id]
    }

    /// Looks up a signal by name.
    pub fn find_signal(&self, name: &str) -> Option<SignalId> {
        self.interner
            .get(name)
            .and_then(|ident| self.signal_names.get(&ident).copied())
    }

    fn declare(&mut self, name: &str, width: u32, kind: SignalKind) -> Result<SignalId, BuildError> {
        check_name(name)?;
        if width == 0 {
            return Err(BuildError::ZeroWidth(name.to_string()));
        }
        let ident = self.interner.get_or_intern(name);
        if self.signal_names.contains_key(&ident) {
            return Err(BuildError::DuplicateName(name.to_string()));
        }
        let id = self.signals.next_id();
        self.signals.alloc(Signal {
            id,
            name: ident,
            width,
            kind,
        });
        self.signal_names.insert(ident, id);
        Ok(id)
    }

    /// Declares an internal combinational net.
    pub fn wire(&mut self, name: &str, width: u32) -> Result<SignalId, BuildError> {
        self.declare(name, width, SignalKind::Wire)
    }

    fn port(&mut self, name: &str, width: u32, direction: PortDirection) -> Result<SignalId, BuildError> {
        let signal = self.declare(name, width, SignalKind::Port)?;
        self.expose(signal, direction)?;
        Ok(signal)
    }

    /// Declares an input port.
    pub fn input(&mut self, name: &str, width: u32) -> Result<SignalId, BuildError> {
        self.port(name, width, PortDirection::Input)
    }

    /// Declares an output port.
    pub fn output(&mut self, name: &str, width: u32) -> Result<SignalId, BuildError> {
        self.port(name, width, PortDirection::Output)
    }

    /// Declares a bidirectional port.
    pub fn inout(&mut self, name: &str, width: u32) -> Result<SignalId, BuildError> {
        self.port(name, width, PortDirection::InOut)
    }

    /// Puts an existing signal on the module boundary under its own name.
    pub fn expose(&mut self, signal: SignalId, direction: PortDirection) -> Result<PortId, BuildError> {
        if !self.ported.insert(signal) {
            return Err(BuildError::AlreadyPort(self.name_of(signal).to_string()));
        }
        let id = self.ports.next_id();
        let name = self.signals[signal].name;
        self.ports.alloc(Port {
            id,
            name,
            direction,
            signal,
        });
        Ok(id)
    }

    fn name_of(&self, signal: SignalId) -> &'a str {
        self.interner.resolve(self.signals[signal].name)
    }

    fn add_domain(&mut self, name: &str, origin: DomainOrigin) -> Result<ClockDomainId, BuildError> {
        check_name(name)?;
        let ident = self.interner.get_or_intern(name);
        if self.domain_names.contains_key(&ident) {
            return Err(BuildError::DuplicateName(name.to_string()));
        }
        let direction = match origin {
            DomainOrigin::Local => PortDirection::Output,
            DomainOrigin::Imported => PortDirection::Input,
        };
        let clock = self.port(&format!("{name}_clk"), 1, direction)?;
        let reset = self.port(&format!("{name}_rst"), 1, direction)?;
        let id = self.domains.next_id();
        self.domains.alloc(ClockDomain {
            id,
            name: ident,
            clock,
            reset,
            origin,
        });
        self.domain_names.insert(ident, id);
        debug!(domain = name, ?origin, "clock domain declared");
        Ok(id)
    }

    /// Creates a clock domain driven by this module.
    ///
    /// The clock and reset become output ports `<name>_clk` and `<name>_rst`;
    /// the caller must drive both.
    pub fn local_domain(&mut self, name: &str) -> Result<ClockDomainId, BuildError> {
        self.add_domain(name, DomainOrigin::Local)
    }

    /// References a clock domain supplied by the integrator.
    ///
    /// Importing the same name again returns the existing domain.
    pub fn import_domain(&mut self, name: &str) -> Result<ClockDomainId, BuildError> {
        if let Some(id) = self
            .interner
            .get(name)
            .and_then(|ident| self.domain_names.get(&ident).copied())
        {
            return Ok(id);
        }
        self.add_domain(name, DomainOrigin::Imported)
    }

    /// Declares only the input clock `<name>_clk` of an integrator domain.
    ///
    /// No domain record and no reset port are created. If the domain was
    /// already imported, its clock is returned.
    pub fn import_clock(&mut self, name: &str) -> Result<SignalId, BuildError> {
        if let Some(id) = self
            .interner
            .get(name)
            .and_then(|ident| self.domain_names.get(&ident).copied())
        {
            return Ok(self.domains[id].clock);
        }
        self.input(&format!("{name}_clk"), 1)
    }

    /// Returns the clock signal of a domain.
    pub fn clock(&self, domain: ClockDomainId) -> SignalId {
        self.domains[domain].clock
    }

    /// Returns the reset signal of a domain.
    pub fn reset(&self, domain: ClockDomainId) -> SignalId {
        self.domains[domain].reset
    }

    /// Adds the continuous assignment `target = value`.
    pub fn assign(&mut self, target: impl Into<SignalRef>, value: Expr) {
        self.assignments.push(Assignment {
            target: target.into(),
            value,
        });
    }

    fn claim_cell_name(&mut self, name: &str) -> Result<Ident, BuildError> {
        check_name(name)?;
        let ident = self.interner.get_or_intern(name);
        if !self.cell_names.insert(ident) {
            return Err(BuildError::DuplicateName(name.to_string()));
        }
        Ok(ident)
    }

    fn add_cell(&mut self, name: Ident, kind: CellKind, connections: Vec<Connection>) -> CellId {
        let id = self.cells.next_id();
        self.cells.alloc(Cell {
            id,
            name,
            kind,
            connections,
        });
        id
    }

    fn connection(&self, port: &str, direction: PortDirection, signal: SignalRef) -> Connection {
        Connection {
            port_name: self.interner.get_or_intern(port),
            direction,
            signal,
        }
    }

    /// Starts an instance `name` of the external block `module`.
    pub fn instance<'b>(&'b mut self, name: &str, module: &str) -> InstanceBuilder<'b, 'a> {
        let module = self.interner.get_or_intern(module);
        InstanceBuilder {
            name: name.to_string(),
            module,
            params: Vec::new(),
            connections: Vec::new(),
            builder: self,
        }
    }

    /// Adds a single-bit tristate buffer.
    ///
    /// `pad` is driven with `o` while `oe` is high and floats otherwise;
    /// `i` always reads the pad.
    pub fn tristate(
        &mut self,
        name: &str,
        pad: impl Into<SignalRef>,
        o: impl Into<SignalRef>,
        oe: impl Into<SignalRef>,
        i: impl Into<SignalRef>,
    ) -> Result<CellId, BuildError> {
        let ident = self.claim_cell_name(name)?;
        let connections = vec![
            self.connection(TRISTATE_PAD, PortDirection::InOut, pad.into()),
            self.connection(TRISTATE_O, PortDirection::Input, o.into()),
            self.connection(TRISTATE_OE, PortDirection::Input, oe.into()),
            self.connection(TRISTATE_I, PortDirection::Output, i.into()),
        ];
        Ok(self.add_cell(ident, CellKind::Tristate, connections))
    }

    /// Adds a `stages`-deep synchronizer carrying `i` into `domain` as `o`.
    pub fn multi_reg(
        &mut self,
        name: &str,
        i: impl Into<SignalRef>,
        o: impl Into<SignalRef>,
        domain: ClockDomainId,
        stages: u32,
    ) -> Result<CellId, BuildError> {
        if stages < 2 {
            return Err(BuildError::TooFewStages {
                name: name.to_string(),
                stages,
            });
        }
        let ident = self.claim_cell_name(name)?;
        let connections = vec![
            self.connection(MULTIREG_I, PortDirection::Input, i.into()),
            self.connection(MULTIREG_O, PortDirection::Output, o.into()),
        ];
        Ok(self.add_cell(ident, CellKind::MultiReg { domain, stages }, connections))
    }

    /// Declares a register field at the next free CSR address.
    ///
    /// Host-writable fields get a register `<name>_storage` owned by the
    /// bank. Read-only fields get a wire `<name>_status` that the caller
    /// must drive. Returns the backing signal.
    pub fn csr(&mut self, name: &str, width: u32, access: CsrAccess) -> Result<SignalId, BuildError> {
        check_name(name)?;
        if width > CSR_DATA_WIDTH {
            return Err(BuildError::CsrTooWide {
                name: name.to_string(),
                width,
                max: CSR_DATA_WIDTH,
            });
        }
        let ident = self.interner.get_or_intern(name);
        if self.csr.iter().any(|f| f.name == ident) {
            return Err(BuildError::DuplicateName(name.to_string()));
        }
        let signal = if access.host_writable() {
            self.declare(&format!("{name}_storage"), width, SignalKind::Reg)?
        } else {
            self.declare(&format!("{name}_status"), width, SignalKind::Wire)?
        };
        let address = self.csr.len() as u32;
        self.csr.push(CsrField {
            name: ident,
            address,
            width,
            access,
            signal,
        });
        debug!(field = name, address, %access, "csr field declared");
        Ok(signal)
    }

    /// Records an external HDL source file the module depends on.
    pub fn add_source(&mut self, path: &str) {
        if !self.sources.iter().any(|s| s == path) {
            self.sources.push(path.to_string());
        }
    }

    fn check_ref(&self, r: &SignalRef) -> Result<(), BuildError> {
        let (signal, high, low) = match r {
            SignalRef::Signal(_) | SignalRef::Const(_) => return Ok(()),
            SignalRef::Bit { signal, index } => (*signal, *index, *index),
            SignalRef::Slice { signal, high, low } => (*signal, *high, *low),
        };
        if high < low {
            return Err(BuildError::ReversedSlice {
                signal: self.name_of(signal).to_string(),
                high,
                low,
            });
        }
        let width = self.signals[signal].width;
        if high >= width {
            return Err(BuildError::BitOutOfRange {
                signal: self.name_of(signal).to_string(),
                index: high,
                width,
            });
        }
        Ok(())
    }

    fn check_refs(&self) -> Result<(), BuildError> {
        for a in &self.assignments {
            self.check_ref(&a.target)?;
            let mut result = Ok(());
            a.value.for_each_ref(&mut |r| {
                if result.is_ok() {
                    result = self.check_ref(r);
                }
            });
            result?;
        }
        for cell in self.cells.values() {
            for c in &cell.connections {
                self.check_ref(&c.signal)?;
            }
        }
        Ok(())
    }

    fn build_csr_bus(&mut self) -> Result<Option<CsrBus>, BuildError> {
        if self.csr.is_empty() {
            return Ok(None);
        }
        let domain = self.import_domain(CSR_DOMAIN)?;
        let adr_width = address_width(self.csr.len());
        Ok(Some(CsrBus {
            adr: self.input("csr_adr", adr_width)?,
            we: self.input("csr_we", 1)?,
            dat_w: self.input("csr_dat_w", CSR_DATA_WIDTH)?,
            dat_r: self.output("csr_dat_r", CSR_DATA_WIDTH)?,
            domain,
        }))
    }

    /// Validates every signal reference and freezes the module.
    pub fn finish(mut self) -> Result<Module, BuildError> {
        check_name(self.interner.resolve(self.name))?;
        self.check_refs()?;
        let csr_bus = self.build_csr_bus()?;
        debug!(
            module = self.interner.resolve(self.name),
            signals = self.signals.len(),
            ports = self.ports.len(),
            cells = self.cells.len(),
            csr_fields = self.csr.len(),
            "module finished"
        );
        Ok(Module {
            name: self.name,
            ports: self.ports,
            signals: self.signals,
            cells: self.cells,
            assignments: self.assignments,
            clock_domains: self.domains,
            csr: self.csr,
            csr_bus,
            sources: self.sources,
        })
    }
}

/// Collects the parameters and port bindings of one external instance.
///
/// Created by [`ModuleBuilder::instance`]; nothing is added to the module
/// until [`finish`](InstanceBuilder::finish) is called.
pub struct InstanceBuilder<'b, 'a> {
    builder: &'b mut ModuleBuilder<'a>,
    name: String,
    module: Ident,
    params: Vec<(Ident, ConstValue)>,
    connections: Vec<Connection>,
}

impl InstanceBuilder<'_, '_> {
    /// Sets parameter `name`.
    pub fn param(mut self, name: &str, value: impl Into<ConstValue>) -> Self {
        let name = self.builder.interner.get_or_intern(name);
        self.params.push((name, value.into()));
        self
    }

    fn bind(mut self, port: &str, direction: PortDirection, signal: SignalRef) -> Self {
        let c = self.builder.connection(port, direction, signal);
        self.connections.push(c);
        self
    }

    /// Binds an instance input.
    pub fn input(self, port: &str, signal: impl Into<SignalRef>) -> Self {
        self.bind(port, PortDirection::Input, signal.into())
    }

    /// Binds an instance output.
    pub fn output(self, port: &str, signal: impl Into<SignalRef>) -> Self {
        self.bind(port, PortDirection::Output, signal.into())
    }

    /// Binds a bidirectional instance port.
    pub fn inout(self, port: &str, signal: impl Into<SignalRef>) -> Self {
        self.bind(port, PortDirection::InOut, signal.into())
    }

    /// Adds the instance to the module.
    pub fn finish(self) -> Result<CellId, BuildError> {
        check_name(self.builder.interner.resolve(self.module))?;
        let name = self.builder.claim_cell_name(&self.name)?;
        debug!(
            instance = %self.name,
            module = self.builder.interner.resolve(self.module),
            connections = self.connections.len(),
            "instance added"
        );
        Ok(self.builder.add_cell(
            name,
            CellKind::Instance {
                module: self.module,
                params: self.params,
            },
            self.connections,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::LogicVec;

    #[test]
    fn duplicate_signal_rejected() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        b.wire("x", 1).unwrap();
        assert_eq!(b.wire("x", 2), Err(BuildError::DuplicateName("x".into())));
    }

    #[test]
    fn invalid_names_rejected() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        assert_eq!(b.wire("pad.ad", 1), Err(BuildError::InvalidName("pad.ad".into())));
        assert_eq!(b.input("reg", 1), Err(BuildError::InvalidName("reg".into())));
        assert!(matches!(
            b.instance("u0", "2BUF").finish(),
            Err(BuildError::InvalidName(_))
        ));
        assert!(matches!(
            ModuleBuilder::new(&interner, "module").finish(),
            Err(BuildError::InvalidName(_))
        ));
    }

    #[test]
    fn zero_width_rejected() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        assert_eq!(b.input("x", 0), Err(BuildError::ZeroWidth("x".into())));
    }

    #[test]
    fn local_domain_exports_ports() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let d = b.local_domain("pix").unwrap();
        let m = b.finish().unwrap();
        let clk = m.find_port(interner.get_or_intern("pix_clk")).unwrap();
        let rst = m.find_port(interner.get_or_intern("pix_rst")).unwrap();
        assert_eq!(clk.direction, PortDirection::Output);
        assert_eq!(rst.direction, PortDirection::Output);
        assert_eq!(m.clock_domains[d].origin, DomainOrigin::Local);
    }

    #[test]
    fn import_domain_is_idempotent() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let a = b.import_domain("sys").unwrap();
        let c = b.import_domain("sys").unwrap();
        assert_eq!(a, c);
        let m = b.finish().unwrap();
        assert_eq!(m.clock_domains.len(), 1);
        let clk = m.find_port(interner.get_or_intern("sys_clk")).unwrap();
        assert_eq!(clk.direction, PortDirection::Input);
    }

    #[test]
    fn import_clock_has_no_reset() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let clk = b.import_clock("bclk").unwrap();
        let sys = b.import_domain("sys").unwrap();
        assert_eq!(b.import_clock("sys").unwrap(), b.clock(sys));
        let m = b.finish().unwrap();
        assert_eq!(m.clock_domains.len(), 1);
        let port = m.find_port(interner.get_or_intern("bclk_clk")).unwrap();
        assert_eq!(port.signal, clk);
        assert_eq!(port.direction, PortDirection::Input);
        assert!(m.find_port(interner.get_or_intern("bclk_rst")).is_none());
    }

    #[test]
    fn local_domain_twice_rejected() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        b.local_domain("pix").unwrap();
        assert!(matches!(b.local_domain("pix"), Err(BuildError::DuplicateName(_))));
    }

    #[test]
    fn instance_records_params_and_connections() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let i = b.input("i", 1).unwrap();
        let o = b.output("o", 1).unwrap();
        let cell = b
            .instance("bufg0", "BUFG")
            .param("INIT", 0u32)
            .input("I", i)
            .output("O", o)
            .finish()
            .unwrap();
        let m = b.finish().unwrap();
        let c = &m.cells[cell];
        assert_eq!(interner.resolve(c.instance_of().unwrap()), "BUFG");
        assert_eq!(c.connections.len(), 2);
        assert_eq!(
            c.param(interner.get_or_intern("INIT")),
            Some(&ConstValue::Int(0))
        );
    }

    #[test]
    fn duplicate_cell_name_rejected() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        b.instance("u0", "BUFG").finish().unwrap();
        assert!(matches!(
            b.instance("u0", "BUFG").finish(),
            Err(BuildError::DuplicateName(_))
        ));
    }

    #[test]
    fn out_of_range_bit_rejected_at_finish() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let x = b.wire("x", 4).unwrap();
        b.assign(
            SignalRef::Bit { signal: x, index: 4 },
            Expr::Ref(SignalRef::Const(LogicVec::zero(1))),
        );
        assert!(matches!(
            b.finish(),
            Err(BuildError::BitOutOfRange { index: 4, width: 4, .. })
        ));
    }

    #[test]
    fn reversed_slice_rejected_at_finish() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let x = b.wire("x", 8).unwrap();
        let y = b.wire("y", 8).unwrap();
        b.assign(
            y,
            Expr::Ref(SignalRef::Slice {
                signal: x,
                high: 1,
                low: 5,
            }),
        );
        assert!(matches!(b.finish(), Err(BuildError::ReversedSlice { .. })));
    }

    #[test]
    fn multi_reg_needs_two_stages() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let d = b.import_domain("sys").unwrap();
        let i = b.input("a", 1).unwrap();
        let o = b.output("b", 1).unwrap();
        assert!(matches!(
            b.multi_reg("sync", i, o, d, 1),
            Err(BuildError::TooFewStages { stages: 1, .. })
        ));
        assert!(b.multi_reg("sync", i, o, d, 2).is_ok());
    }

    #[test]
    fn csr_fields_get_sequential_addresses_and_a_bus() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let storage = b.csr("pll_reset", 1, CsrAccess::WriteOnly).unwrap();
        let status = b.csr("locked", 1, CsrAccess::ReadOnly).unwrap();
        assert_eq!(b.signal(storage).kind, SignalKind::Reg);
        assert_eq!(b.signal(status).kind, SignalKind::Wire);
        let m = b.finish().unwrap();

        let addrs: Vec<u32> = m.csr.iter().map(|f| f.address).collect();
        assert_eq!(addrs, vec![0, 1]);
        let bus = m.csr_bus.as_ref().unwrap();
        assert_eq!(m.signals[bus.adr].width, 1);
        assert_eq!(m.signals[bus.dat_r].width, CSR_DATA_WIDTH);
        assert_eq!(
            interner.resolve(m.clock_domains[bus.domain].name),
            CSR_DOMAIN
        );
    }

    #[test]
    fn csr_too_wide_rejected() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        assert!(matches!(
            b.csr("wide", 9, CsrAccess::ReadWrite),
            Err(BuildError::CsrTooWide { width: 9, .. })
        ));
    }

    #[test]
    fn no_csr_means_no_bus() {
        let interner = Interner::new();
        let b = ModuleBuilder::new(&interner, "top");
        let m = b.finish().unwrap();
        assert!(m.csr_bus.is_none());
        assert!(m.clock_domains.is_empty());
    }

    #[test]
    fn sources_are_deduplicated() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        b.add_source("cpuif.v");
        b.add_source("cpuif.v");
        let m = b.finish().unwrap();
        assert_eq!(m.sources, vec!["cpuif.v".to_string()]);
    }

    #[test]
    fn expose_twice_rejected() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let w = b.wire("w", 1).unwrap();
        b.expose(w, PortDirection::Output).unwrap();
        assert_eq!(
            b.expose(w, PortDirection::Output),
            Err(BuildError::AlreadyPort("w".into()))
        );
    }
}
