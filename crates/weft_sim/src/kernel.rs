//! The cycle-level simulator.

use tracing::{debug, trace};
use weft_common::{Ident, Interner, Logic, LogicVec};
use weft_netlist::cell::{MULTIREG_I, MULTIREG_O, TRISTATE_I, TRISTATE_O, TRISTATE_OE, TRISTATE_PAD};
use weft_netlist::{
    Cell, CellKind, ClockDomainId, CsrBus, CsrField, Module, PortDirection, SignalId, SignalRef,
    CSR_DATA_WIDTH,
};

use crate::error::SimError;
use crate::evaluator::{drive_ref, eval_expr, fit, read_ref};

/// Interned names of the built-in cell ports.
struct CellPorts {
    pad: Ident,
    o: Ident,
    oe: Ident,
    i: Ident,
    mr_i: Ident,
    mr_o: Ident,
}

impl CellPorts {
    fn new(interner: &Interner) -> Self {
        Self {
            pad: interner.get_or_intern(TRISTATE_PAD),
            o: interner.get_or_intern(TRISTATE_O),
            oe: interner.get_or_intern(TRISTATE_OE),
            i: interner.get_or_intern(TRISTATE_I),
            mr_i: interner.get_or_intern(MULTIREG_I),
            mr_o: interner.get_or_intern(MULTIREG_O),
        }
    }
}

/// Evaluates one module cycle by cycle.
///
/// Signals driven from outside the module (input and inout ports, and the
/// outputs of external instances) start as `x` (`z` for inout pads) and are
/// set with [`poke`](Self::poke). Synchronizer flops and CSR storage start
/// at zero. Every mutating call re-settles the combinational logic, so
/// [`peek`](Self::peek) always observes a stable state.
pub struct Simulator<'m> {
    module: &'m Module,
    interner: &'m Interner,
    ports: CellPorts,
    values: Vec<LogicVec>,
    external: Vec<LogicVec>,
    pokeable: Vec<Vec<bool>>,
    stages: Vec<Vec<LogicVec>>,
    storage: Vec<LogicVec>,
    cycles: Vec<u64>,
}

impl<'m> Simulator<'m> {
    /// Creates a simulator for `module` and settles its initial state.
    pub fn new(module: &'m Module, interner: &'m Interner) -> Result<Self, SimError> {
        let n = module.signals.len();
        let mut external: Vec<LogicVec> = module
            .signals
            .values()
            .map(|s| LogicVec::filled(s.width, Logic::Z))
            .collect();
        let mut pokeable: Vec<Vec<bool>> = module
            .signals
            .values()
            .map(|s| vec![false; s.width as usize])
            .collect();

        let mut mark = |r: &SignalRef, initial: Logic| {
            let Some(id) = r.signal() else { return };
            let width = module.signals[id].width;
            let idx = id.index();
            for bit in r.bits(width) {
                pokeable[idx][bit as usize] = true;
                external[idx].set(bit, initial);
            }
        };
        for port in module.ports.values() {
            let r = SignalRef::Signal(port.signal);
            match port.direction {
                PortDirection::Input => mark(&r, Logic::X),
                PortDirection::InOut => mark(&r, Logic::Z),
                PortDirection::Output => {}
            }
        }
        for cell in module.cells.values() {
            if let CellKind::Instance { .. } = cell.kind {
                for conn in &cell.connections {
                    if conn.direction == PortDirection::Output {
                        mark(&conn.signal, Logic::X);
                    }
                }
            }
        }

        let ports = CellPorts::new(interner);
        let stages = module
            .cells
            .values()
            .map(|cell| match cell.kind {
                CellKind::MultiReg { stages, .. } => {
                    let width = cell
                        .connection(ports.mr_o)
                        .map_or(1, |c| module.ref_width(&c.signal));
                    vec![LogicVec::zero(width); stages as usize]
                }
                _ => Vec::new(),
            })
            .collect();
        let storage = module
            .csr
            .iter()
            .map(|f| {
                if f.access.host_writable() {
                    LogicVec::zero(f.width)
                } else {
                    LogicVec::zero(0)
                }
            })
            .collect();

        let mut sim = Self {
            module,
            interner,
            ports,
            values: module
                .signals
                .values()
                .map(|s| LogicVec::filled(s.width, Logic::Z))
                .collect(),
            external,
            pokeable,
            stages,
            storage,
            cycles: vec![0; module.clock_domains.len()],
        };
        sim.settle()?;
        debug!(
            module = interner.resolve(module.name),
            signals = n,
            "simulator ready"
        );
        Ok(sim)
    }

    /// Looks up a signal by name.
    pub fn signal(&self, name: &str) -> Result<SignalId, SimError> {
        self.interner
            .get(name)
            .and_then(|ident| self.module.find_signal(ident))
            .ok_or_else(|| SimError::UnknownSignal(name.to_string()))
    }

    fn domain(&self, name: &str) -> Result<ClockDomainId, SimError> {
        self.interner
            .get(name)
            .and_then(|ident| self.module.find_domain(ident))
            .map(|d| d.id)
            .ok_or_else(|| SimError::UnknownDomain(name.to_string()))
    }

    fn field(&self, name: &str) -> Result<(usize, &'m CsrField), SimError> {
        let module = self.module;
        self.interner
            .get(name)
            .and_then(|ident| module.csr.iter().enumerate().find(|(_, f)| f.name == ident))
            .ok_or_else(|| SimError::UnknownField(name.to_string()))
    }

    fn bus(&self) -> Result<&'m CsrBus, SimError> {
        self.module.csr_bus.as_ref().ok_or(SimError::NoCsrBus)
    }

    /// Drives an externally driven signal with an integer value.
    pub fn poke(&mut self, name: &str, value: u64) -> Result<(), SimError> {
        let id = self.signal(name)?;
        let width = self.module.signals[id].width;
        self.poke_value(name, LogicVec::from_u64(value, width))
    }

    /// Drives an externally driven signal with a 4-state value.
    ///
    /// Only the bits driven from outside the module change. Poking `z` into
    /// an inout pad releases it.
    pub fn poke_value(&mut self, name: &str, value: LogicVec) -> Result<(), SimError> {
        let id = self.signal(name)?;
        let width = self.module.signals[id].width;
        if value.width() != width {
            return Err(SimError::WidthMismatch {
                signal: name.to_string(),
                expected: width,
                got: value.width(),
            });
        }
        let idx = id.index();
        if !self.pokeable[idx].iter().any(|b| *b) {
            return Err(SimError::NotPokeable(name.to_string()));
        }
        for bit in 0..width {
            if self.pokeable[idx][bit as usize] {
                self.external[idx].set(bit, value.get(bit));
            }
        }
        self.settle()
    }

    /// Returns the current value of a signal.
    pub fn peek(&self, name: &str) -> Result<LogicVec, SimError> {
        let id = self.signal(name)?;
        Ok(self.values[id.index()].clone())
    }

    /// Returns the current value of a signal as an integer.
    pub fn peek_u64(&self, name: &str) -> Result<u64, SimError> {
        let v = self.peek(name)?;
        v.to_u64().ok_or_else(|| SimError::UnknownValue {
            signal: name.to_string(),
            value: v.to_string(),
        })
    }

    /// Returns the number of rising edges applied to a domain.
    pub fn cycles(&self, domain: &str) -> Result<u64, SimError> {
        let id = self.domain(domain)?;
        Ok(self.cycles[id.index()])
    }

    /// Propagates combinational logic until every net is stable.
    pub fn settle(&mut self) -> Result<(), SimError> {
        let limit = self.module.signals.len() + 2;
        for _ in 0..limit {
            let next = self.evaluate();
            if next == self.values {
                return Ok(());
            }
            self.values = next;
        }
        Err(SimError::CombinationalLoop { iterations: limit })
    }

    fn evaluate(&self) -> Vec<LogicVec> {
        let m = self.module;
        let mut next: Vec<LogicVec> = self.external.clone();

        for a in &m.assignments {
            let v = eval_expr(&self.values, &a.value);
            drive_ref(m, &mut next, &a.target, &v);
        }

        for (id, cell) in m.cells.iter() {
            match cell.kind {
                CellKind::Tristate => self.eval_tristate(cell, &mut next),
                CellKind::MultiReg { .. } => {
                    let last = self.stages[id.index()].last();
                    if let (Some(conn), Some(last)) = (cell.connection(self.ports.mr_o), last) {
                        drive_ref(m, &mut next, &conn.signal, last);
                    }
                }
                CellKind::Instance { .. } => {}
            }
        }

        for (field, stored) in m.csr.iter().zip(&self.storage) {
            if field.access.host_writable() {
                drive_ref(m, &mut next, &SignalRef::Signal(field.signal), stored);
            }
        }
        if let Some(bus) = &m.csr_bus {
            let data = self.read_bank(bus);
            drive_ref(m, &mut next, &SignalRef::Signal(bus.dat_r), &data);
        }
        next
    }

    fn eval_tristate(&self, cell: &Cell, next: &mut [LogicVec]) {
        let conn = move |port: Ident| cell.connection(port).map(|c| &c.signal);
        let (Some(pad), Some(o), Some(oe), Some(i)) = (
            conn(self.ports.pad),
            conn(self.ports.o),
            conn(self.ports.oe),
            conn(self.ports.i),
        ) else {
            return;
        };
        let width = self.module.ref_width(pad);
        let drive = match read_ref(&self.values, oe).get(0) {
            Logic::One => fit(&read_ref(&self.values, o), width),
            Logic::Zero => LogicVec::filled(width, Logic::Z),
            Logic::X | Logic::Z => LogicVec::unknown(width),
        };
        drive_ref(self.module, next, pad, &drive);
        drive_ref(self.module, next, i, &read_ref(&self.values, pad));
    }

    fn read_bank(&self, bus: &CsrBus) -> LogicVec {
        let adr = &self.values[bus.adr.index()];
        let Some(adr) = adr.to_u64() else {
            return LogicVec::unknown(CSR_DATA_WIDTH);
        };
        self.module
            .csr
            .iter()
            .find(|f| u64::from(f.address) == adr && f.access.host_readable())
            .map_or_else(
                || LogicVec::zero(CSR_DATA_WIDTH),
                |f| fit(&self.values[f.signal.index()], CSR_DATA_WIDTH),
            )
    }

    /// Applies one rising edge of `domain`'s clock, then settles.
    ///
    /// All flops in the domain sample their inputs before any of them
    /// updates.
    pub fn tick(&mut self, domain: &str) -> Result<(), SimError> {
        let id = self.domain(domain)?;
        self.tick_domain(id)
    }

    fn tick_domain(&mut self, id: ClockDomainId) -> Result<(), SimError> {
        let m = self.module;
        for (cell_id, cell) in m.cells.iter() {
            let CellKind::MultiReg { domain, .. } = cell.kind else {
                continue;
            };
            if domain != id {
                continue;
            }
            let Some(conn) = cell.connection(self.ports.mr_i) else {
                continue;
            };
            let input = read_ref(&self.values, &conn.signal);
            let chain = &mut self.stages[cell_id.index()];
            if !chain.is_empty() {
                let width = chain[0].width();
                chain.pop();
                chain.insert(0, fit(&input, width));
            }
        }

        if let Some(bus) = m.csr_bus.as_ref().filter(|b| b.domain == id) {
            self.clock_bank(bus, m.clock_domains[id].reset);
        }

        self.cycles[id.index()] += 1;
        trace!(
            domain = self.interner.resolve(m.clock_domains[id].name),
            cycle = self.cycles[id.index()],
            "tick"
        );
        self.settle()
    }

    fn clock_bank(&mut self, bus: &CsrBus, reset: SignalId) {
        let reset = self.values[reset.index()].get(0);
        let we = self.values[bus.we.index()].get(0);
        let adr = self.values[bus.adr.index()].to_u64();
        let dat_w = self.values[bus.dat_w.index()].clone();

        for (field, stored) in self.module.csr.iter().zip(self.storage.iter_mut()) {
            if !field.access.host_writable() {
                continue;
            }
            match (reset, we) {
                (Logic::One, _) => *stored = LogicVec::zero(field.width),
                (Logic::Zero, Logic::Zero) => {}
                (Logic::Zero, Logic::One) => match adr {
                    Some(a) if a == u64::from(field.address) => *stored = fit(&dat_w, field.width),
                    Some(_) => {}
                    None => *stored = LogicVec::unknown(field.width),
                },
                _ => *stored = LogicVec::unknown(field.width),
            }
        }
    }

    fn drive_external(&mut self, id: SignalId, value: u64) {
        let width = self.module.signals[id].width;
        self.external[id.index()] = LogicVec::from_u64(value, width);
    }

    /// Performs a host write of `value` to CSR field `name`.
    ///
    /// Drives the bus for one cycle of the bank's domain, then deasserts
    /// the write strobe.
    pub fn csr_write(&mut self, name: &str, value: u64) -> Result<(), SimError> {
        let bus = self.bus()?;
        let (_, field) = self.field(name)?;
        self.drive_external(bus.adr, u64::from(field.address));
        self.drive_external(bus.dat_w, value);
        self.drive_external(bus.we, 1);
        self.settle()?;
        self.tick_domain(bus.domain)?;
        self.drive_external(bus.we, 0);
        self.settle()
    }

    /// Performs a host read of CSR field `name`.
    ///
    /// Write-only fields read as zero.
    pub fn csr_read(&mut self, name: &str) -> Result<u64, SimError> {
        let bus = self.bus()?;
        let (_, field) = self.field(name)?;
        self.drive_external(bus.adr, u64::from(field.address));
        self.drive_external(bus.we, 0);
        self.settle()?;
        let v = &self.values[bus.dat_r.index()];
        v.to_u64().ok_or_else(|| SimError::UnknownValue {
            signal: "csr_dat_r".to_string(),
            value: v.to_string(),
        })
    }
}
