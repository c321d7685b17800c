//! Driver and consumer analysis shared by the lint rules.

use weft_common::Interner;
use weft_netlist::{CellKind, Module, PortDirection, SignalId, SignalRef};

/// Something that drives bits of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// An input or inout port of the module.
    Port,
    /// An output connection of a cell.
    Cell(weft_netlist::CellId),
    /// The continuous assignment at this index.
    Assignment(usize),
    /// The CSR bank (register storage or read data).
    CsrBank,
}

impl Driver {
    /// Describes the driver for diagnostic notes.
    pub fn describe(self, module: &Module, interner: &Interner) -> String {
        match self {
            Driver::Port => "the module port".to_string(),
            Driver::Cell(id) => format!("cell '{}'", interner.resolve(module.cells[id].name)),
            Driver::Assignment(i) => format!("assignment #{i}"),
            Driver::CsrBank => "the CSR bank".to_string(),
        }
    }
}

/// How one signal is driven and consumed.
#[derive(Debug, Clone, Default)]
pub struct SignalUsage {
    /// Drivers of each bit, LSB first.
    pub drivers: Vec<Vec<Driver>>,
    /// `true` if anything reads any bit of the signal.
    pub consumed: bool,
}

impl SignalUsage {
    /// Returns the indices of bits with no driver.
    pub fn undriven_bits(&self) -> Vec<u32> {
        self.bits_where(|d| d.is_empty())
    }

    /// Returns the indices of bits with more than one driver.
    pub fn conflicting_bits(&self) -> Vec<u32> {
        self.bits_where(|d| d.len() > 1)
    }

    fn bits_where(&self, f: impl Fn(&[Driver]) -> bool) -> Vec<u32> {
        self.drivers
            .iter()
            .enumerate()
            .filter(|(_, d)| f(d))
            .map(|(i, _)| i as u32)
            .collect()
    }
}

struct Collector<'m> {
    module: &'m Module,
    usage: Vec<SignalUsage>,
}

impl Collector<'_> {
    fn entry(&mut self, id: SignalId) -> Option<&mut SignalUsage> {
        self.usage.get_mut(id.index())
    }

    fn drive(&mut self, r: &SignalRef, driver: Driver) {
        let Some(id) = r.signal() else { return };
        let Some(width) = self.module.signals.try_get(id).map(|s| s.width) else {
            return;
        };
        if let Some(entry) = self.entry(id) {
            for bit in r.bits(width) {
                if let Some(slot) = entry.drivers.get_mut(bit as usize) {
                    slot.push(driver);
                }
            }
        }
    }

    fn consume(&mut self, r: &SignalRef) {
        if let Some(entry) = r.signal().and_then(|id| self.entry(id)) {
            entry.consumed = true;
        }
    }
}

/// Computes per-bit drivers and consumption for every signal of `module`.
///
/// The result is indexed by raw [`SignalId`]. Inout connections and inout
/// ports count as both driver and consumer only at the port: a tristate pad
/// is a resolved net, so the cells attached to it do not drive it.
pub fn analyze_usage(module: &Module) -> Vec<SignalUsage> {
    let usage = module
        .signals
        .values()
        .map(|s| SignalUsage {
            drivers: vec![Vec::new(); s.width as usize],
            consumed: false,
        })
        .collect();
    let mut c = Collector { module, usage };

    for port in module.ports.values() {
        let r = SignalRef::Signal(port.signal);
        match port.direction {
            PortDirection::Input => c.drive(&r, Driver::Port),
            PortDirection::Output => c.consume(&r),
            PortDirection::InOut => {
                c.drive(&r, Driver::Port);
                c.consume(&r);
            }
        }
    }

    for (id, cell) in module.cells.iter() {
        for conn in &cell.connections {
            match conn.direction {
                PortDirection::Output => c.drive(&conn.signal, Driver::Cell(id)),
                PortDirection::Input | PortDirection::InOut => c.consume(&conn.signal),
            }
        }
        if let CellKind::MultiReg { domain, .. } = &cell.kind {
            if let Some(d) = module.clock_domains.try_get(*domain) {
                c.consume(&SignalRef::Signal(d.clock));
            }
        }
    }

    for (i, a) in module.assignments.iter().enumerate() {
        c.drive(&a.target, Driver::Assignment(i));
        a.value.for_each_ref(&mut |r| c.consume(r));
    }

    for field in &module.csr {
        let r = SignalRef::Signal(field.signal);
        if field.access.host_writable() {
            c.drive(&r, Driver::CsrBank);
        }
        c.consume(&r);
    }
    if let Some(bus) = &module.csr_bus {
        for input in [bus.adr, bus.we, bus.dat_w] {
            c.consume(&SignalRef::Signal(input));
        }
        c.drive(&SignalRef::Signal(bus.dat_r), Driver::CsrBank);
        if let Some(d) = module.clock_domains.try_get(bus.domain) {
            c.consume(&SignalRef::Signal(d.clock));
            c.consume(&SignalRef::Signal(d.reset));
        }
    }

    c.usage
}

/// Formats bit indices as compact Verilog-style ranges, highest first.
///
/// `[0, 1, 2, 5]` becomes `"[5], [2:0]"`.
pub fn bit_ranges(bits: &[u32]) -> String {
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for &b in bits {
        match ranges.last_mut() {
            Some((_, high)) if *high + 1 == b => *high = b,
            _ => ranges.push((b, b)),
        }
    }
    ranges
        .iter()
        .rev()
        .map(|&(low, high)| {
            if low == high {
                format!("[{low}]")
            } else {
                format!("[{high}:{low}]")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::LogicVec;
    use weft_netlist::{CsrAccess, Expr, ModuleBuilder};

    #[test]
    fn bit_ranges_compacts() {
        assert_eq!(bit_ranges(&[0, 1, 2, 5]), "[5], [2:0]");
        assert_eq!(bit_ranges(&[7]), "[7]");
        assert_eq!(bit_ranges(&[]), "");
    }

    #[test]
    fn ports_and_assignments() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let a = b.input("a", 2).unwrap();
        let y = b.output("y", 2).unwrap();
        b.assign(y, Expr::signal(a).not());
        let m = b.finish().unwrap();
        let usage = analyze_usage(&m);

        let ua = &usage[a.index()];
        assert!(ua.consumed);
        assert!(ua.undriven_bits().is_empty());
        let uy = &usage[y.index()];
        assert!(uy.consumed);
        assert_eq!(uy.drivers[1], vec![Driver::Assignment(0)]);
    }

    #[test]
    fn bitwise_drivers_are_tracked() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let w = b.output("w", 4).unwrap();
        b.assign(
            SignalRef::Slice {
                signal: w,
                high: 1,
                low: 0,
            },
            Expr::Ref(SignalRef::Const(LogicVec::zero(2))),
        );
        b.assign(
            SignalRef::Bit { signal: w, index: 1 },
            Expr::Ref(SignalRef::Const(LogicVec::zero(1))),
        );
        let m = b.finish().unwrap();
        let u = &analyze_usage(&m)[w.index()];
        assert_eq!(u.undriven_bits(), vec![2, 3]);
        assert_eq!(u.conflicting_bits(), vec![1]);
    }

    #[test]
    fn csr_bank_drives_storage_and_reads_status() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let storage = b.csr("ctrl", 1, CsrAccess::WriteOnly).unwrap();
        let status = b.csr("stat", 1, CsrAccess::ReadOnly).unwrap();
        let m = b.finish().unwrap();
        let usage = analyze_usage(&m);
        assert_eq!(
            usage[storage.index()].drivers[0],
            vec![Driver::CsrBank]
        );
        assert!(usage[status.index()].consumed);
        assert_eq!(usage[status.index()].undriven_bits(), vec![0]);
    }
}
