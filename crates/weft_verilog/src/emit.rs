//! Verilog text emitter.
//!
//! # Layout
//!
//! ```text
//! module <name> (ports);
//! wire/reg declarations
//! continuous assignments
//! instances, tristate pads, synchronizer chains
//! CSR bank
//! endmodule
//! ```

use tracing::debug;
use weft_common::{Interner, LogicVec};
use weft_netlist::{
    Cell, CellKind, CsrBus, Expr, Module, SignalKind, SignalRef, CSR_DATA_WIDTH,
};

/// Returns the file name a module is emitted to.
pub fn file_name(module: &Module, interner: &Interner) -> String {
    format!("{}.v", interner.resolve(module.name))
}

struct Writer<'a> {
    module: &'a Module,
    interner: &'a Interner,
    out: String,
}

impl<'a> Writer<'a> {
    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn name(&self, ident: weft_common::Ident) -> &'a str {
        self.interner.resolve(ident)
    }

    fn signal_name(&self, id: weft_netlist::SignalId) -> &'a str {
        self.name(self.module.signals[id].name)
    }

    fn range(width: u32) -> String {
        if width == 1 {
            String::new()
        } else {
            format!("[{}:0] ", width - 1)
        }
    }

    fn literal(v: &LogicVec) -> String {
        match v.to_u64() {
            Some(n) => format!("{}'d{n}", v.width()),
            None => format!("{}'b{v}", v.width()),
        }
    }

    fn ref_text(&self, r: &SignalRef) -> String {
        match r {
            SignalRef::Signal(id) => self.signal_name(*id).to_string(),
            SignalRef::Bit { signal, index } => {
                let name = self.signal_name(*signal);
                if self.module.signals[*signal].width == 1 {
                    name.to_string()
                } else {
                    format!("{name}[{index}]")
                }
            }
            SignalRef::Slice { signal, high, low } => {
                let name = self.signal_name(*signal);
                if self.module.signals[*signal].width == 1 {
                    name.to_string()
                } else if high == low {
                    format!("{name}[{low}]")
                } else {
                    format!("{name}[{high}:{low}]")
                }
            }
            SignalRef::Const(v) => Self::literal(v),
        }
    }

    fn expr_text(&self, e: &Expr, nested: bool) -> String {
        let text = match e {
            Expr::Ref(r) => return self.ref_text(r),
            Expr::Not(inner) => return format!("~{}", self.expr_text(inner, true)),
            Expr::And(a, b) => format!("{} & {}", self.expr_text(a, true), self.expr_text(b, true)),
            Expr::Or(a, b) => format!("{} | {}", self.expr_text(a, true), self.expr_text(b, true)),
        };
        if nested {
            format!("({text})")
        } else {
            text
        }
    }

    fn header(&mut self) {
        let m = self.module;
        self.line("/* Machine-generated by weft. Do not edit. */");
        if !m.sources.is_empty() {
            self.line(format!("/* External sources: {} */", m.sources.join(", ")));
        }
        self.blank();
        let name = self.name(m.name);
        if m.ports.is_empty() {
            self.line(format!("module {name};"));
            return;
        }
        self.line(format!("module {name} ("));
        let count = m.ports.len();
        for (i, port) in m.ports.values().enumerate() {
            let width = m.signals[port.signal].width;
            let sep = if i + 1 == count { "" } else { "," };
            self.line(format!(
                "\t{:<6} wire {}{}{sep}",
                port.direction.keyword(),
                Self::range(width),
                self.name(port.name)
            ));
        }
        self.line(");");
    }

    fn declarations(&mut self) {
        let m = self.module;
        let mut any = false;
        for (id, signal) in m.signals.iter() {
            if m.port_of(id).is_some() {
                continue;
            }
            let range = Self::range(signal.width);
            let name = self.name(signal.name);
            match signal.kind {
                SignalKind::Reg => self.line(format!("reg {range}{name} = {}'d0;", signal.width)),
                SignalKind::Wire | SignalKind::Port => self.line(format!("wire {range}{name};")),
            }
            any = true;
        }
        for cell in m.cells.values() {
            if let CellKind::MultiReg { stages, .. } = cell.kind {
                let width = self.multireg_width(cell);
                let cell_name = self.name(cell.name);
                for k in 0..stages {
                    self.line(format!(
                        "(* ASYNC_REG = \"TRUE\" *) reg {}{cell_name}_reg{k} = {width}'d0;",
                        Self::range(width)
                    ));
                }
                any = true;
            }
        }
        if any {
            self.blank();
        }
    }

    fn multireg_width(&self, cell: &Cell) -> u32 {
        cell.connections
            .first()
            .map_or(1, |c| self.module.ref_width(&c.signal))
    }

    fn connection_text(&self, cell: &Cell, port: &str) -> Option<String> {
        let ident = self.interner.get(port)?;
        cell.connection(ident).map(|c| self.ref_text(&c.signal))
    }

    fn assignments(&mut self) {
        let m = self.module;
        for a in &m.assignments {
            let lhs = self.ref_text(&a.target);
            let rhs = self.expr_text(&a.value, false);
            self.line(format!("assign {lhs} = {rhs};"));
        }
        if !m.assignments.is_empty() {
            self.blank();
        }
    }

    fn instance(&mut self, cell: &Cell, module: weft_common::Ident, params: &[(weft_common::Ident, weft_netlist::ConstValue)]) {
        let block = self.name(module);
        let name = self.name(cell.name);
        if params.is_empty() {
            self.line(format!("{block} {name} ("));
        } else {
            self.line(format!("{block} #("));
            for (i, (param, value)) in params.iter().enumerate() {
                let sep = if i + 1 == params.len() { "" } else { "," };
                self.line(format!("\t.{}({value}){sep}", self.name(*param)));
            }
            self.line(format!(") {name} ("));
        }
        let count = cell.connections.len();
        for (i, c) in cell.connections.iter().enumerate() {
            let sep = if i + 1 == count { "" } else { "," };
            self.line(format!(
                "\t.{}({}){sep}",
                self.name(c.port_name),
                self.ref_text(&c.signal)
            ));
        }
        self.line(");");
        self.blank();
    }

    fn tristate(&mut self, cell: &Cell) {
        use weft_netlist::cell::{TRISTATE_I, TRISTATE_O, TRISTATE_OE, TRISTATE_PAD};
        let (Some(pad), Some(o), Some(oe), Some(i)) = (
            self.connection_text(cell, TRISTATE_PAD),
            self.connection_text(cell, TRISTATE_O),
            self.connection_text(cell, TRISTATE_OE),
            self.connection_text(cell, TRISTATE_I),
        ) else {
            return;
        };
        self.line(format!("assign {pad} = {oe} ? {o} : 1'bz;"));
        self.line(format!("assign {i} = {pad};"));
    }

    fn multi_reg(&mut self, cell: &Cell, domain: weft_netlist::ClockDomainId, stages: u32) {
        use weft_netlist::cell::{MULTIREG_I, MULTIREG_O};
        let (Some(input), Some(output)) = (
            self.connection_text(cell, MULTIREG_I),
            self.connection_text(cell, MULTIREG_O),
        ) else {
            return;
        };
        let Some(d) = self.module.clock_domains.try_get(domain) else {
            return;
        };
        let clk = self.signal_name(d.clock);
        let name = self.name(cell.name);
        self.line(format!("always @(posedge {clk}) begin"));
        self.line(format!("\t{name}_reg0 <= {input};"));
        for k in 1..stages {
            self.line(format!("\t{name}_reg{k} <= {name}_reg{};", k - 1));
        }
        self.line("end");
        self.line(format!("assign {output} = {name}_reg{};", stages - 1));
        self.blank();
    }

    fn cells(&mut self) {
        let m = self.module;
        let mut pads = false;
        for cell in m.cells.values() {
            match &cell.kind {
                CellKind::Instance { module, params } => self.instance(cell, *module, params),
                CellKind::Tristate => {
                    self.tristate(cell);
                    pads = true;
                }
                CellKind::MultiReg { domain, stages } => self.multi_reg(cell, *domain, *stages),
            }
        }
        if pads {
            self.blank();
        }
    }

    fn csr_bank(&mut self, bus: &CsrBus) {
        let m = self.module;
        let Some(d) = m.clock_domains.try_get(bus.domain) else {
            return;
        };
        let clk = self.signal_name(d.clock);
        let rst = self.signal_name(d.reset);
        let adr = self.signal_name(bus.adr);
        let adr_width = m.signals[bus.adr].width;
        let we = self.signal_name(bus.we);
        let dat_w = self.signal_name(bus.dat_w);
        let dat_r = self.signal_name(bus.dat_r);

        let writable: Vec<_> = m.csr.iter().filter(|f| f.access.host_writable()).collect();
        if !writable.is_empty() {
            self.line(format!("always @(posedge {clk}) begin"));
            self.line(format!("\tif ({rst}) begin"));
            for f in &writable {
                self.line(format!("\t\t{} <= {}'d0;", self.signal_name(f.signal), f.width));
            }
            self.line(format!("\tend else if ({we}) begin"));
            self.line(format!("\t\tcase ({adr})"));
            for f in &writable {
                let data = if f.width == 1 {
                    format!("{dat_w}[0]")
                } else {
                    format!("{dat_w}[{}:0]", f.width - 1)
                };
                self.line(format!(
                    "\t\t\t{adr_width}'d{}: {} <= {data};",
                    f.address,
                    self.signal_name(f.signal)
                ));
            }
            self.line("\t\tendcase");
            self.line("\tend");
            self.line("end");
        }

        let mut read = format!("{CSR_DATA_WIDTH}'d0");
        for f in m.csr.iter().rev().filter(|f| f.access.host_readable()) {
            let value = self.signal_name(f.signal);
            let padded = if f.width == CSR_DATA_WIDTH {
                value.to_string()
            } else {
                format!("{{{}'d0, {value}}}", CSR_DATA_WIDTH - f.width)
            };
            read = format!("({adr} == {adr_width}'d{}) ? {padded} : {read}", f.address);
        }
        self.line(format!("assign {dat_r} = {read};"));
        self.blank();
    }
}

/// Renders `module` as Verilog source text.
pub fn emit_module(module: &Module, interner: &Interner) -> String {
    let mut w = Writer {
        module,
        interner,
        out: String::new(),
    };
    w.header();
    w.blank();
    w.declarations();
    w.assignments();
    w.cells();
    if let Some(bus) = &module.csr_bus {
        w.csr_bank(bus);
    }
    w.line("endmodule");
    debug!(
        module = interner.resolve(module.name),
        bytes = w.out.len(),
        "verilog emitted"
    );
    w.out
}
