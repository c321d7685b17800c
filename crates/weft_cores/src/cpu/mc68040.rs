//! Wrapper around a physical Motorola 68040 attached through a bus bridge.
//!
//! The processor itself lives off-chip. The hand-written `cpuif` block
//! translates its multiplexed address/data bus into a Wishbone master, and
//! this wrapper instantiates that block, exposes the Wishbone side, and
//! either wires the processor pins to FPGA pads or leaves them on the
//! module boundary for the integrator.

use tracing::debug;
use weft_common::{Interner, LogicVec};
use weft_netlist::{
    ClockDomainId, Expr, Module, ModuleBuilder, PortDirection, SignalId, SignalRef,
};

use super::{CpuCore, CpuInfo, Endianness, IoRegion};
use crate::error::CoreError;
use crate::platform::Platform;
use crate::wishbone::Wishbone;

/// Name of the bridge block and of its instance.
pub const CPUIF_MODULE: &str = "cpuif";
/// External source file implementing the bridge block.
pub const CPUIF_SOURCE: &str = "cpuif.v";
/// Width of the multiplexed address/data bus.
pub const AD_WIDTH: u32 = 32;
/// Compiler flags for software running on the 68040.
pub const GCC_FLAGS: &str = "-march=68040 -D__mc68040__";

/// Metadata for the 68040 family.
pub static MC68040_INFO: CpuInfo = CpuInfo {
    name: "mc68040",
    human_name: "MC68040",
    variants: &["standard"],
    data_width: 32,
    endianness: Endianness::Big,
    gcc_triple: "m68k-elf",
    linker_output_format: "elf32-m68k",
    nop: "nop",
    io_regions: &[IoRegion {
        origin: 0x8000_0000,
        length: 0x8000_0000,
    }],
};

/// Pin-level signals between the bridge and the processor.
///
/// `(name, width, driven by the bridge)`. The bridge port carries the same
/// name as the signal.
const PINS: [(&str, u32, bool); 15] = [
    ("cpu_ad_i", AD_WIDTH, true),
    ("cpu_ad_o", AD_WIDTH, false),
    ("cpu_ad_t", 1, true),
    ("cpu_dir", 1, true),
    ("cpu_oe", 1, true),
    ("cpu_siz", 2, false),
    ("cpu_tt", 2, false),
    ("cpu_rsto", 1, false),
    ("cpu_tip", 1, false),
    ("cpu_ts", 1, false),
    ("cpu_rw", 1, false),
    ("cpu_cdis", 1, true),
    ("cpu_rsti", 1, true),
    ("cpu_irq", 1, true),
    ("cpu_ta", 1, true),
];

/// The first three entries of `PINS` are carried by the tristate
/// address/data pads rather than plain pads.
const AD_PIN_COUNT: usize = 3;

/// Pad request for the processor bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mc68040Pads {
    /// Prefix of the pad port names (`<prefix>_cpu_ad`, `<prefix>_cpu_ta`, ...).
    pub prefix: String,
    /// Number of address/data lines routed to pads.
    pub ad_width: u32,
}

impl Default for Mc68040Pads {
    fn default() -> Self {
        Self {
            prefix: "pad".to_string(),
            ad_width: AD_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pin {
    name: &'static str,
    signal: SignalId,
    bridge_output: bool,
}

/// The 68040 bus bridge under construction.
///
/// Build with [`new`](Self::new), optionally call
/// [`add_pads`](Self::add_pads) and
/// [`set_reset_address`](CpuCore::set_reset_address), then
/// [`finalize`](Self::finalize) into a [`Module`].
pub struct Mc68040<'a> {
    builder: ModuleBuilder<'a>,
    variant: String,
    reset_address: Option<u64>,
    pins: Vec<Pin>,
    ad_i: SignalId,
    ad_o: SignalId,
    ad_t: SignalId,
    reset: SignalId,
    idbus: Wishbone,
    sys: ClockDomainId,
    bclk: SignalId,
    pads: Option<Mc68040Pads>,
}

impl<'a> Mc68040<'a> {
    /// Creates the wrapper and registers the bridge source with `platform`.
    pub fn new(
        interner: &'a Interner,
        platform: &mut Platform,
        variant: &str,
    ) -> Result<Self, CoreError> {
        if !MC68040_INFO.variants.iter().any(|v| *v == variant) {
            return Err(CoreError::UnknownVariant(variant.to_string()));
        }
        let mut builder = ModuleBuilder::new(interner, MC68040_INFO.name);
        let sys = builder.import_domain("sys")?;
        let bclk = builder.import_clock("bclk")?;
        let reset = builder.input("reset", 1)?;
        let idbus = Wishbone::master(&mut builder, "idbus")?;

        let mut pins = Vec::with_capacity(PINS.len());
        for (name, width, bridge_output) in PINS {
            pins.push(Pin {
                name,
                signal: builder.wire(name, width)?,
                bridge_output,
            });
        }

        let (ad_i, ad_o, ad_t) = (pins[0].signal, pins[1].signal, pins[2].signal);

        platform.add_source(CPUIF_SOURCE);
        builder.add_source(CPUIF_SOURCE);
        debug!(variant, "mc68040 created");
        Ok(Self {
            builder,
            variant: variant.to_string(),
            reset_address: None,
            pins,
            ad_i,
            ad_o,
            ad_t,
            reset,
            idbus,
            sys,
            bclk,
            pads: None,
        })
    }

    /// Returns the Wishbone master of the bridge.
    pub fn idbus(&self) -> &Wishbone {
        &self.idbus
    }

    /// Returns a pin-level signal such as `cpu_ta`.
    pub fn pin(&self, name: &str) -> Option<SignalId> {
        self.pins.iter().find(|p| p.name == name).map(|p| p.signal)
    }

    /// Returns the pads bound so far.
    pub fn pads(&self) -> Option<&Mc68040Pads> {
        self.pads.as_ref()
    }

    /// Routes the processor bus to FPGA pads.
    ///
    /// Each address/data line gets a tristate buffer driven with `cpu_ad_i`
    /// while `cpu_ad_t` is low and sampled into `cpu_ad_o`. Lines beyond
    /// `ad_width` read as zero. The remaining pins become plain pads.
    pub fn add_pads(&mut self, pads: &Mc68040Pads) -> Result<(), CoreError> {
        if self.pads.is_some() {
            return Err(CoreError::PadsAlreadyBound);
        }
        let width = pads.ad_width;
        if width == 0 || width > AD_WIDTH {
            return Err(CoreError::PadWidth(width));
        }
        let (ad_i, ad_o, ad_t) = (self.ad_i, self.ad_o, self.ad_t);

        let prefix = &pads.prefix;
        let ad = self.builder.inout(&format!("{prefix}_cpu_ad"), width)?;
        let oe = self.builder.wire("cpu_ad_oe", 1)?;
        self.builder.assign(oe, Expr::signal(ad_t).not());
        for index in 0..width {
            self.builder.tristate(
                &format!("cpu_ad_ts{index}"),
                SignalRef::Bit { signal: ad, index },
                SignalRef::Bit {
                    signal: ad_i,
                    index,
                },
                oe,
                SignalRef::Bit {
                    signal: ad_o,
                    index,
                },
            )?;
        }
        if width < AD_WIDTH {
            self.builder.assign(
                SignalRef::Slice {
                    signal: ad_o,
                    high: AD_WIDTH - 1,
                    low: width,
                },
                Expr::Ref(SignalRef::Const(LogicVec::zero(AD_WIDTH - width))),
            );
        }

        let plain: Vec<Pin> = self.pins[AD_PIN_COUNT..].to_vec();
        for pin in plain {
            let width = self.builder.signal(pin.signal).width;
            let pad_name = format!("{prefix}_{}", pin.name);
            if pin.bridge_output {
                let pad = self.builder.output(&pad_name, width)?;
                self.builder.assign(pad, Expr::signal(pin.signal));
            } else {
                let pad = self.builder.input(&pad_name, width)?;
                self.builder.assign(pin.signal, Expr::signal(pad));
            }
        }

        debug!(prefix = %prefix, ad_width = width, "mc68040 pads bound");
        self.pads = Some(pads.clone());
        Ok(())
    }

    /// Adds the bridge instance and freezes the module.
    ///
    /// Without pads every pin-level signal becomes a module port so the
    /// integrator can route it.
    pub fn finalize(mut self) -> Result<Module, CoreError> {
        if self.pads.is_none() {
            for pin in &self.pins {
                let direction = if pin.bridge_output {
                    PortDirection::Output
                } else {
                    PortDirection::Input
                };
                self.builder.expose(pin.signal, direction)?;
            }
        }

        let sys_clk = self.builder.clock(self.sys);
        let sys_rst = self.builder.reset(self.sys);
        let cpu_reset = self.builder.wire("cpu_reset", 1)?;
        self.builder
            .assign(cpu_reset, Expr::signal(sys_rst).or(Expr::signal(self.reset)));

        let bus = self.idbus;
        let mut inst = self
            .builder
            .instance(CPUIF_MODULE, CPUIF_MODULE)
            .input("clk", sys_clk)
            .input("bclk", self.bclk)
            .input("reset", cpu_reset);
        for pin in &self.pins {
            inst = if pin.bridge_output {
                inst.output(pin.name, pin.signal)
            } else {
                inst.input(pin.name, pin.signal)
            };
        }
        inst.output("wb_cyc_o", bus.cyc)
            .output("wb_stb_o", bus.stb)
            .input("wb_ack_i", bus.ack)
            .output("wb_we_o", bus.we)
            .output("wb_sel_o", bus.sel)
            .output("wb_adr_o", bus.adr)
            .output("wb_dat_o", bus.dat_w)
            .input("wb_dat_i", bus.dat_r)
            .finish()?;

        debug!(
            variant = %self.variant,
            pads = self.pads.is_some(),
            reset_address = ?self.reset_address,
            "mc68040 finalized"
        );
        Ok(self.builder.finish()?)
    }
}

impl CpuCore for Mc68040<'_> {
    fn info(&self) -> &'static CpuInfo {
        &MC68040_INFO
    }

    fn variant(&self) -> &str {
        &self.variant
    }

    fn gcc_flags(&self) -> String {
        GCC_FLAGS.to_string()
    }

    fn set_reset_address(&mut self, address: u64) -> Result<(), CoreError> {
        if address != 0 {
            return Err(CoreError::ResetAddress(address));
        }
        self.reset_address = Some(address);
        Ok(())
    }

    fn reset_address(&self) -> Option<u64> {
        self.reset_address
    }
}
