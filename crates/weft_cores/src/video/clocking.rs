//! Clock generation for a TMDS (DVI) sampler.
//!
//! A `PLL_BASE` multiplies the recovered pixel clock into three outputs:
//!
//! ```text
//! clkin ──► PLL ─ CLKOUT0 ──► BUFPLL ─ IOCLK ──► pix20x (serdes I/O clock)
//!                 CLKOUT1 ──► BUFG ─────┬──────► pix5x
//!                                       └─ GCLK ─► BUFPLL
//!                 CLKOUT2 ──► BUFG ────────────► pix
//!                 LOCKED ─────────────► BUFPLL ─ LOCK ──► locked_async
//! ```
//!
//! `locked_async` is synchronized into `sys` for the `locked` status
//! register and, inverted, into `pix5x` as that domain's reset. The PLL
//! reset comes from the `pll_reset` control register.

use tracing::debug;
use weft_common::{Frequency, Interner, LogicVec};
use weft_config::ClockingConfig;
use weft_netlist::{CsrAccess, Expr, Module, ModuleBuilder, SignalRef};

use crate::error::CoreError;

/// Name of the generated module.
pub const MODULE_NAME: &str = "clocking";

/// Lowest VCO frequency the PLL can run at, in MHz.
pub const VCO_MIN_MHZ: f64 = 400.0;
/// Highest VCO frequency the PLL can run at, in MHz.
pub const VCO_MAX_MHZ: f64 = 1080.0;

/// Largest feedback multiplier the PLL accepts.
const MAX_FB_MULT: u32 = 64;
/// Largest output divider the PLL accepts.
const MAX_OUT_DIVIDE: u32 = 128;
/// Serialization factors the `BUFPLL` supports.
const BUFPLL_DIVIDES: [u32; 7] = [1, 2, 3, 4, 5, 6, 8];
/// Values of the `COMPENSATION` attribute.
const COMPENSATIONS: [&str; 4] = [
    "INTERNAL",
    "SYSTEM_SYNCHRONOUS",
    "SOURCE_SYNCHRONOUS",
    "EXTERNAL",
];

/// Frequencies produced by a clocking configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockFrequencies {
    /// Reference input.
    pub clkin: Frequency,
    /// PLL oscillator.
    pub vco: Frequency,
    /// Serdes I/O clock.
    pub pix20x: Frequency,
    /// Serdes parallel clock.
    pub pix5x: Frequency,
    /// Pixel clock.
    pub pix: Frequency,
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::InvalidClocking(msg.into())
}

/// Checks that `config` can be realized and returns the resulting frequencies.
pub fn output_frequencies(config: &ClockingConfig) -> Result<ClockFrequencies, CoreError> {
    let period = config.clkin_period_ns;
    if !period.is_finite() || period <= 0.0 {
        return Err(invalid(format!(
            "input clock period must be positive, got {period}ns"
        )));
    }
    if config.clkfbout_mult == 0 || config.clkfbout_mult > MAX_FB_MULT {
        return Err(invalid(format!(
            "feedback multiplier {} is outside 1..={MAX_FB_MULT}",
            config.clkfbout_mult
        )));
    }
    for (name, divide) in [
        ("pix20x", config.pix20x_divide),
        ("pix5x", config.pix5x_divide),
        ("pix", config.pix_divide),
    ] {
        if divide == 0 || divide > MAX_OUT_DIVIDE {
            return Err(invalid(format!(
                "{name} divider {divide} is outside 1..={MAX_OUT_DIVIDE}"
            )));
        }
    }
    if !BUFPLL_DIVIDES.contains(&config.bufpll_divide) {
        return Err(invalid(format!(
            "BUFPLL divide {} is not one of {BUFPLL_DIVIDES:?}",
            config.bufpll_divide
        )));
    }
    if config.pix5x_divide != config.pix20x_divide * config.bufpll_divide {
        return Err(invalid(format!(
            "pix5x divider {} must be pix20x divider {} times the BUFPLL divide {}",
            config.pix5x_divide, config.pix20x_divide, config.bufpll_divide
        )));
    }
    if !COMPENSATIONS.contains(&config.compensation.as_str()) {
        return Err(invalid(format!(
            "unknown compensation mode '{}'",
            config.compensation
        )));
    }
    if config.sync_stages < 2 {
        return Err(invalid(format!(
            "synchronizers need at least 2 stages, got {}",
            config.sync_stages
        )));
    }

    let clkin = config.clkin();
    let vco = clkin.scale(config.clkfbout_mult, 1);
    if !vco.within_mhz(VCO_MIN_MHZ..=VCO_MAX_MHZ) {
        return Err(invalid(format!(
            "VCO frequency {vco} is outside {VCO_MIN_MHZ}-{VCO_MAX_MHZ} MHz"
        )));
    }
    Ok(ClockFrequencies {
        clkin,
        vco,
        pix20x: vco.scale(1, config.pix20x_divide),
        pix5x: vco.scale(1, config.pix5x_divide),
        pix: vco.scale(1, config.pix_divide),
    })
}

/// The PLL-based clock manager.
#[derive(Debug)]
pub struct Clocking {
    module: Module,
    frequencies: ClockFrequencies,
}

impl Clocking {
    /// Validates `config` and builds the clocking module.
    pub fn new(interner: &Interner, config: &ClockingConfig) -> Result<Self, CoreError> {
        let frequencies = output_frequencies(config)?;
        let stages = config.sync_stages;

        let mut b = ModuleBuilder::new(interner, MODULE_NAME);
        let pll_reset = b.csr("pll_reset", 1, CsrAccess::WriteOnly)?;
        let locked_status = b.csr("locked", 1, CsrAccess::ReadOnly)?;

        let clkin = b.input("clkin", 1)?;
        let pix = b.local_domain("pix")?;
        let pix5x = b.local_domain("pix5x")?;
        let pix20x = b.local_domain("pix20x")?;
        let sys = b.import_domain("sys")?;

        let clkfbout = b.wire("clkfbout", 1)?;
        let pll_locked = b.wire("pll_locked", 1)?;
        let pll_clk0 = b.wire("pll_clk0", 1)?;
        let pll_clk1 = b.wire("pll_clk1", 1)?;
        let pll_clk2 = b.wire("pll_clk2", 1)?;
        let locked_async = b.wire("locked_async", 1)?;
        let unlocked_async = b.wire("unlocked_async", 1)?;
        let locked = b.output("locked", 1)?;
        let serdesstrobe = b.output("serdesstrobe", 1)?;

        b.instance("pll", "PLL_BASE")
            .param("CLKIN_PERIOD", config.clkin_period_ns)
            .param("CLKFBOUT_MULT", config.clkfbout_mult)
            .param("CLKOUT0_DIVIDE", config.pix20x_divide)
            .param("CLKOUT1_DIVIDE", config.pix5x_divide)
            .param("CLKOUT2_DIVIDE", config.pix_divide)
            .param("COMPENSATION", config.compensation.as_str())
            .output("CLKFBOUT", clkfbout)
            .output("CLKOUT0", pll_clk0)
            .output("CLKOUT1", pll_clk1)
            .output("CLKOUT2", pll_clk2)
            .output("LOCKED", pll_locked)
            .input("CLKFBIN", clkfbout)
            .input("CLKIN", clkin)
            .input("RST", pll_reset)
            .finish()?;

        let pix_clk = b.clock(pix);
        let pix_rst = b.reset(pix);
        let pix5x_clk = b.clock(pix5x);
        let pix5x_rst = b.reset(pix5x);
        let pix20x_clk = b.clock(pix20x);
        let pix20x_rst = b.reset(pix20x);

        b.instance("bufpll", "BUFPLL")
            .param("DIVIDE", config.bufpll_divide)
            .input("PLLIN", pll_clk0)
            .input("GCLK", pix5x_clk)
            .input("LOCKED", pll_locked)
            .output("IOCLK", pix20x_clk)
            .output("LOCK", locked_async)
            .output("SERDESSTROBE", serdesstrobe)
            .finish()?;
        b.instance("bufg_pix5x", "BUFG")
            .input("I", pll_clk1)
            .output("O", pix5x_clk)
            .finish()?;
        b.instance("bufg_pix", "BUFG")
            .input("I", pll_clk2)
            .output("O", pix_clk)
            .finish()?;

        b.multi_reg("locked_sync", locked_async, locked, sys, stages)?;
        b.assign(unlocked_async, Expr::signal(locked_async).not());
        b.multi_reg("pix5x_rst_sync", unlocked_async, pix5x_rst, pix5x, stages)?;
        b.assign(locked_status, Expr::signal(locked));

        // Only pix5x has a synchronized reset.
        for rst in [pix_rst, pix20x_rst] {
            b.assign(rst, Expr::Ref(SignalRef::Const(LogicVec::zero(1))));
        }

        let module = b.finish()?;
        debug!(
            vco = %frequencies.vco,
            pix20x = %frequencies.pix20x,
            pix5x = %frequencies.pix5x,
            pix = %frequencies.pix,
            sync_stages = stages,
            "clocking built"
        );
        Ok(Self {
            module,
            frequencies,
        })
    }

    /// Returns the generated module.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Consumes the clock manager, returning the generated module.
    pub fn into_module(self) -> Module {
        self.module
    }

    /// Returns the frequencies of the generated clocks.
    pub fn output_frequencies(&self) -> &ClockFrequencies {
        &self.frequencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_netlist::{CellKind, DomainOrigin, PortDirection};

    fn build(interner: &Interner) -> Clocking {
        Clocking::new(interner, &ClockingConfig::default()).unwrap()
    }

    #[test]
    fn default_frequencies() {
        let f = output_frequencies(&ClockingConfig::default()).unwrap();
        assert!((f.clkin.mhz() - 45.4545).abs() < 1e-3);
        assert!((f.vco.mhz() - 909.0909).abs() < 1e-3);
        assert!((f.pix20x.hz() - f.vco.hz()).abs() < 1e-3);
        assert!((f.pix5x.hz() * 4.0 - f.pix20x.hz()).abs() < 1e-3);
        assert!((f.pix.hz() * 5.0 - f.pix5x.hz()).abs() < 1e-3);
    }

    #[test]
    fn rejects_bad_period() {
        for period in [0.0, -1.0, f64::NAN] {
            let config = ClockingConfig {
                clkin_period_ns: period,
                ..ClockingConfig::default()
            };
            assert!(matches!(
                output_frequencies(&config),
                Err(CoreError::InvalidClocking(_))
            ));
        }
    }

    #[test]
    fn rejects_zero_dividers() {
        let config = ClockingConfig {
            pix_divide: 0,
            ..ClockingConfig::default()
        };
        let err = output_frequencies(&config).unwrap_err();
        assert!(err.to_string().contains("pix divider 0"));
    }

    #[test]
    fn rejects_mismatched_serdes_ratio() {
        let config = ClockingConfig {
            pix5x_divide: 5,
            ..ClockingConfig::default()
        };
        let err = output_frequencies(&config).unwrap_err();
        assert!(err.to_string().contains("BUFPLL divide"));
    }

    #[test]
    fn rejects_vco_out_of_range() {
        let config = ClockingConfig {
            clkfbout_mult: 5,
            ..ClockingConfig::default()
        };
        let err = output_frequencies(&config).unwrap_err();
        assert!(err.to_string().contains("VCO frequency"));
    }

    #[test]
    fn rejects_shallow_synchronizer() {
        let config = ClockingConfig {
            sync_stages: 1,
            ..ClockingConfig::default()
        };
        assert!(matches!(
            output_frequencies(&config),
            Err(CoreError::InvalidClocking(_))
        ));
    }

    #[test]
    fn rejects_unknown_compensation() {
        let config = ClockingConfig {
            compensation: "ZHOLD".into(),
            ..ClockingConfig::default()
        };
        assert!(output_frequencies(&config).is_err());
    }

    #[test]
    fn pll_parameters_follow_config() {
        let interner = Interner::new();
        let clocking = build(&interner);
        let m = clocking.module();
        let pll = m.find_cell(interner.get_or_intern("pll")).unwrap();
        let param = |name: &str| pll.param(interner.get_or_intern(name)).cloned();
        assert_eq!(param("CLKIN_PERIOD"), Some(22.0.into()));
        assert_eq!(param("CLKFBOUT_MULT"), Some(20u32.into()));
        assert_eq!(param("CLKOUT0_DIVIDE"), Some(1u32.into()));
        assert_eq!(param("CLKOUT1_DIVIDE"), Some(4u32.into()));
        assert_eq!(param("CLKOUT2_DIVIDE"), Some(20u32.into()));
        assert_eq!(param("COMPENSATION"), Some("INTERNAL".into()));
    }

    #[test]
    fn three_local_domains() {
        let interner = Interner::new();
        let m = build(&interner).into_module();
        let local: Vec<&str> = m
            .clock_domains
            .values()
            .filter(|d| d.origin == DomainOrigin::Local)
            .map(|d| interner.resolve(d.name))
            .collect();
        assert_eq!(local, ["pix", "pix5x", "pix20x"]);
        let strobe = m.find_port(interner.get_or_intern("serdesstrobe")).unwrap();
        assert_eq!(strobe.direction, PortDirection::Output);
    }

    #[test]
    fn two_synchronizers_with_configured_depth() {
        let interner = Interner::new();
        let config = ClockingConfig {
            sync_stages: 3,
            ..ClockingConfig::default()
        };
        let m = Clocking::new(&interner, &config).unwrap().into_module();
        let depths: Vec<u32> = m
            .cells
            .values()
            .filter_map(|c| match c.kind {
                CellKind::MultiReg { stages, .. } => Some(stages),
                _ => None,
            })
            .collect();
        assert_eq!(depths, [3, 3]);
    }

    #[test]
    fn csr_map() {
        let interner = Interner::new();
        let m = build(&interner).into_module();
        let fields: Vec<(&str, u32, CsrAccess)> = m
            .csr
            .iter()
            .map(|f| (interner.resolve(f.name), f.address, f.access))
            .collect();
        assert_eq!(
            fields,
            [
                ("pll_reset", 0, CsrAccess::WriteOnly),
                ("locked", 1, CsrAccess::ReadOnly),
            ]
        );
    }
}
