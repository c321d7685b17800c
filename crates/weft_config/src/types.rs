//! Configuration types deserialized from `weft.toml`.

use serde::Deserialize;
use weft_common::Frequency;

/// The top-level project configuration parsed from `weft.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata and the list of components to generate.
    pub project: ProjectMeta,
    /// Where generated files go.
    #[serde(default)]
    pub output: OutputConfig,
    /// Parameters of the `mc68040` bus bridge.
    #[serde(default)]
    pub cpu: CpuConfig,
    /// Parameters of the video clocking block.
    #[serde(default)]
    pub clocking: ClockingConfig,
    /// Lint settings (deny/allow/warn rules).
    #[serde(default)]
    pub lint: LintConfig,
}

/// Core project metadata.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// Components to generate, by name (`mc68040`, `clocking`).
    #[serde(default = "default_components")]
    pub components: Vec<String>,
}

fn default_components() -> Vec<String> {
    vec!["mc68040".to_string(), "clocking".to_string()]
}

/// Output settings.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory, relative to the project directory.
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Whether to write `manifest.json` next to the Verilog files.
    #[serde(default = "default_true")]
    pub manifest: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            manifest: true,
        }
    }
}

fn default_output_dir() -> String {
    "build".to_string()
}

fn default_true() -> bool {
    true
}

/// Parameters of the CPU bus bridge.
#[derive(Debug, Deserialize)]
pub struct CpuConfig {
    /// CPU variant name.
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Reset vector address. Only `0` is supported by the hardware.
    #[serde(default)]
    pub reset_address: u64,
    /// Whether to bind the pin-level signals to tristate pads.
    #[serde(default = "default_true")]
    pub pads: bool,
    /// Width of the multiplexed address/data pad bus.
    #[serde(default = "default_ad_width")]
    pub ad_width: u32,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            reset_address: 0,
            pads: true,
            ad_width: default_ad_width(),
        }
    }
}

fn default_variant() -> String {
    "standard".to_string()
}

fn default_ad_width() -> u32 {
    32
}

/// Parameters of the PLL-based video clocking block.
///
/// The defaults derive pix (1x), pix5x and pix20x clocks from a 22 ns
/// reference: VCO = 20 / 22 ns ≈ 909 MHz.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClockingConfig {
    /// Reference clock period in nanoseconds (`CLKIN_PERIOD`).
    #[serde(default = "default_clkin_period")]
    pub clkin_period_ns: f64,
    /// Feedback multiplier (`CLKFBOUT_MULT`).
    #[serde(default = "default_fb_mult")]
    pub clkfbout_mult: u32,
    /// `CLKOUT0_DIVIDE`, the pix20x output.
    #[serde(default = "default_pix20x_divide")]
    pub pix20x_divide: u32,
    /// `CLKOUT1_DIVIDE`, the pix5x output.
    #[serde(default = "default_pix5x_divide")]
    pub pix5x_divide: u32,
    /// `CLKOUT2_DIVIDE`, the pix output.
    #[serde(default = "default_pix_divide")]
    pub pix_divide: u32,
    /// `BUFPLL` `DIVIDE`: ratio between the I/O clock and pix5x.
    #[serde(default = "default_bufpll_divide")]
    pub bufpll_divide: u32,
    /// PLL feedback compensation mode.
    #[serde(default = "default_compensation")]
    pub compensation: String,
    /// Depth of the lock synchronizers.
    #[serde(default = "default_sync_stages")]
    pub sync_stages: u32,
}

impl Default for ClockingConfig {
    fn default() -> Self {
        Self {
            clkin_period_ns: default_clkin_period(),
            clkfbout_mult: default_fb_mult(),
            pix20x_divide: default_pix20x_divide(),
            pix5x_divide: default_pix5x_divide(),
            pix_divide: default_pix_divide(),
            bufpll_divide: default_bufpll_divide(),
            compensation: default_compensation(),
            sync_stages: default_sync_stages(),
        }
    }
}

impl ClockingConfig {
    /// Returns the reference clock frequency.
    pub fn clkin(&self) -> Frequency {
        Frequency::from_period_ns(self.clkin_period_ns)
    }
}

fn default_clkin_period() -> f64 {
    22.0
}

fn default_fb_mult() -> u32 {
    20
}

fn default_pix20x_divide() -> u32 {
    1
}

fn default_pix5x_divide() -> u32 {
    4
}

fn default_pix_divide() -> u32 {
    20
}

fn default_bufpll_divide() -> u32 {
    4
}

fn default_compensation() -> String {
    "INTERNAL".to_string()
}

fn default_sync_stages() -> u32 {
    2
}

/// Lint configuration controlling which rules are enabled or disabled.
///
/// Entries may name a rule by code (`W101`) or by name (`unused-signal`).
#[derive(Debug, Default, Deserialize)]
pub struct LintConfig {
    /// Rules to treat as errors.
    #[serde(default)]
    pub deny: Vec<String>,
    /// Rules to suppress.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Rules to keep at warning severity even when denied elsewhere.
    #[serde(default)]
    pub warn: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clocking_defaults_match_hardware() {
        let c = ClockingConfig::default();
        assert_eq!(c.clkin_period_ns, 22.0);
        assert_eq!(c.clkfbout_mult, 20);
        assert_eq!(
            (c.pix20x_divide, c.pix5x_divide, c.pix_divide),
            (1, 4, 20)
        );
        assert_eq!(c.bufpll_divide, 4);
        assert_eq!(c.compensation, "INTERNAL");
        assert_eq!(c.sync_stages, 2);
    }

    #[test]
    fn clkin_from_period() {
        let c = ClockingConfig {
            clkin_period_ns: 20.0,
            ..ClockingConfig::default()
        };
        assert!((c.clkin().mhz() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn cpu_defaults() {
        let c = CpuConfig::default();
        assert_eq!(c.variant, "standard");
        assert_eq!(c.reset_address, 0);
        assert!(c.pads);
        assert_eq!(c.ad_width, 32);
    }
}
