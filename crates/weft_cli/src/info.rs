//! `weft info`: CPU metadata and derived clock frequencies.

use serde::Serialize;
use weft_config::ProjectConfig;
use weft_cores::cpu::mc68040::{GCC_FLAGS, MC68040_INFO};
use weft_cores::video::output_frequencies;
use weft_cores::CpuInfo;

use crate::pipeline::{load_project, CLOCKING, MC68040};
use crate::{GlobalArgs, ReportArgs, ReportFormat};

/// CPU section of the report.
#[derive(Debug, Serialize)]
pub struct CpuReport {
    /// Static family metadata.
    #[serde(flatten)]
    pub info: &'static CpuInfo,
    /// Configured variant.
    pub variant: String,
    /// Compiler flags for software.
    pub gcc_flags: String,
}

/// Clocking section of the report, frequencies in MHz.
#[derive(Debug, Serialize)]
pub struct ClockReport {
    /// Reference input.
    pub clkin_mhz: f64,
    /// PLL oscillator.
    pub vco_mhz: f64,
    /// Serdes I/O clock.
    pub pix20x_mhz: f64,
    /// Serdes parallel clock.
    pub pix5x_mhz: f64,
    /// Pixel clock.
    pub pix_mhz: f64,
}

/// Everything `weft info` prints.
#[derive(Debug, Serialize)]
pub struct InfoReport {
    /// Project name.
    pub project: String,
    /// Present when the bus bridge is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuReport>,
    /// Present when the clocking block is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clocking: Option<ClockReport>,
}

/// Builds the report without elaborating any module.
pub fn collect(config: &ProjectConfig) -> Result<InfoReport, Box<dyn std::error::Error>> {
    let has = |name: &str| config.project.components.iter().any(|c| c == name);

    let cpu = has(MC68040).then(|| CpuReport {
        info: &MC68040_INFO,
        variant: config.cpu.variant.clone(),
        gcc_flags: GCC_FLAGS.to_string(),
    });
    let clocking = if has(CLOCKING) {
        let f = output_frequencies(&config.clocking)?;
        Some(ClockReport {
            clkin_mhz: f.clkin.mhz(),
            vco_mhz: f.vco.mhz(),
            pix20x_mhz: f.pix20x.mhz(),
            pix5x_mhz: f.pix5x.mhz(),
            pix_mhz: f.pix.mhz(),
        })
    } else {
        None
    };
    Ok(InfoReport {
        project: config.project.name.clone(),
        cpu,
        clocking,
    })
}

fn print_text(report: &InfoReport) {
    println!("project: {}", report.project);
    if let Some(cpu) = &report.cpu {
        println!("cpu: {} ({}, variant {})", cpu.info.human_name, cpu.info.name, cpu.variant);
        println!("  data width:    {} bits, {:?} endian", cpu.info.data_width, cpu.info.endianness);
        println!("  gcc triple:    {}", cpu.info.gcc_triple);
        println!("  gcc flags:     {}", cpu.gcc_flags);
        println!("  linker format: {}", cpu.info.linker_output_format);
        for r in cpu.info.io_regions {
            println!("  io region:     0x{:08x} +0x{:08x}", r.origin, r.length);
        }
    }
    if let Some(c) = &report.clocking {
        println!("clocking:");
        println!("  clkin:  {:>9.3} MHz", c.clkin_mhz);
        println!("  vco:    {:>9.3} MHz", c.vco_mhz);
        println!("  pix20x: {:>9.3} MHz", c.pix20x_mhz);
        println!("  pix5x:  {:>9.3} MHz", c.pix5x_mhz);
        println!("  pix:    {:>9.3} MHz", c.pix_mhz);
    }
}

/// Runs the `weft info` command.
pub fn run(args: &ReportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (_, config) = load_project(global)?;
    let report = collect(&config)?;
    match args.format {
        ReportFormat::Text => print_text(&report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(0)
}
