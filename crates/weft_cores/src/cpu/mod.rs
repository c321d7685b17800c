//! Soft and hard CPU wrappers.
//!
//! Every CPU wrapper implements [`CpuCore`], which carries the toolchain
//! metadata software builds need (target triple, linker format, compiler
//! flags) alongside the reset-vector configuration.

pub mod mc68040;

use serde::Serialize;

use crate::error::CoreError;

pub use mc68040::{Mc68040, Mc68040Pads};

/// Byte order of the CPU data bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

/// An address range reserved for memory-mapped I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IoRegion {
    /// First address of the region.
    pub origin: u64,
    /// Size of the region in bytes.
    pub length: u64,
}

impl IoRegion {
    /// Returns `true` if `address` falls inside the region.
    pub fn contains(&self, address: u64) -> bool {
        address >= self.origin && address - self.origin < self.length
    }
}

/// Static description of a CPU family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpuInfo {
    /// Short lowercase name.
    pub name: &'static str,
    /// Name for humans.
    pub human_name: &'static str,
    /// Supported variants; the first is the default.
    pub variants: &'static [&'static str],
    /// Data bus width in bits.
    pub data_width: u32,
    /// Data bus byte order.
    pub endianness: Endianness,
    /// GCC target triple.
    pub gcc_triple: &'static str,
    /// `OUTPUT_FORMAT` for linker scripts.
    pub linker_output_format: &'static str,
    /// Assembly mnemonic of a no-op.
    pub nop: &'static str,
    /// Memory-mapped I/O regions.
    pub io_regions: &'static [IoRegion],
}

/// A CPU that can be placed in a design.
pub trait CpuCore {
    /// Static metadata for the CPU family.
    fn info(&self) -> &'static CpuInfo;

    /// The variant this instance was built as.
    fn variant(&self) -> &str;

    /// Compiler flags for software targeting this instance.
    fn gcc_flags(&self) -> String;

    /// Sets the address the CPU fetches its first instruction from.
    fn set_reset_address(&mut self, address: u64) -> Result<(), CoreError>;

    /// The configured reset address, if one was set.
    fn reset_address(&self) -> Option<u64>;
}
