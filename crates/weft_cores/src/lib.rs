//! Structural gateware cores.
//!
//! Each core builds a [`weft_netlist::Module`] at construction time:
//!
//! - [`cpu::Mc68040`] wraps an external Motorola 68040 behind the `cpuif`
//!   bus bridge and exposes it as a Wishbone master.
//! - [`video::Clocking`] derives the pixel, 5x and 20x serdes clocks of a
//!   DVI sampler from a PLL and reports lock status through a CSR.
//!
//! The two cores are independent; an integrator instantiates whichever it
//! needs and connects them through their ports.

#![warn(missing_docs)]

pub mod cpu;
pub mod error;
pub mod platform;
pub mod video;
pub mod wishbone;

pub use cpu::{CpuCore, CpuInfo, Endianness, IoRegion, Mc68040, Mc68040Pads};
pub use error::CoreError;
pub use platform::Platform;
pub use video::{ClockFrequencies, Clocking};
pub use wishbone::Wishbone;
