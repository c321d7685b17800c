//! Video input cores.

pub mod clocking;

pub use clocking::{output_frequencies, ClockFrequencies, Clocking};
