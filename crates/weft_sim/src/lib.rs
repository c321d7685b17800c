//! Cycle-level evaluator for structural modules.
//!
//! A [`Simulator`] evaluates the logic a module owns: continuous
//! assignments, tristate pads, synchronizer chains and the CSR bank.
//! External instances are black boxes; their outputs are set with
//! [`Simulator::poke`] like the module's inputs. Clocks are abstract: each
//! [`Simulator::tick`] is one rising edge of one domain.
//!
//! - `error`: simulation error types
//! - `evaluator`: 4-state expression evaluation and net resolution
//! - `kernel`: the simulator

#![warn(missing_docs)]

pub mod error;
pub mod evaluator;
pub mod kernel;

pub use error::SimError;
pub use kernel::Simulator;
