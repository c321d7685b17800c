//! Value types shared by every weft crate.
//!
//! - [`Interner`] and [`Ident`] for signal, cell and module names
//! - [`Logic`] and [`LogicVec`] for four-state simulation values
//! - [`Frequency`] for PLL input and output rates
//! - [`ContentHash`] for detecting unchanged emitted files

#![warn(missing_docs)]

pub mod frequency;
pub mod hash;
pub mod ident;
pub mod logic;
pub mod logic_vec;

pub use frequency::Frequency;
pub use hash::{ContentHash, ParseHashError};
pub use ident::{is_verilog_identifier, Ident, Interner};
pub use logic::Logic;
pub use logic_vec::LogicVec;
