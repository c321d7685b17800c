//! Structural Verilog emission and build manifests.
//!
//! [`emit_module`] renders a finished [`Module`](weft_netlist::Module) as a
//! single self-contained Verilog-2005 module. [`Manifest`] records what was
//! emitted, with content hashes, for the integrator.

#![warn(missing_docs)]

mod emit;
mod manifest;

pub use emit::{emit_module, file_name};
pub use manifest::{CsrEntry, Manifest, ManifestFile, ManifestModule};
