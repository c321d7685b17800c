//! Module boundary ports.

use crate::ids::{PortId, SignalId};
use serde::{Deserialize, Serialize};
use weft_common::Ident;

/// The direction of a port, as seen from inside the module that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Data flows into the module.
    Input,
    /// Data flows out of the module.
    Output,
    /// Bidirectional pad.
    InOut,
}

impl PortDirection {
    /// Returns the Verilog keyword for this direction.
    pub fn keyword(self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
            PortDirection::InOut => "inout",
        }
    }
}

/// A port in a module's external interface, backed by a signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// The ID of this port.
    pub id: PortId,
    /// The port name (same as the backing signal's name).
    pub name: Ident,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// The signal that backs this port.
    pub signal: SignalId,
}
