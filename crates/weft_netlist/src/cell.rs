//! Cells: external instances, tristate pads, and clock-domain synchronizers.

use crate::const_value::ConstValue;
use crate::ids::{CellId, ClockDomainId};
use crate::port::PortDirection;
use crate::signal::SignalRef;
use serde::{Deserialize, Serialize};
use weft_common::Ident;

/// Tristate pad connection (inout).
pub const TRISTATE_PAD: &str = "pad";
/// Tristate value driven onto the pad.
pub const TRISTATE_O: &str = "o";
/// Tristate output enable; the pad floats when low.
pub const TRISTATE_OE: &str = "oe";
/// Tristate value read back from the pad.
pub const TRISTATE_I: &str = "i";
/// Synchronizer input.
pub const MULTIREG_I: &str = "i";
/// Synchronizer output.
pub const MULTIREG_O: &str = "o";

/// The kind of a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CellKind {
    /// An instance of a block defined outside this netlist: a vendor
    /// primitive such as `PLL_BASE` or a module from an HDL source file.
    Instance {
        /// The name of the instantiated block.
        module: Ident,
        /// Parameter overrides, in declaration order.
        params: Vec<(Ident, ConstValue)>,
    },
    /// A single-bit tristate I/O buffer with `pad`, `o`, `oe` and `i` connections.
    Tristate,
    /// A chain of flip-flops in `domain` that synchronizes `i` to `o`.
    MultiReg {
        /// The destination clock domain.
        domain: ClockDomainId,
        /// Number of flip-flops in the chain.
        stages: u32,
    },
}

/// A connection between a named cell port and a signal reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// The port name on the cell.
    pub port_name: Ident,
    /// The direction, as seen from the cell.
    pub direction: PortDirection,
    /// The signal, slice, or constant bound to the port.
    pub signal: SignalRef,
}

/// A cell in the netlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// The ID of this cell within its module.
    pub id: CellId,
    /// The instance name.
    pub name: Ident,
    /// What the cell is.
    pub kind: CellKind,
    /// Port bindings, in the order they were declared.
    pub connections: Vec<Connection>,
}

impl Cell {
    /// Returns the connection bound to `port`, if any.
    pub fn connection(&self, port: Ident) -> Option<&Connection> {
        self.connections.iter().find(|c| c.port_name == port)
    }

    /// Returns the instantiated block name for [`CellKind::Instance`] cells.
    pub fn instance_of(&self) -> Option<Ident> {
        match &self.kind {
            CellKind::Instance { module, .. } => Some(*module),
            _ => None,
        }
    }

    /// Returns the value of parameter `name` for instance cells.
    pub fn param(&self, name: Ident) -> Option<&ConstValue> {
        match &self.kind {
            CellKind::Instance { params, .. } => {
                params.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SignalId;

    fn pll() -> Cell {
        Cell {
            id: CellId::from_raw(0),
            name: Ident::from_raw(1),
            kind: CellKind::Instance {
                module: Ident::from_raw(2),
                params: vec![(Ident::from_raw(3), ConstValue::Int(20))],
            },
            connections: vec![Connection {
                port_name: Ident::from_raw(4),
                direction: PortDirection::Input,
                signal: SignalRef::Signal(SignalId::from_raw(0)),
            }],
        }
    }

    #[test]
    fn instance_accessors() {
        let cell = pll();
        assert_eq!(cell.instance_of(), Some(Ident::from_raw(2)));
        assert_eq!(cell.param(Ident::from_raw(3)), Some(&ConstValue::Int(20)));
        assert!(cell.param(Ident::from_raw(9)).is_none());
        assert!(cell.connection(Ident::from_raw(4)).is_some());
    }

    #[test]
    fn tristate_is_not_instance() {
        let cell = Cell {
            id: CellId::from_raw(0),
            name: Ident::from_raw(1),
            kind: CellKind::Tristate,
            connections: Vec::new(),
        };
        assert_eq!(cell.instance_of(), None);
        assert_eq!(cell.param(Ident::from_raw(0)), None);
    }
}
