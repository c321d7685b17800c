//! Signal definitions and references.

use crate::ids::SignalId;
use serde::{Deserialize, Serialize};
use weft_common::{Ident, LogicVec};

/// The storage kind of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// A combinational net.
    Wire,
    /// A register owned by the module (CSR storage).
    Reg,
    /// A net that backs a module port.
    Port,
}

/// A named signal within a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The ID of this signal within its module.
    pub id: SignalId,
    /// The signal name.
    pub name: Ident,
    /// Width in bits, always at least 1.
    pub width: u32,
    /// The storage kind.
    pub kind: SignalKind,
}

/// A reference to a whole signal, part of a signal, or a constant.
///
/// Used on both sides of cell connections and as assignment targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalRef {
    /// The full signal.
    Signal(SignalId),
    /// A single bit.
    Bit {
        /// The signal being indexed.
        signal: SignalId,
        /// The bit index.
        index: u32,
    },
    /// A contiguous bit range, both ends inclusive.
    Slice {
        /// The signal being sliced.
        signal: SignalId,
        /// The high bit index.
        high: u32,
        /// The low bit index.
        low: u32,
    },
    /// A constant value.
    Const(LogicVec),
}

impl SignalRef {
    /// Returns the underlying signal, or `None` for constants.
    pub fn signal(&self) -> Option<SignalId> {
        match self {
            SignalRef::Signal(id) => Some(*id),
            SignalRef::Bit { signal, .. } | SignalRef::Slice { signal, .. } => Some(*signal),
            SignalRef::Const(_) => None,
        }
    }

    /// Returns the bit indices of the underlying signal covered by this reference.
    ///
    /// `full_width` is the width of the referenced signal.
    pub fn bits(&self, full_width: u32) -> std::ops::Range<u32> {
        match self {
            SignalRef::Signal(_) => 0..full_width,
            SignalRef::Bit { index, .. } => *index..*index + 1,
            SignalRef::Slice { high, low, .. } => *low..*high + 1,
            SignalRef::Const(_) => 0..0,
        }
    }
}

impl From<SignalId> for SignalRef {
    fn from(id: SignalId) -> Self {
        SignalRef::Signal(id)
    }
}
