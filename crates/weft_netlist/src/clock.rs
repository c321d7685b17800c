//! Clock domains.

use crate::ids::{ClockDomainId, SignalId};
use serde::{Deserialize, Serialize};
use weft_common::Ident;

/// Where a clock domain comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainOrigin {
    /// Created and driven inside this module; clock and reset are outputs.
    Local,
    /// Referenced by name and supplied by the integrator; clock and reset are inputs.
    Imported,
}

/// A named `(clock, reset)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockDomain {
    /// The ID of this domain within its module.
    pub id: ClockDomainId,
    /// The domain name (e.g. `sys`, `pix5x`).
    pub name: Ident,
    /// The clock signal, `<name>_clk`.
    pub clock: SignalId,
    /// The synchronous reset signal, `<name>_rst`.
    pub reset: SignalId,
    /// Whether the module drives or receives this domain.
    pub origin: DomainOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_serde_roundtrip() {
        let d = ClockDomain {
            id: ClockDomainId::from_raw(0),
            name: Ident::from_raw(1),
            clock: SignalId::from_raw(2),
            reset: SignalId::from_raw(3),
            origin: DomainOrigin::Imported,
        };
        let json = serde_json::to_string(&d).unwrap();
        let back: ClockDomain = serde_json::from_str(&json).unwrap();
        assert_eq!(back.origin, DomainOrigin::Imported);
        assert_eq!(back.reset, d.reset);
    }
}
