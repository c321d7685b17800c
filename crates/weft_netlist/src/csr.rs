//! Control/status register field descriptors.
//!
//! Each module declares its host-visible register fields explicitly through
//! [`ModuleBuilder::csr`](crate::builder::ModuleBuilder::csr). The resulting
//! list of `(address, width, access)` descriptors is the complete register
//! map; nothing is discovered at run time.

use crate::ids::{ClockDomainId, SignalId};
use serde::{Deserialize, Serialize};
use std::fmt;
use weft_common::Ident;

/// Width of the CSR data bus. Every field occupies one word.
pub const CSR_DATA_WIDTH: u32 = 8;

/// Access mode of a field, from the host's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsrAccess {
    /// Host reads a value driven by the hardware.
    ReadOnly,
    /// Host writes a value the hardware consumes; reads return zero.
    WriteOnly,
    /// Host writes a value the hardware consumes and can read it back.
    ReadWrite,
}

impl CsrAccess {
    /// Returns `true` if the host can write the field (the bank owns the storage).
    pub fn host_writable(self) -> bool {
        matches!(self, CsrAccess::WriteOnly | CsrAccess::ReadWrite)
    }

    /// Returns `true` if a host read returns the field's value.
    pub fn host_readable(self) -> bool {
        matches!(self, CsrAccess::ReadOnly | CsrAccess::ReadWrite)
    }
}

impl fmt::Display for CsrAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsrAccess::ReadOnly => write!(f, "ro"),
            CsrAccess::WriteOnly => write!(f, "wo"),
            CsrAccess::ReadWrite => write!(f, "rw"),
        }
    }
}

/// One host-visible register field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrField {
    /// Field name.
    pub name: Ident,
    /// Word address within the module's CSR bank.
    pub address: u32,
    /// Width in bits, at most [`CSR_DATA_WIDTH`].
    pub width: u32,
    /// Host access mode.
    pub access: CsrAccess,
    /// The backing signal: register storage for host-writable fields,
    /// the hardware-driven status net for read-only ones.
    pub signal: SignalId,
}

/// The host-facing register bus generated for a module with CSR fields.
///
/// Writes are sampled on the rising edge of the bus domain's clock; reads
/// are combinational and return zero for unmapped or write-only addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrBus {
    /// Word address input, `csr_adr`.
    pub adr: SignalId,
    /// Write strobe input, `csr_we`.
    pub we: SignalId,
    /// Write data input, `csr_dat_w`.
    pub dat_w: SignalId,
    /// Read data output, `csr_dat_r`.
    pub dat_r: SignalId,
    /// The domain the bank is clocked in (`sys`).
    pub domain: ClockDomainId,
}

/// Returns the width of `csr_adr` for a bank of `fields` words.
pub fn address_width(fields: usize) -> u32 {
    let mut width = 1;
    while (1usize << width) < fields {
        width += 1;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_predicates() {
        assert!(CsrAccess::ReadOnly.host_readable());
        assert!(!CsrAccess::ReadOnly.host_writable());
        assert!(CsrAccess::WriteOnly.host_writable());
        assert!(!CsrAccess::WriteOnly.host_readable());
        assert!(CsrAccess::ReadWrite.host_readable() && CsrAccess::ReadWrite.host_writable());
    }

    #[test]
    fn address_width_covers_fields() {
        assert_eq!(address_width(1), 1);
        assert_eq!(address_width(2), 1);
        assert_eq!(address_width(3), 2);
        assert_eq!(address_width(4), 2);
        assert_eq!(address_width(5), 3);
    }

    #[test]
    fn access_serde_is_snake_case() {
        let json = serde_json::to_string(&CsrAccess::WriteOnly).unwrap();
        assert_eq!(json, "\"write_only\"");
    }
}
