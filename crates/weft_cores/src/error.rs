//! Error type for core construction.

use thiserror::Error;
use weft_netlist::BuildError;

/// Errors raised while constructing a core.
///
/// Every wiring or parameter problem surfaces here at construction time;
/// nothing is checked once a module has been finished.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// The core only boots from a fixed reset vector.
    #[error("unsupported reset address 0x{0:08x}: only 0x00000000 is supported")]
    ResetAddress(u64),

    /// The requested CPU variant does not exist.
    #[error("unsupported CPU variant '{0}'")]
    UnknownVariant(String),

    /// The clocking parameters cannot be realized by the PLL.
    #[error("invalid clocking parameters: {0}")]
    InvalidClocking(String),

    /// The address/data pad bus has an unusable width.
    #[error("pad bus width {0} is out of range (1..=32)")]
    PadWidth(u32),

    /// Pads were requested a second time.
    #[error("pads are already bound to this CPU")]
    PadsAlreadyBound,

    /// The underlying netlist builder rejected an item.
    #[error(transparent)]
    Build(#[from] BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_address_message() {
        let err = CoreError::ResetAddress(0x100);
        assert_eq!(
            err.to_string(),
            "unsupported reset address 0x00000100: only 0x00000000 is supported"
        );
    }

    #[test]
    fn build_errors_convert() {
        let err: CoreError = BuildError::DuplicateName("x".into()).into();
        assert!(matches!(err, CoreError::Build(BuildError::DuplicateName(_))));
    }
}
