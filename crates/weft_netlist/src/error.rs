//! Errors raised while building a module.

/// Misuse of [`ModuleBuilder`](crate::builder::ModuleBuilder) detected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Two signals, cells, domains or CSR fields share a name.
    #[error("duplicate name '{0}'")]
    DuplicateName(String),

    /// A name that cannot be emitted as a Verilog identifier.
    #[error("'{0}' is not a valid Verilog identifier")]
    InvalidName(String),

    /// A signal was declared with zero width.
    #[error("signal '{0}' must be at least one bit wide")]
    ZeroWidth(String),

    /// A bit or slice reference falls outside the signal.
    #[error("bit {index} out of range for '{signal}' ({width} bits)")]
    BitOutOfRange {
        /// The referenced signal.
        signal: String,
        /// The offending bit index.
        index: u32,
        /// The signal width.
        width: u32,
    },

    /// A slice with `high < low`.
    #[error("slice [{high}:{low}] of '{signal}' is reversed")]
    ReversedSlice {
        /// The referenced signal.
        signal: String,
        /// The high index.
        high: u32,
        /// The low index.
        low: u32,
    },

    /// A signal was exposed as a port twice.
    #[error("signal '{0}' is already a port")]
    AlreadyPort(String),

    /// A CSR field does not fit in one data word.
    #[error("csr field '{name}' is {width} bits wide; at most {max} are supported")]
    CsrTooWide {
        /// The field name.
        name: String,
        /// The requested width.
        width: u32,
        /// The CSR data width.
        max: u32,
    },

    /// A synchronizer needs at least two stages.
    #[error("synchronizer '{name}' needs at least 2 stages, got {stages}")]
    TooFewStages {
        /// The cell name.
        name: String,
        /// The requested depth.
        stages: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            BuildError::DuplicateName("clkin".into()).to_string(),
            "duplicate name 'clkin'"
        );
        assert_eq!(
            BuildError::BitOutOfRange {
                signal: "cpu_ad_i".into(),
                index: 32,
                width: 32
            }
            .to_string(),
            "bit 32 out of range for 'cpu_ad_i' (32 bits)"
        );
        assert!(BuildError::CsrTooWide {
            name: "x".into(),
            width: 9,
            max: 8
        }
        .to_string()
        .contains("at most 8"));
    }
}
