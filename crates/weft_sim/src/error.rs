//! Simulation error types.

/// Errors raised by [`Simulator`](crate::Simulator) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// No signal with this name exists.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// The signal is driven inside the module and cannot be set from outside.
    #[error("signal '{0}' is driven inside the module and cannot be poked")]
    NotPokeable(String),

    /// No clock domain with this name exists.
    #[error("unknown clock domain '{0}'")]
    UnknownDomain(String),

    /// No CSR field with this name exists.
    #[error("unknown csr field '{0}'")]
    UnknownField(String),

    /// The module declares no CSR fields.
    #[error("module has no csr bus")]
    NoCsrBus,

    /// A value has the wrong width for its signal.
    #[error("'{signal}' is {expected} bits wide, got a {got}-bit value")]
    WidthMismatch {
        /// The signal name.
        signal: String,
        /// The signal width.
        expected: u32,
        /// The value width.
        got: u32,
    },

    /// A value contains `x` or `z` bits where a number was requested.
    #[error("value of '{signal}' is not fully known: {value}")]
    UnknownValue {
        /// The signal name.
        signal: String,
        /// The value, MSB first.
        value: String,
    },

    /// Combinational settling did not converge.
    #[error("combinational logic did not settle after {iterations} iterations")]
    CombinationalLoop {
        /// The iteration limit that was hit.
        iterations: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            SimError::NotPokeable("locked".into()).to_string(),
            "signal 'locked' is driven inside the module and cannot be poked"
        );
        assert_eq!(
            SimError::WidthMismatch {
                signal: "cpu_ad_i".into(),
                expected: 32,
                got: 8
            }
            .to_string(),
            "'cpu_ad_i' is 32 bits wide, got a 8-bit value"
        );
        assert_eq!(
            SimError::CombinationalLoop { iterations: 12 }.to_string(),
            "combinational logic did not settle after 12 iterations"
        );
    }
}
