//! Why a `weft.toml` was rejected.

use std::path::PathBuf;

/// A project configuration that could not be read or is not usable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("malformed project file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A key that must be non-empty is empty.
    #[error("`{0}` must not be empty")]
    Missing(&'static str),

    /// A key holds a value no component can use.
    #[error("`{key}`: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
