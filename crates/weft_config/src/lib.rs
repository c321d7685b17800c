//! The `weft.toml` project file.
//!
//! [`load_config`] reads the file from a project directory into a
//! [`ProjectConfig`]: the components to generate, CPU and clocking
//! parameters, the output directory and lint overrides. Sections other than
//! `[project]` are optional and fall back to defaults. Checks that need the
//! hardware model, such as VCO range, happen when a component is built.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
