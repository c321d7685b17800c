//! The target platform a set of cores is built for.

use tracing::debug;

/// Collects the external HDL sources the instantiated cores depend on.
///
/// Cores that wrap a hand-written block register its file here during
/// construction so the integrator can hand the list to synthesis.
#[derive(Debug, Clone, Default)]
pub struct Platform {
    name: String,
    sources: Vec<String>,
}

impl Platform {
    /// Creates an empty platform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
        }
    }

    /// Returns the platform name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers an external source file. Registering a path twice is a no-op.
    pub fn add_source(&mut self, path: &str) {
        if self.sources.iter().any(|s| s == path) {
            return;
        }
        debug!(platform = %self.name, path, "source registered");
        self.sources.push(path.to_string());
    }

    /// Returns the registered sources in registration order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}
