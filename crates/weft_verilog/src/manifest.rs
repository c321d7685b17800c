//! The `manifest.json` written next to emitted Verilog.

use serde::{Deserialize, Serialize};
use weft_common::{ContentHash, Interner};
use weft_netlist::{CsrAccess, Module};

/// One register field in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrEntry {
    /// Field name.
    pub name: String,
    /// Word address.
    pub address: u32,
    /// Width in bits.
    pub width: u32,
    /// Host access mode.
    pub access: CsrAccess,
}

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    /// File name relative to the output directory.
    pub path: String,
    /// Hash of the file contents.
    pub hash: ContentHash,
}

/// One emitted module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestModule {
    /// Module name.
    pub name: String,
    /// The emitted Verilog file.
    pub file: ManifestFile,
    /// External HDL sources the integrator must add to the build.
    pub sources: Vec<String>,
    /// The module's register map, in address order.
    pub csr: Vec<CsrEntry>,
}

/// Everything a build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Project name.
    pub project: String,
    /// Emitted modules, in build order.
    pub modules: Vec<ManifestModule>,
}

impl Manifest {
    /// Creates an empty manifest for `project`.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            modules: Vec::new(),
        }
    }

    /// Records `module`, emitted as `path` with contents `text`.
    pub fn add(&mut self, module: &Module, interner: &Interner, path: &str, text: &str) {
        let csr = module
            .csr
            .iter()
            .map(|f| CsrEntry {
                name: interner.resolve(f.name).to_string(),
                address: f.address,
                width: f.width,
                access: f.access,
            })
            .collect();
        self.modules.push(ManifestModule {
            name: interner.resolve(module.name).to_string(),
            file: ManifestFile {
                path: path.to_string(),
                hash: ContentHash::from_bytes(text.as_bytes()),
            },
            sources: module.sources.clone(),
            csr,
        });
    }

    /// Serializes the manifest as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
