//! How serious a diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic. Variants are ordered so `max` picks the worst.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Extra context attached to another finding.
    Note,
    /// Emission continues.
    Warning,
    /// Emission is refused.
    Error,
}

impl Severity {
    /// Lowercase label used in rendered output and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Returns `true` for [`Severity::Error`].
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_wins() {
        let worst = [Severity::Warning, Severity::Error, Severity::Note]
            .into_iter()
            .max();
        assert_eq!(worst, Some(Severity::Error));
        assert!(!Severity::Warning.is_error());
    }

    #[test]
    fn label_matches_json() {
        for sev in [Severity::Note, Severity::Warning, Severity::Error] {
            let json = serde_json::to_string(&sev).unwrap();
            assert_eq!(json, format!("\"{sev}\""));
        }
    }
}
