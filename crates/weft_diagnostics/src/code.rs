//! Lint and design-rule codes such as `E101` or `C201`.
//!
//! Codes are written to JSON output and accepted in `allow`/`deny` lists,
//! so they serialize as their display string rather than as a struct.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Which family a code belongs to. Selects the leading letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    /// `E`: the netlist is not emittable.
    Error,
    /// `W`: suspicious but legal.
    Warning,
    /// `C`: clock-domain crossing and synchronizer findings.
    Clocking,
}

impl Category {
    const ALL: [Category; 3] = [Category::Error, Category::Warning, Category::Clocking];

    /// The letter a code in this category starts with.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Clocking => 'C',
        }
    }

    /// Inverse of [`prefix`](Self::prefix).
    pub fn from_prefix(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|cat| cat.prefix() == c)
    }
}

/// A category letter followed by a three-digit number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DiagnosticCode {
    /// The family of the code.
    pub category: Category,
    /// The number within the family.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a code from its parts.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// A string that does not spell a diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a diagnostic code (expected a letter E, W or C and three digits)")]
pub struct ParseCodeError(String);

impl FromStr for DiagnosticCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCodeError(s.to_string());
        let mut chars = s.chars();
        let category = chars
            .next()
            .and_then(Category::from_prefix)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse().map_err(|_| invalid())?;
        Ok(Self { category, number })
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DiagnosticCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
