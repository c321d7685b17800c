//! Parameter values for external cell instances.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A compile-time parameter value passed to an external cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    /// An integer (e.g. `CLKFBOUT_MULT`).
    Int(i64),
    /// A real number (e.g. `CLKIN_PERIOD`).
    Real(f64),
    /// A string (e.g. `COMPENSATION`).
    String(String),
    /// A boolean.
    Bool(bool),
}

impl fmt::Display for ConstValue {
    /// Formats the value as a Verilog parameter literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::Real(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            ConstValue::Real(v) => write!(f, "{v}"),
            ConstValue::String(s) => write!(f, "\"{s}\""),
            ConstValue::Bool(b) => write!(f, "{}", u8::from(*b)),
        }
    }
}

impl From<i64> for ConstValue {
    fn from(v: i64) -> Self {
        ConstValue::Int(v)
    }
}

impl From<u32> for ConstValue {
    fn from(v: u32) -> Self {
        ConstValue::Int(i64::from(v))
    }
}

impl From<f64> for ConstValue {
    fn from(v: f64) -> Self {
        ConstValue::Real(v)
    }
}

impl From<&str> for ConstValue {
    fn from(v: &str) -> Self {
        ConstValue::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verilog_literals() {
        assert_eq!(ConstValue::Int(20).to_string(), "20");
        assert_eq!(ConstValue::Real(22.0).to_string(), "22.0");
        assert_eq!(ConstValue::Real(2.5).to_string(), "2.5");
        assert_eq!(ConstValue::from("INTERNAL").to_string(), "\"INTERNAL\"");
        assert_eq!(ConstValue::Bool(true).to_string(), "1");
    }

    #[test]
    fn serde_roundtrip() {
        for val in [
            ConstValue::Int(-4),
            ConstValue::Real(22.0),
            ConstValue::String("INTERNAL".into()),
            ConstValue::Bool(false),
        ] {
            let json = serde_json::to_string(&val).unwrap();
            let restored: ConstValue = serde_json::from_str(&json).unwrap();
            assert_eq!(val, restored);
        }
    }
}
