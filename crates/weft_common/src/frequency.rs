//! Clock frequencies.
//!
//! PLL primitives are configured with an input period in nanoseconds and
//! integer multiply/divide ratios, so [`Frequency`] converts both ways and
//! scales by exact ratios.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

const NS_PER_S: f64 = 1e9;
const HZ_PER_MHZ: f64 = 1e6;

/// A clock rate in hertz.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(f64);

impl Frequency {
    /// A rate given in hertz.
    pub const fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    /// A rate given in megahertz.
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * HZ_PER_MHZ)
    }

    /// The rate of a clock with the given period.
    pub fn from_period_ns(period_ns: f64) -> Self {
        Self(NS_PER_S / period_ns)
    }

    /// Rate in hertz.
    pub fn hz(self) -> f64 {
        self.0
    }

    /// Rate in megahertz.
    pub fn mhz(self) -> f64 {
        self.0 / HZ_PER_MHZ
    }

    /// Period in nanoseconds.
    pub fn period_ns(self) -> f64 {
        NS_PER_S / self.0
    }

    /// `self * mult / div`, as a PLL feedback multiplier or output divider applies it.
    pub fn scale(self, mult: u32, div: u32) -> Self {
        Self(self.0 * f64::from(mult) / f64::from(div))
    }

    /// Whether the rate lies within `range`, given in megahertz.
    pub fn within_mhz(self, range: RangeInclusive<f64>) -> bool {
        range.contains(&self.mhz())
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// Megahertz with three decimals, trailing zeros trimmed: `50 MHz`, `909.091 MHz`.
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixed = format!("{:.3}", self.mhz());
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        write!(f, "{trimmed} MHz")
    }
}
