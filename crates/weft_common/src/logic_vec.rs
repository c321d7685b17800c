//! Fixed-width vectors of 4-state logic values.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector of [`Logic`] values, index 0 being the least significant bit.
///
/// Netlists here are narrow (at most a bus word), so the vector simply
/// stores one `Logic` per bit.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicVec {
    bits: Vec<Logic>,
}

impl LogicVec {
    /// Creates a vector of the given width with every bit set to `value`.
    pub fn filled(width: u32, value: Logic) -> Self {
        Self {
            bits: vec![value; width as usize],
        }
    }

    /// Creates an all-zero vector.
    pub fn zero(width: u32) -> Self {
        Self::filled(width, Logic::Zero)
    }

    /// Creates an all-`X` vector.
    pub fn unknown(width: u32) -> Self {
        Self::filled(width, Logic::X)
    }

    /// Creates a vector from the low `width` bits of `value`.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let bits = (0..width)
            .map(|i| Logic::from_bool(i < 64 && (value >> i) & 1 == 1))
            .collect();
        Self { bits }
    }

    /// Creates a vector from individual bits, LSB first.
    pub fn from_bits(bits: Vec<Logic>) -> Self {
        Self { bits }
    }

    /// Returns the number of bits.
    pub fn width(&self) -> u32 {
        self.bits.len() as u32
    }

    /// Returns bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        self.bits[index as usize]
    }

    /// Sets bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: Logic) {
        self.bits[index as usize] = value;
    }

    /// Returns the integer value, or `None` if any bit is `X` or `Z`.
    pub fn to_u64(&self) -> Option<u64> {
        let mut out = 0u64;
        for (i, bit) in self.bits.iter().enumerate().take(64) {
            if bit.to_bool()? {
                out |= 1 << i;
            }
        }
        Some(out)
    }

    /// Returns `true` if no bit is `X` or `Z`.
    pub fn is_known(&self) -> bool {
        self.bits.iter().all(|b| b.is_known())
    }

    /// Iterates over the bits, LSB first.
    pub fn iter(&self) -> impl Iterator<Item = Logic> + '_ {
        self.bits.iter().copied()
    }

    /// Applies `f` bitwise to two vectors of equal width.
    ///
    /// # Panics
    ///
    /// Panics if the widths differ.
    pub fn zip_with(&self, other: &LogicVec, f: impl Fn(Logic, Logic) -> Logic) -> LogicVec {
        assert_eq!(self.width(), other.width(), "width mismatch in bitwise op");
        LogicVec {
            bits: self
                .bits
                .iter()
                .zip(&other.bits)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        }
    }

    /// Applies `f` to every bit.
    pub fn map(&self, f: impl Fn(Logic) -> Logic) -> LogicVec {
        LogicVec {
            bits: self.bits.iter().map(|b| f(*b)).collect(),
        }
    }
}

impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().rev() {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'b{}", self.width(), self)
    }
}
