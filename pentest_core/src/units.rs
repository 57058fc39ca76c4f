//! # Unit Types
//!
//! Money is carried as a whole-rupiah integer wrapper so that cost
//! arithmetic stays exact. Effort and duration are plain `u64` day counts
//! named with a `_days` / `_man_days` suffix.
//!
//! ## Example
//!
//! ```rust
//! use pentest_core::units::Rupiah;
//!
//! let rate = Rupiah(1_250_000);
//! assert_eq!(rate.checked_mul(19), Some(Rupiah(23_750_000)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount of money in whole rupiah (no minor units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupiah(pub u64);

impl Rupiah {
    pub const ZERO: Rupiah = Rupiah(0);

    /// Multiply by a day or unit count, `None` on overflow
    pub fn checked_mul(self, factor: u64) -> Option<Rupiah> {
        self.0.checked_mul(factor).map(Rupiah)
    }

    pub fn checked_sub(self, other: Rupiah) -> Option<Rupiah> {
        self.0.checked_sub(other.0).map(Rupiah)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Multiplier in whole percent (100 = 1.0x)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub u32);

impl Percent {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_mul_overflow() {
        assert_eq!(Rupiah(2_000_000).checked_mul(3), Some(Rupiah(6_000_000)));
        assert_eq!(Rupiah(u64::MAX).checked_mul(2), None);
    }

    #[test]
    fn test_checked_sub_underflow() {
        assert_eq!(Rupiah(60_000_000).checked_sub(Rupiah(9_000_000)), Some(Rupiah(51_000_000)));
        assert_eq!(Rupiah(1).checked_sub(Rupiah(2)), None);
    }

    #[test]
    fn test_transparent_serialization() {
        assert_eq!(serde_json::to_string(&Rupiah(1_500_000)).unwrap(), "1500000");
        assert_eq!(serde_json::to_string(&Percent(125)).unwrap(), "125");
        let back: Rupiah = serde_json::from_str("42").unwrap();
        assert_eq!(back, Rupiah(42));
    }

    #[test]
    fn test_display() {
        assert_eq!(Rupiah(7).to_string(), "7");
        assert_eq!(Percent(15).to_string(), "15%");
    }
}
