//! Whole-rupiah amounts.
//!
//! Prices, subtotals and totals are plain `i64` rupiah: there is no minor
//! unit, no tax line and no rounding step. The only thing that can go wrong
//! is overflow, so the arithmetic a checkout relies on is checked and an
//! oversized cart is refused rather than wrapped.
//!
//! ```rust
//! use kasir_core::money::Money;
//!
//! let kopi = Money::new(2000).checked_multiply_quantity(3).unwrap();
//! let teh = Money::new(1500).checked_multiply_quantity(2).unwrap();
//! let total = kopi.checked_add(teh).unwrap();
//!
//! assert_eq!(total.amount(), 9000);
//! assert_eq!(total.to_string(), "Rp 9.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// An amount of rupiah. Serialized as a bare JSON integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn new(rupiah: i64) -> Self {
        Money(rupiah)
    }

    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// `self × qty`, or `None` if it does not fit in an `i64`.
    ///
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// assert_eq!(Money::new(1500).checked_multiply_quantity(2), Some(Money::new(3000)));
    /// assert_eq!(Money::new(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl From<i64> for Money {
    fn from(rupiah: i64) -> Self {
        Money(rupiah)
    }
}

/// Receipt and log form: `Rp 1.234.567`, dots grouping thousands.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let len = digits.len();

        if self.0 < 0 {
            f.write_str("-")?;
        }
        f.write_str("Rp ")?;
        for (i, ch) in digits.char_indices() {
            if i > 0 && (len - i) % 3 == 0 {
                f.write_str(".")?;
            }
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Totals of persisted rows. Those were already checked on the way in.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.map(|m| m.0).sum())
    }
}
