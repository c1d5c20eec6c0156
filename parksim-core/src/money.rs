//! Integer currency for deterministic simulation.
//!
//! All monetary values are whole tenths of a pound stored in an `i64`.
//! Floats never enter the ledger, so every peer computes identical balances.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Money in tenths of a pound: £1.50 → `Money(15)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(pub i64);

impl Money {
    /// Units per pound.
    pub const SCALE: i64 = 10;

    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(i64::MAX);
    pub const MIN: Money = Money(i64::MIN);

    /// Whole pounds (e.g., `gbp(90)` → £90.00).
    #[inline]
    pub const fn gbp(pounds: i64) -> Self {
        Money(pounds * Self::SCALE)
    }

    /// Pounds plus tenths (e.g., `gbp_tenths(0, 3)` → £0.30).
    #[inline]
    pub const fn gbp_tenths(pounds: i64, tenths: i64) -> Self {
        Money(pounds * Self::SCALE + tenths)
    }

    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Money(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Add for Money {
    type Output = Money;
    #[inline]
    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;
    #[inline]
    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Money;
    #[inline]
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;
    #[inline]
    fn mul(self, factor: i64) -> Money {
        Money(self.0 * factor)
    }
}

/// Integer division, truncating toward zero. Division by zero yields zero.
impl Div<i64> for Money {
    type Output = Money;
    #[inline]
    fn div(self, divisor: i64) -> Money {
        if divisor == 0 {
            return Money::ZERO;
        }
        Money(self.0 / divisor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl std::fmt::Debug for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Money({} = {})", self.0, self)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        write!(f, "{}£{}.{}0", sign, abs / scale, abs % scale)
    }
}
