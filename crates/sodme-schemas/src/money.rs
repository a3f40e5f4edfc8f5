//! Fixed-point money type.
//!
//! All monetary and price fields in SODME — margin, P&L, premiums, costs —
//! use a 1e-6 (micros) fixed-point representation stored as `i64`. Plain
//! `i64` would let a quantity or a token id get summed into a rupee amount
//! without any compile-time signal; `Paise` closes that hole.
//!
//! 1 rupee = 1_000_000 `Paise` units (the name keeps the INR framing while
//! using micro-rupee precision, since NSE premiums and SPAN margins carry
//! sub-paise fractional components during multiplier chains).
//!
//! `Add`/`Sub`/`Neg` panic on overflow in debug and wrap in release, matching
//! `i64`. `saturating_add`/`saturating_sub` clamp instead. `checked_mul_lots`
//! multiplies a per-unit price by an integer lot count with explicit overflow
//! detection — callers must handle `None`.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A fixed-point monetary amount at 1e-6 rupee scale.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Paise(i64);

impl Paise {
    pub const ZERO: Paise = Paise(0);
    pub const MAX: Paise = Paise(i64::MAX);
    pub const MIN: Paise = Paise(i64::MIN);

    /// Scale factor: units per rupee.
    pub const PER_RUPEE: i64 = 1_000_000;

    #[inline]
    pub const fn new(raw: i64) -> Self {
        Paise(raw)
    }

    /// Construct from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Paise(rupees * Self::PER_RUPEE)
    }

    /// Construct from a rupee amount carrying a fractional part, expressed
    /// as rupees and hundredths-of-a-paise-scale micros directly.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Paise(micros)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Lossy conversion for classification math (percentages, ratios) that
    /// never feeds back into a stored monetary total.
    #[inline]
    pub fn to_f64_rupees(self) -> f64 {
        self.0 as f64 / Self::PER_RUPEE as f64
    }

    #[inline]
    pub fn from_f64_rupees(rupees: f64) -> Self {
        Paise((rupees * Self::PER_RUPEE as f64).round() as i64)
    }

    #[inline]
    pub fn saturating_add(self, rhs: Paise) -> Paise {
        Paise(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Paise) -> Paise {
        Paise(self.0.saturating_sub(rhs.0))
    }

    #[inline]
    pub fn abs(self) -> Paise {
        Paise(self.0.saturating_abs())
    }

    #[inline]
    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    #[inline]
    pub fn is_non_negative(self) -> bool {
        self.0 >= 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply a per-unit price by an integer lot/share quantity.
    /// Returns `None` on overflow; callers must handle it explicitly.
    #[inline]
    pub fn checked_mul_qty(self, qty: i64) -> Option<Paise> {
        self.0.checked_mul(qty).map(Paise)
    }

    /// Scale by a percentage expressed as a fraction (e.g. 0.03 for 3%).
    /// Used for exposure-margin and premium-margin computation, which are
    /// genuinely fractional and cannot stay purely integral.
    #[inline]
    pub fn scaled_by(self, factor: f64) -> Paise {
        Paise((self.0 as f64 * factor).round() as i64)
    }

    /// `self / total * 100`, saturating to `0.0` when `total` is zero.
    #[inline]
    pub fn pct_of(self, total: Paise) -> f64 {
        if total.0 == 0 {
            0.0
        } else {
            self.0 as f64 / total.0 as f64 * 100.0
        }
    }
}

impl Add for Paise {
    type Output = Paise;
    #[inline]
    fn add(self, rhs: Paise) -> Paise {
        Paise(self.0 + rhs.0)
    }
}

impl Sub for Paise {
    type Output = Paise;
    #[inline]
    fn sub(self, rhs: Paise) -> Paise {
        Paise(self.0 - rhs.0)
    }
}

impl Neg for Paise {
    type Output = Paise;
    #[inline]
    fn neg(self) -> Paise {
        Paise(-self.0)
    }
}

impl AddAssign for Paise {
    #[inline]
    fn add_assign(&mut self, rhs: Paise) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Paise {
    #[inline]
    fn sub_assign(&mut self, rhs: Paise) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for Paise {
    type Output = Paise;
    #[inline]
    fn mul(self, rhs: i64) -> Paise {
        Paise(self.0 * rhs)
    }
}

impl std::fmt::Display for Paise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rupees = self.0 / Self::PER_RUPEE;
        let frac = (self.0 % Self::PER_RUPEE).abs();
        if self.0 < 0 && rupees == 0 {
            write!(f, "-{rupees}.{frac:06}")
        } else {
            write!(f, "{rupees}.{frac:06}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_additive_identity() {
        let a = Paise::from_rupees(42);
        assert_eq!(a + Paise::ZERO, a);
    }

    #[test]
    fn add_sub_roundtrip() {
        let a = Paise::from_rupees(100);
        let b = Paise::from_rupees(25);
        assert_eq!((a + b) - b, a);
    }

    #[test]
    fn checked_mul_qty_overflow_returns_none() {
        assert_eq!(Paise::MAX.checked_mul_qty(2), None);
    }

    #[test]
    fn scaled_by_percentage() {
        let value = Paise::from_rupees(1_000_000);
        let exposure = value.scaled_by(0.03);
        assert_eq!(exposure, Paise::from_rupees(30_000));
    }

    #[test]
    fn pct_of_total() {
        let total = Paise::from_rupees(200);
        let part = Paise::from_rupees(50);
        assert!((part.pct_of(total) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn display_formats_six_decimals() {
        let m = Paise::from_micros(1_500_000);
        assert_eq!(format!("{m}"), "1.500000");
    }

    #[test]
    fn display_negative_sub_rupee() {
        let m = Paise::from_micros(-250_000);
        assert_eq!(format!("{m}"), "-0.250000");
    }
}
