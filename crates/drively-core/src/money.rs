//! # Money Module
//!
//! Provides the `Money` type for rental prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    1000 * 0.9 = 900.0000000000001                                       │
//! │    Math.round() then hides or exposes the error depending on input     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer satang (1/100 baht)                              │
//! │    100000 satang × 9000 bps / 10000 = 90000 satang = ฿900 exactly       │
//! │    Rounding happens once, on purpose, to a whole baht                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The REST backend sends prices as JSON numbers in baht (`"rentalPrice": 500`).
//! Fields carrying such values use [`major_units`] as their serde adapter; the
//! conversion to satang happens once at the boundary.
//!
//! ## Usage
//! ```rust
//! use drively_core::money::Money;
//!
//! let per_day = Money::from_major(1000);      // ฿1000
//! let silver = per_day.discounted_to_whole_major(1000); // 10% off
//! assert_eq!(silver, Money::from_major(900));
//! assert_eq!((silver * 2).to_string(), "฿1800");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Minor units (satang) per major unit (baht).
pub const MINOR_PER_MAJOR: i64 = 100;

/// Basis points in 100%.
pub const BPS_SCALE: i64 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (satang).
///
/// ## Where Money is Used
/// ```text
/// Car.rental_price ──► PriceQuote.original_price_per_day
///                           │
///                           ├──► tier discount, rounded to whole baht
///                           │         │
///                           │         ▼
///                           │    PriceQuote.effective_price_per_day × days
///                           │         │
///                           ▼         ▼
///                 original_total    total ──► Reservation.total_price
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from satang.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole baht.
    ///
    /// ## Example
    /// ```rust
    /// use drively_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(425).minor(), 42_500);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Returns the value in satang.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole-baht portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the satang portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns true when there is no satang remainder.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % MINOR_PER_MAJOR == 0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Applies a discount and rounds the result half-up to a whole baht.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (1000 = 10%)
    ///
    /// ## Rounding
    /// Computes `round_half_up(self × (1 − discount))` in one step with
    /// 128-bit integers: `floor((n + d/2) / d)` where
    /// `n = satang × (10000 − bps)` and `d = 10000 × 100`.
    /// With a zero discount this simply rounds to the nearest baht.
    ///
    /// ## Example
    /// ```rust
    /// use drively_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(500).discounted_to_whole_major(1500), Money::from_major(425));
    /// assert_eq!(Money::from_major(999).discounted_to_whole_major(1000), Money::from_major(899));
    /// assert_eq!(Money::from_major(3).discounted_to_whole_major(1500), Money::from_major(3));
    /// ```
    pub fn discounted_to_whole_major(&self, discount_bps: u32) -> Money {
        let keep_bps = BPS_SCALE as i128 - discount_bps as i128;
        let numerator = self.0 as i128 * keep_bps;
        let denominator = BPS_SCALE as i128 * MINOR_PER_MAJOR as i128;
        let major = (numerator + denominator / 2).div_euclid(denominator);
        Money::from_major(major as i64)
    }

    /// Multiplies a per-day price by a number of days.
    #[inline]
    pub const fn multiply_days(&self, days: i64) -> Self {
        Money(self.0 * days)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows whole amounts without decimals (`฿900`), otherwise two places
/// (`฿899.50`), matching how prices appear on the car page.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let major = self.major().abs();
        if self.is_whole() {
            write!(f, "{}฿{}", sign, major)
        } else {
            write!(f, "{}฿{}.{:02}", sign, major, self.minor_part())
        }
    }
}

/// Parses a baht amount such as `1000`, `259.99` or `฿899.5`.
///
/// At most two decimal places; no floating point is involved.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let raw = s.trim();
        let raw = raw.strip_prefix('฿').unwrap_or(raw);
        let (negative, raw) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a number of baht"));
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = whole.parse().map_err(|_| invalid("amount too large"))?;
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad decimals"))? * 10,
            _ => fraction.parse::<i64>().map_err(|_| invalid("bad decimals"))?,
        };

        let total = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;
        Ok(Money(if negative { -total } else { total }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, days: i64) -> Self {
        Money(self.0 * days)
    }
}

// =============================================================================
// Wire Adapter
// =============================================================================

/// Serde adapter for prices the backend sends as baht numbers.
///
/// ```rust
/// use drively_core::money::{major_units, Money};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Listing {
///     #[serde(with = "major_units")]
///     price: Money,
/// }
///
/// let listing: Listing = serde_json::from_str(r#"{"price": 259.99}"#).unwrap();
/// assert_eq!(listing.price.minor(), 25_999);
/// assert_eq!(serde_json::to_string(&Listing { price: Money::from_major(500) }).unwrap(), r#"{"price":500}"#);
/// ```
pub mod major_units {
    use super::{Money, MINOR_PER_MAJOR};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if money.is_whole() {
            serializer.serialize_i64(money.major())
        } else {
            serializer.serialize_f64(money.minor() as f64 / MINOR_PER_MAJOR as f64)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let major = f64::deserialize(deserializer)?;
        if !major.is_finite() {
            return Err(serde::de::Error::custom("price must be a finite number"));
        }
        Ok(Money::from_minor((major * MINOR_PER_MAJOR as f64).round() as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
