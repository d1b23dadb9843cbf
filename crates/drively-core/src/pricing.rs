//! # Pricing Engine
//!
//! Computes what a rental costs for a given tier and date range.
//!
//! ## Calculation Order
//! ```text
//! base price/day ──► discount by tier ──► round half-up to whole baht
//!                                                 │
//!                                                 ▼
//!                           effective price/day × days = total
//! ```
//!
//! Basic members and guests pay the base price as listed, satang included;
//! only a paid-tier discount is rounded.
//!
//! The discount is rounded once per day, never on the total, so
//! `total == days × effective_price_per_day` always holds. The tier is
//! resolved when the quote is computed; nothing is frozen at booking time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::membership::{Membership, MembershipTier};
use crate::money::{major_units, Money};
use crate::types::RentalPeriod;

/// A priced rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceQuote {
    pub days: i64,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub original_price_per_day: Money,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub effective_price_per_day: Money,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub original_total: Money,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub total: Money,
    /// `"10% off (Silver)"`, `"15% off (Gold)"`, or empty.
    pub discount_label: String,
}

impl PriceQuote {
    /// Amount saved against the undiscounted price.
    #[inline]
    pub fn savings(&self) -> Money {
        self.original_total - self.total
    }

    /// True when the quote shows a strikethrough price.
    #[inline]
    pub fn has_discount(&self) -> bool {
        !self.discount_label.is_empty()
    }
}

/// Label shown next to a discounted price.
pub fn discount_label(tier: Option<MembershipTier>) -> String {
    match tier {
        Some(tier) if tier.discount_bps() > 0 => {
            format!("{}% off ({})", tier.discount_percent(), tier.display_name())
        }
        _ => String::new(),
    }
}

/// Discounted daily price, rounded half-up to a whole baht. Without a
/// discount the base price is returned untouched.
pub fn effective_price_per_day(base_price_per_day: Money, tier: Option<MembershipTier>) -> Money {
    match tier.map(|t| t.discount_bps()).unwrap_or(0) {
        0 => base_price_per_day,
        bps => base_price_per_day.discounted_to_whole_major(bps),
    }
}

/// Prices a rental.
///
/// ## Errors
/// - [`CoreError::InvalidPrice`] when `base_price_per_day` is not positive
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use drively_core::pricing::quote;
/// use drively_core::{MembershipTier, Money, RentalPeriod};
///
/// let period = RentalPeriod::new(
///     NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 5, 13).unwrap(),
/// )
/// .unwrap();
/// let q = quote(Money::from_major(500), Some(MembershipTier::Gold), period).unwrap();
/// assert_eq!(q.effective_price_per_day, Money::from_major(425));
/// assert_eq!(q.total, Money::from_major(1275));
/// assert_eq!(q.savings(), Money::from_major(225));
/// ```
pub fn quote(
    base_price_per_day: Money,
    tier: Option<MembershipTier>,
    period: RentalPeriod,
) -> CoreResult<PriceQuote> {
    if !base_price_per_day.is_positive() {
        return Err(CoreError::InvalidPrice(base_price_per_day));
    }

    let days = period.days();
    let effective = effective_price_per_day(base_price_per_day, tier);

    Ok(PriceQuote {
        days,
        original_price_per_day: base_price_per_day,
        effective_price_per_day: effective,
        original_total: base_price_per_day.multiply_days(days),
        total: effective.multiply_days(days),
        discount_label: discount_label(tier),
    })
}

/// Prices raw dates, checking the range first.
///
/// ## Errors
/// - [`CoreError::InvalidDateRange`] when `return_date <= pick_up_date`
/// - [`CoreError::InvalidPrice`] when the price is not positive
pub fn quote_dates(
    base_price_per_day: Money,
    tier: Option<MembershipTier>,
    pick_up_date: NaiveDate,
    return_date: NaiveDate,
) -> CoreResult<PriceQuote> {
    let period = RentalPeriod::new(pick_up_date, return_date)?;
    quote(base_price_per_day, tier, period)
}

/// Prices a rental for a member, resolving their tier at `now`.
pub fn quote_for_member(
    base_price_per_day: Money,
    membership: &Membership,
    now: DateTime<Utc>,
    period: RentalPeriod,
) -> CoreResult<PriceQuote> {
    quote(base_price_per_day, Some(membership.effective_tier(now)), period)
}

// =============================================================================
// Unit Tests
// =============================================================================
