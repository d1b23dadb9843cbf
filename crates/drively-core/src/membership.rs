//! # Membership Tiers
//!
//! Tier discounts, expiry handling and upgrade paths.
//!
//! ## Tier Ladder
//! ```text
//! ┌──────────────┐  upgrade   ┌──────────────┐  upgrade   ┌──────────────┐
//! │    Basic     │ ─────────► │    Silver    │ ─────────► │     Gold     │
//! │  0% • Free   │            │ 10% • 259.99 │            │ 15% • 499.99 │
//! └──────────────┘            └──────┬───────┘            └──────┬───────┘
//!        ▲                           │ expires                   │ expires
//!        └───────────────────────────┴───────────────────────────┘
//! ```
//!
//! Paid tiers carry an expiry timestamp. Once it passes, the member prices
//! as Basic until they renew. The clock is always passed in by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Membership Tier
// =============================================================================

/// Membership level attached to a renter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    #[default]
    Basic,
    Silver,
    Gold,
}

impl MembershipTier {
    /// All tiers, cheapest first.
    pub const ALL: [MembershipTier; 3] = [
        MembershipTier::Basic,
        MembershipTier::Silver,
        MembershipTier::Gold,
    ];

    /// Discount on the daily price, in basis points.
    pub const fn discount_bps(&self) -> u32 {
        match self {
            MembershipTier::Basic => 0,
            MembershipTier::Silver => 1000,
            MembershipTier::Gold => 1500,
        }
    }

    /// Whole-percent discount (10 for Silver).
    pub const fn discount_percent(&self) -> u32 {
        self.discount_bps() / 100
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            MembershipTier::Basic => "basic",
            MembershipTier::Silver => "silver",
            MembershipTier::Gold => "gold",
        }
    }

    /// Capitalized name used in labels and the tier page.
    pub const fn display_name(&self) -> &'static str {
        match self {
            MembershipTier::Basic => "Basic",
            MembershipTier::Silver => "Silver",
            MembershipTier::Gold => "Gold",
        }
    }

    #[inline]
    pub const fn is_paid(&self) -> bool {
        !matches!(self, MembershipTier::Basic)
    }

    /// Tiers this one can be upgraded to.
    pub fn upgrade_options(&self) -> Vec<MembershipTier> {
        MembershipTier::ALL
            .into_iter()
            .filter(|tier| tier > self)
            .collect()
    }

    pub const fn benefits(&self) -> TierBenefits {
        match self {
            MembershipTier::Basic => TierBenefits {
                discount_rate: 0.0,
                free_delivery: false,
                priority_support: false,
                extra_driver_option: false,
            },
            MembershipTier::Silver => TierBenefits {
                discount_rate: 0.10,
                free_delivery: true,
                priority_support: true,
                extra_driver_option: false,
            },
            MembershipTier::Gold => TierBenefits {
                discount_rate: 0.15,
                free_delivery: true,
                priority_support: true,
                extra_driver_option: true,
            },
        }
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(MembershipTier::Basic),
            "silver" => Ok(MembershipTier::Silver),
            "gold" => Ok(MembershipTier::Gold),
            _ => Err(ValidationError::NotAllowed {
                field: "tier".to_string(),
                allowed: MembershipTier::ALL
                    .iter()
                    .map(|tier| tier.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

/// Benefit flags as the backend reports them on the user profile.
///
/// `discount_rate` is informational only; pricing always uses
/// [`MembershipTier::discount_bps`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TierBenefits {
    #[serde(default)]
    pub discount_rate: f64,
    #[serde(default)]
    pub free_delivery: bool,
    #[serde(default)]
    pub priority_support: bool,
    #[serde(default)]
    pub extra_driver_option: bool,
}

// =============================================================================
// Membership
// =============================================================================

/// A renter's membership: stored tier plus optional expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Membership {
    pub tier: MembershipTier,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Membership {
    pub fn new(tier: MembershipTier, expires_at: Option<DateTime<Utc>>) -> Self {
        Membership { tier, expires_at }
    }

    /// True once a recorded expiry is at or before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expiry) if expiry <= now)
    }

    /// The tier to price with at `now`.
    ///
    /// A paid tier past its expiry prices as Basic.
    pub fn effective_tier(&self, now: DateTime<Utc>) -> MembershipTier {
        if self.tier.is_paid() && self.is_expired(now) {
            MembershipTier::Basic
        } else {
            self.tier
        }
    }

    /// Time left as `"{d}d {h}h {m}m"`, `"Expired"` once past, or `None`
    /// when there is no expiry.
    pub fn countdown(&self, now: DateTime<Utc>) -> Option<String> {
        let expiry = self.expires_at?;
        let remaining = expiry - now;
        if remaining <= chrono::Duration::zero() {
            return Some("Expired".to_string());
        }
        let days = remaining.num_days();
        let hours = remaining.num_hours() % 24;
        let minutes = remaining.num_minutes() % 60;
        Some(format!("{}d {}h {}m", days, hours, minutes))
    }

    /// A paid tier can be renewed only after it has expired.
    pub fn can_renew(&self, now: DateTime<Utc>) -> bool {
        self.tier.is_paid() && self.is_expired(now)
    }

    /// Upgrade targets, based on the effective tier at `now`.
    pub fn upgrade_options(&self, now: DateTime<Utc>) -> Vec<MembershipTier> {
        self.effective_tier(now).upgrade_options()
    }
}

/// Body of `GET /membership/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MembershipStatus {
    #[serde(default)]
    pub membership_tier: MembershipTier,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub membership_expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub membership_benefits: Option<TierBenefits>,
}

impl MembershipStatus {
    pub fn membership(&self) -> Membership {
        Membership::new(self.membership_tier, self.membership_expiry_date)
    }
}

// =============================================================================
// Tier Catalogue
// =============================================================================

/// One card on the membership page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TierInfo {
    pub tier: MembershipTier,
    pub name: String,
    /// Annual price. Zero for Basic.
    #[serde(with = "crate::money::major_units")]
    #[ts(type = "number")]
    pub price: Money,
    pub description: String,
    pub features: Vec<String>,
}

impl TierInfo {
    /// `"Free"` or the formatted annual price.
    pub fn price_label(&self) -> String {
        if self.price.is_zero() {
            "Free".to_string()
        } else {
            self.price.to_string()
        }
    }
}

/// The three tiers in display order.
pub fn tier_catalogue() -> Vec<TierInfo> {
    fn features(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    vec![
        TierInfo {
            tier: MembershipTier::Basic,
            name: "Basic".to_string(),
            price: Money::zero(),
            description: "Essential features for car rentals".to_string(),
            features: features(&[
                "Standard booking system",
                "Basic customer support",
                "Regular pricing",
            ]),
        },
        TierInfo {
            tier: MembershipTier::Silver,
            name: "Silver".to_string(),
            price: Money::from_minor(25_999),
            description: "Enhanced features for frequent renters".to_string(),
            features: features(&[
                "10% discount on all rentals",
                "Free delivery service",
                "Priority customer support",
            ]),
        },
        TierInfo {
            tier: MembershipTier::Gold,
            name: "Gold".to_string(),
            price: Money::from_minor(49_999),
            description: "Premium benefits for luxury experience".to_string(),
            features: features(&[
                "15% discount on all rentals",
                "Free delivery service",
                "Priority customer support",
                "Extra driver option included",
            ]),
        },
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
