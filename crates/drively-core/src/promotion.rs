//! # Promotions
//!
//! Admin-managed announcements shown to Silver and Gold members.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::membership::MembershipTier;
use crate::types::calendar_date;
use crate::validation::{validate_required, ValidationResult, MAX_TITLE_LENGTH};

/// A member promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Promotion {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discount_percent: u32,
    #[serde(with = "calendar_date")]
    #[ts(as = "String")]
    pub valid_from: NaiveDate,
    #[serde(with = "calendar_date")]
    #[ts(as = "String")]
    pub valid_to: NaiveDate,
}

impl Promotion {
    /// True when `now` falls on a day between `valid_from` and `valid_to`,
    /// both inclusive.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        self.valid_from <= today && today <= self.valid_to
    }

    /// Checks the admin form.
    ///
    /// ## Rules
    /// - title required, at most 200 characters
    /// - discount between 0 and 100 percent
    /// - `valid_to` not before `valid_from`
    pub fn validate(&self) -> ValidationResult<()> {
        let title = validate_required("title", &self.title)?;
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ValidationError::TooLong {
                field: "title".to_string(),
                max: MAX_TITLE_LENGTH,
            });
        }
        if self.discount_percent > 100 {
            return Err(ValidationError::OutOfRange {
                field: "discountPercent".to_string(),
                min: 0,
                max: 100,
            });
        }
        if self.valid_to < self.valid_from {
            return Err(ValidationError::OutOfOrder {
                lower: "validFrom".to_string(),
                upper: "validTo".to_string(),
            });
        }
        Ok(())
    }
}

/// Whether a tier gets to see promotions at all.
#[inline]
pub fn sees_promotions(tier: MembershipTier) -> bool {
    tier.is_paid()
}

/// The active promotions a member of `tier` should see at `now`.
pub fn visible_promotions<'a>(
    tier: MembershipTier,
    promotions: &'a [Promotion],
    now: DateTime<Utc>,
) -> Vec<&'a Promotion> {
    if !sees_promotions(tier) {
        return Vec::new();
    }
    promotions.iter().filter(|p| p.is_active(now)).collect()
}
