//! # Domain Types
//!
//! Wire types exchanged with the Drively REST backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Car        │   │  Reservation    │   │     Rating      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  _id            │◄──│  car            │   │  _id            │       │
//! │  │  rental_price   │   │  user (renter)  │◄──│  reservation?   │       │
//! │  │  available      │   │  pick_up/return │   │  user (author)  │       │
//! │  │  rating_score   │   │  status         │   │  score 1-5      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ReservationStat │   │      Role       │   │  RentalPeriod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Pending        │   │  car-renter     │   │  [pick_up,      │       │
//! │  │  Accepted       │   │  car-owner      │   │   return)       │       │
//! │  │  Completed      │   │  admin          │   │  half-open      │       │
//! │  │  Cancelled      │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Backend identifiers are opaque strings serialized as `_id`. References to
//! other documents arrive either as a bare id or as a populated summary
//! object, so they are modelled as untagged enums ([`CarRef`], [`UserRef`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::membership::{Membership, MembershipTier, TierBenefits};
use crate::money::{major_units, Money};

// =============================================================================
// Calendar Dates on the Wire
// =============================================================================

/// Serde adapter for calendar dates.
///
/// Accepts `2025-05-10` as well as full timestamps such as
/// `2025-05-10T00:00:00.000Z` (reduced to their UTC date). Always writes
/// `YYYY-MM-DD`.
pub mod calendar_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc).date_naive())
    }
}

/// Parses a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    calendar_date::parse(raw).ok_or_else(|| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("'{}' is not a YYYY-MM-DD date or RFC 3339 timestamp", raw),
    })
}

// =============================================================================
// Rental Period
// =============================================================================

/// A half-open rental interval `[pick_up, return_date)`.
///
/// The return day is not billed and is free for the next renter's pick-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RentalPeriod {
    #[serde(with = "calendar_date")]
    #[ts(as = "String")]
    pick_up_date: NaiveDate,
    #[serde(with = "calendar_date")]
    #[ts(as = "String")]
    return_date: NaiveDate,
}

impl RentalPeriod {
    /// Creates a period, rejecting ranges where return is not after pick-up.
    pub fn new(pick_up_date: NaiveDate, return_date: NaiveDate) -> CoreResult<Self> {
        if return_date <= pick_up_date {
            return Err(CoreError::InvalidDateRange {
                pick_up: pick_up_date,
                return_date,
            });
        }
        Ok(RentalPeriod {
            pick_up_date,
            return_date,
        })
    }

    #[inline]
    pub fn pick_up_date(&self) -> NaiveDate {
        self.pick_up_date
    }

    #[inline]
    pub fn return_date(&self) -> NaiveDate {
        self.return_date
    }

    /// Number of billable days. Always at least 1.
    ///
    /// Calendar dates differ by whole days, so the ceiling in
    /// `ceil(return − pick_up)` is exact here.
    #[inline]
    pub fn days(&self) -> i64 {
        (self.return_date - self.pick_up_date).num_days()
    }

    /// Half-open overlap test.
    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        ranges_overlap(
            self.pick_up_date,
            self.return_date,
            other.pick_up_date,
            other.return_date,
        )
    }
}

/// `[start1, end1)` and `[start2, end2)` overlap iff
/// `start1 < end2 && start2 < end1`. Shared boundaries do not overlap.
#[inline]
pub fn ranges_overlap(start1: NaiveDate, end1: NaiveDate, start2: NaiveDate, end2: NaiveDate) -> bool {
    start1 < end2 && start2 < end1
}

// =============================================================================
// Role
// =============================================================================

/// Account role, which decides the dashboard a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    CarRenter,
    CarOwner,
    Admin,
}

// =============================================================================
// Car
// =============================================================================

/// Gearbox type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Automatic,
    Manual,
}

impl Transmission {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Transmission::Automatic => "automatic",
            Transmission::Manual => "manual",
        }
    }
}

impl FromStr for Transmission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "automatic" => Ok(Transmission::Automatic),
            "manual" => Ok(Transmission::Manual),
            _ => Err(ValidationError::NotAllowed {
                field: "transmission".to_string(),
                allowed: vec!["automatic".to_string(), "manual".to_string()],
            }),
        }
    }
}

/// Fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
            FuelType::Hybrid => "hybrid",
        }
    }
}

impl FromStr for FuelType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "petrol" => Ok(FuelType::Petrol),
            "diesel" => Ok(FuelType::Diesel),
            "electric" => Ok(FuelType::Electric),
            "hybrid" => Ok(FuelType::Hybrid),
            _ => Err(ValidationError::NotAllowed {
                field: "fuelType".to_string(),
                allowed: ["petrol", "diesel", "electric", "hybrid"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

/// A car listing.
///
/// `available` and the rating aggregates are derived by the backend; clients
/// read them but never write them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Car {
    #[serde(rename = "_id")]
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub number_plates: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Base daily price before any membership discount.
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub rental_price: Money,
    #[serde(default)]
    pub color: String,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    #[serde(default)]
    pub features: Vec<String>,
    pub available: bool,
    #[serde(default)]
    pub rating_score: f64,
    #[serde(default)]
    pub review_count: u32,
    pub created_by: UserRef,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Car {
    /// Returns the owner's id when the backend sent one.
    pub fn owner_id(&self) -> Option<&str> {
        self.created_by.id()
    }
}

/// Car fields populated inside reservation documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CarSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Reference to a car: a bare id or a populated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum CarRef {
    Id(String),
    Summary(CarSummary),
}

impl CarRef {
    pub fn id(&self) -> &str {
        match self {
            CarRef::Id(id) => id,
            CarRef::Summary(summary) => &summary.id,
        }
    }
}

/// User fields populated inside other documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserSummary {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone_number: Option<String>,
}

/// Reference to a user: a bare id or a populated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum UserRef {
    Id(String),
    Summary(UserSummary),
}

impl UserRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            UserRef::Id(id) => Some(id),
            UserRef::Summary(summary) => summary.id.as_deref(),
        }
    }

    /// Display name, falling back to "Anonymous" like the reviews list.
    pub fn display_name(&self) -> &str {
        match self {
            UserRef::Summary(UserSummary {
                name: Some(name), ..
            }) if !name.is_empty() => name,
            _ => "Anonymous",
        }
    }
}

// =============================================================================
// Reservation Status
// =============================================================================

/// Reservation lifecycle.
///
/// ## Transitions
/// ```text
///              owner accepts            system (time-based)
///   Pending ─────────────────► Accepted ─────────────────► Completed
///      │
///      │ renter cancels
///      ▼
///   Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Accepted => "accepted",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Checks the transition table.
    pub const fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Pending, ReservationStatus::Accepted)
                | (ReservationStatus::Pending, ReservationStatus::Cancelled)
                | (ReservationStatus::Accepted, ReservationStatus::Completed)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "accepted" => Ok(ReservationStatus::Accepted),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" | "canceled" => Ok(ReservationStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: ["pending", "accepted", "completed", "cancelled"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Reservation
// =============================================================================

/// A rental request and its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Reservation {
    #[serde(rename = "_id")]
    pub id: String,
    /// The renter who made the request.
    #[serde(rename = "user")]
    pub renter: UserRef,
    pub car: CarRef,
    #[serde(with = "calendar_date")]
    #[ts(as = "String")]
    pub pick_up_date: NaiveDate,
    #[serde(with = "calendar_date")]
    #[ts(as = "String")]
    pub return_date: NaiveDate,
    /// Server-computed total. The backend is the source of truth for it.
    #[serde(default, with = "major_units")]
    #[ts(type = "number")]
    pub total_price: Money,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Reservation {
    #[inline]
    pub fn car_id(&self) -> &str {
        self.car.id()
    }

    #[inline]
    pub fn renter_id(&self) -> Option<&str> {
        self.renter.id()
    }

    /// The validated rental period.
    pub fn period(&self) -> CoreResult<RentalPeriod> {
        RentalPeriod::new(self.pick_up_date, self.return_date)
    }

    /// Half-open overlap with another reservation's dates.
    pub fn overlaps(&self, other: &Reservation) -> bool {
        ranges_overlap(
            self.pick_up_date,
            self.return_date,
            other.pick_up_date,
            other.return_date,
        )
    }

    /// Checks that `next` is a legal status change for this reservation.
    pub fn ensure_transition(&self, next: ReservationStatus) -> CoreResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidStatusTransition {
                reservation_id: self.id.clone(),
                from: self.status,
                to: next,
            })
        }
    }
}

/// Body of `POST /reservations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReservationRequest {
    pub car: String,
    #[serde(with = "calendar_date")]
    #[ts(as = "String")]
    pub pick_up_date: NaiveDate,
    #[serde(with = "calendar_date")]
    #[ts(as = "String")]
    pub return_date: NaiveDate,
}

impl ReservationRequest {
    pub fn new(car_id: impl Into<String>, period: RentalPeriod) -> Self {
        ReservationRequest {
            car: car_id.into(),
            pick_up_date: period.pick_up_date(),
            return_date: period.return_date(),
        }
    }
}

// =============================================================================
// Rating
// =============================================================================

/// A review left by a renter.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Rating {
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Car under review. Absent when the rating is embedded in its car.
    #[serde(default)]
    pub car: Option<String>,
    /// Reservation the review was written for, when the backend tracks it.
    #[serde(default)]
    pub reservation: Option<String>,
    /// The author.
    pub user: UserRef,
    pub score: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Rating {
    #[inline]
    pub fn author_id(&self) -> Option<&str> {
        self.user.id()
    }
}

/// Body of `POST /cars/:id/ratings` and `PUT /cars/:id/ratings/:ratingId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RatingInput {
    pub score: u8,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<String>,
}

// =============================================================================
// Car Listing Form
// =============================================================================

/// Body of `POST /cars` (owner adds a car).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CarListing {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub number_plates: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub rental_price: Money,
    #[serde(default)]
    pub color: String,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    #[serde(default)]
    pub features: Vec<String>,
}

// =============================================================================
// User Profile
// =============================================================================

/// The signed-in user's profile as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, alias = "telephone")]
    pub telephone_number: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub membership_tier: Option<MembershipTier>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub membership_expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub membership_benefits: Option<TierBenefits>,
}

impl UserProfile {
    /// The membership record behind the tier fields.
    pub fn membership(&self) -> Membership {
        Membership {
            tier: self.membership_tier.unwrap_or_default(),
            expires_at: self.membership_expiry_date,
        }
    }
}

/// Admin edit of another account: `PUT /auth/user/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserUpdate {
    pub name: String,
    pub membership_tier: MembershipTier,
}

/// The signed-in user's own contact details: `PUT /users/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfileUpdate {
    pub name: String,
    pub telephone: String,
    pub email: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
