//! # drively-core: Pure Rental Rules for Drively
//!
//! This crate holds the business rules that every Drively screen relies on,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Drively Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front-ends (web views, drively-cli)             │   │
//! │  │    Car page ──► Booking form ──► Owner queue ──► Review form    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 drively-client (typed REST client)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ drively-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │ conflict  │  │  review   │  │membership │  │   │
//! │  │   │  Quote    │  │ Resolver  │  │Eligibility│  │  Tiers    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          REST backend (external, source of truth)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (Car, Reservation, Rating, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Rental price quotes with membership discounts
//! - [`conflict`] - Overlap detection when an owner accepts a request
//! - [`review`] - Review eligibility and ownership rules
//! - [`membership`] - Tier catalogue, expiry and upgrade paths
//! - [`promotion`] - Member-only announcements
//! - [`requests`] - Owner dashboard ordering and grouping
//! - [`search`] - Car search filters and sort keys
//! - [`validation`] - Field-level input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use drively_core::pricing::quote;
//! use drively_core::{MembershipTier, Money, RentalPeriod};
//!
//! let period = RentalPeriod::new(
//!     NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 5, 12).unwrap(),
//! )
//! .unwrap();
//!
//! let q = quote(Money::from_major(1000), Some(MembershipTier::Silver), period).unwrap();
//! assert_eq!(q.days, 2);
//! assert_eq!(q.effective_price_per_day, Money::from_major(900));
//! assert_eq!(q.total, Money::from_major(1800));
//! assert_eq!(q.discount_label, "10% off (Silver)");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod conflict;
pub mod error;
pub mod membership;
pub mod money;
pub mod pricing;
pub mod promotion;
pub mod requests;
pub mod review;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use membership::{Membership, MembershipStatus, MembershipTier};
pub use money::Money;
pub use pricing::{quote, PriceQuote};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest score a rating may carry.
pub const MIN_RATING_SCORE: u8 = 1;

/// Highest score a rating may carry.
pub const MAX_RATING_SCORE: u8 = 5;

/// Maximum length of a review comment, in characters.
pub const MAX_COMMENT_LENGTH: usize = 1000;
