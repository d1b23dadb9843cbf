//! # Error Types
//!
//! Domain-specific error types for drively-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  drively-core errors (this file)                                       │
//! │  ├── CoreError        - Rental rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  drively-client errors (separate crate)                                │
//! │  └── ClientError      - Transport + HTTP status mapping                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → user-facing message │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal. Every variant aborts the attempted transition
//! and is shown to the user as a message.

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;
use crate::types::ReservationStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Rental rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Return date is not strictly after the pick-up date.
    ///
    /// ## When This Occurs
    /// - Same-day rentals (`return == pick_up`)
    /// - Dates entered in the wrong order
    #[error("Return date {return_date} must be after pick-up date {pick_up}")]
    InvalidDateRange {
        pick_up: NaiveDate,
        return_date: NaiveDate,
    },

    /// Base daily price is zero or negative.
    #[error("Price per day must be positive, got {0}")]
    InvalidPrice(Money),

    /// The requested status change is not in the transition table.
    ///
    /// ## User Workflow
    /// ```text
    /// Owner clicks "Accept" on a request that was already accepted
    ///      │
    ///      ▼
    /// InvalidStatusTransition { from: Accepted, to: Accepted }
    ///      │
    ///      ▼
    /// UI shows: "Reservation r-1 is accepted, cannot change to accepted"
    /// ```
    #[error("Reservation {reservation_id} is {from}, cannot change to {to}")]
    InvalidStatusTransition {
        reservation_id: String,
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// A review already exists for this reservation.
    #[error("Reservation {reservation_id} has already been reviewed (rating {rating_id})")]
    DuplicateReview {
        reservation_id: String,
        rating_id: String,
    },

    /// The reservation set changed underneath the acceptance.
    ///
    /// ## When This Occurs
    /// - Another request covering the same dates was accepted first
    /// - The backend answered 409 because a concurrent accept won
    #[error("Could not accept reservation {reservation_id}: {reason}")]
    ConflictNotResolved {
        reservation_id: String,
        reason: String,
    },

    /// Reviews require an accepted reservation.
    #[error("Reservation {reservation_id} is {status}; only accepted reservations can be reviewed")]
    ReviewNotAllowed {
        reservation_id: String,
        status: ReservationStatus,
    },

    /// Only the author may edit or delete a review.
    #[error("Rating {rating_id} belongs to another user")]
    NotReviewAuthor { rating_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any rule runs, mostly from form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A date lies before today.
    #[error("{field} must not be in the past")]
    InPast { field: String },

    /// A lower bound is above its upper bound.
    #[error("{lower} must not be greater than {upper}")]
    OutOfOrder { lower: String, upper: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
