//! # Validation Module
//!
//! Field-level checks run before a form is sent to the backend.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Form input                                                   │
//! │  └── THIS MODULE: required fields, ranges, lengths, dates              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Domain rules                                                 │
//! │  └── pricing / conflict / review (CoreError)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST backend                                                 │
//! │  └── authoritative; may still answer 400 or 409                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use drively_core::validation::{validate_comment, validate_rating_score};
//!
//! assert!(validate_rating_score(5).is_ok());
//! assert!(validate_rating_score(0).is_err());
//! assert_eq!(validate_comment("  Clean car  ").unwrap(), "Clean car");
//! ```

use chrono::{Datelike, NaiveDate};

use crate::error::{CoreResult, ValidationError};
use crate::types::{CarListing, ProfileUpdate, RatingInput, RentalPeriod, UserUpdate};
use crate::{MAX_COMMENT_LENGTH, MAX_RATING_SCORE, MIN_RATING_SCORE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Oldest model year accepted for a listing.
pub const MIN_CAR_YEAR: i32 = 1900;

/// Longest accepted promotion title, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Trims `value` and rejects it when nothing is left.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validates a review comment and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 1000 characters
pub fn validate_comment(comment: &str) -> ValidationResult<String> {
    let comment = validate_required("comment", comment)?;
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(ValidationError::TooLong {
            field: "comment".to_string(),
            max: MAX_COMMENT_LENGTH,
        });
    }
    Ok(comment)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a star score (1 to 5).
pub fn validate_rating_score(score: u8) -> ValidationResult<()> {
    if !(MIN_RATING_SCORE..=MAX_RATING_SCORE).contains(&score) {
        return Err(ValidationError::OutOfRange {
            field: "score".to_string(),
            min: MIN_RATING_SCORE as i64,
            max: MAX_RATING_SCORE as i64,
        });
    }
    Ok(())
}

/// Validates a model year against the current year.
///
/// Next year's models are accepted.
pub fn validate_car_year(year: i32, current_year: i32) -> ValidationResult<()> {
    if year < MIN_CAR_YEAR || year > current_year + 1 {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: MIN_CAR_YEAR as i64,
            max: (current_year + 1) as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the review form and builds the request body.
pub fn validate_rating_input(score: u8, comment: &str) -> ValidationResult<RatingInput> {
    validate_rating_score(score)?;
    let comment = validate_comment(comment)?;
    Ok(RatingInput {
        score,
        comment,
        reservation: None,
    })
}

/// Validates the "add car" form.
///
/// ## Rules
/// - make, model and number plates are required
/// - year between 1900 and next year
/// - daily price strictly positive
pub fn validate_car_listing(listing: &CarListing, today: NaiveDate) -> ValidationResult<()> {
    validate_required("make", &listing.make)?;
    validate_required("model", &listing.model)?;
    validate_required("numberPlates", &listing.number_plates)?;
    validate_car_year(listing.year, today.year())?;
    if !listing.rental_price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "rentalPrice".to_string(),
        });
    }
    Ok(())
}

/// Validates an email address loosely: one `@` with text on both sides and a
/// dot in the domain. The backend does the real check.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = validate_required("email", email)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@domain".to_string(),
        });
    }
    Ok(email)
}

/// Validates the admin "edit user" form and returns it trimmed.
pub fn validate_user_update(update: &UserUpdate) -> ValidationResult<UserUpdate> {
    Ok(UserUpdate {
        name: validate_required("name", &update.name)?,
        membership_tier: update.membership_tier,
    })
}

/// Validates the profile form and returns it trimmed. Every field is
/// required.
pub fn validate_profile_update(update: &ProfileUpdate) -> ValidationResult<ProfileUpdate> {
    Ok(ProfileUpdate {
        name: validate_required("name", &update.name)?,
        telephone: validate_required("telephone", &update.telephone)?,
        email: validate_email(&update.email)?,
    })
}

/// Validates a booking form against today's date.
///
/// ## Errors
/// - [`ValidationError::InPast`] when pick-up is before `today`
/// - [`crate::CoreError::InvalidDateRange`] when return is not after pick-up
pub fn validate_booking_dates(
    pick_up_date: NaiveDate,
    return_date: NaiveDate,
    today: NaiveDate,
) -> CoreResult<RentalPeriod> {
    if pick_up_date < today {
        return Err(ValidationError::InPast {
            field: "pickUpDate".to_string(),
        }
        .into());
    }
    RentalPeriod::new(pick_up_date, return_date)
}

// =============================================================================
// Unit Tests
// =============================================================================
