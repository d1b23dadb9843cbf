//! # Review Eligibility
//!
//! Decides whether a renter may review a reservation, and who may change an
//! existing review.
//!
//! ## Decision Table
//! ```text
//! ┌───────────────────┬─────────────────────┬──────────────────────────┐
//! │ Reservation       │ Existing review?    │ Outcome                  │
//! ├───────────────────┼─────────────────────┼──────────────────────────┤
//! │ pending/cancelled │ -                   │ NotYetEligible           │
//! │ completed         │ -                   │ NotYetEligible           │
//! │ accepted          │ no                  │ Eligible                 │
//! │ accepted          │ yes                 │ AlreadyReviewed (edit ok)│
//! └───────────────────┴─────────────────────┴──────────────────────────┘
//! ```
//!
//! A rating belongs to a reservation when it is for the same car, written by
//! the reservation's renter, and either names this reservation or names none.
//! Recomputing the car's aggregate score is left to the backend.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Rating, RatingInput, Reservation, ReservationStatus};
use crate::validation::validate_rating_input;

/// Whether a reservation can be reviewed right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum ReviewEligibility {
    Eligible,
    NotYetEligible { status: ReservationStatus },
    AlreadyReviewed { rating_id: String },
}

impl ReviewEligibility {
    #[inline]
    pub fn is_eligible(&self) -> bool {
        matches!(self, ReviewEligibility::Eligible)
    }

    /// Button caption on the reservation card.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewEligibility::Eligible => "Write a Review",
            ReviewEligibility::NotYetEligible { .. } => "Not Yet Reviewable",
            ReviewEligibility::AlreadyReviewed { .. } => "Already Reviewed",
        }
    }
}

fn belongs_to(rating: &Rating, reservation: &Reservation) -> bool {
    let same_car = rating
        .car
        .as_deref()
        .map_or(true, |car| car == reservation.car_id());
    let same_author = match (rating.author_id(), reservation.renter_id()) {
        (Some(author), Some(renter)) => author == renter,
        _ => false,
    };
    let same_reservation = rating
        .reservation
        .as_deref()
        .map_or(true, |id| id == reservation.id);
    same_car && same_author && same_reservation
}

/// The renter's existing review for this reservation, if any.
///
/// Ratings without a `car` field are taken to be embedded in the
/// reservation's car document.
pub fn find_review<'a>(reservation: &Reservation, ratings: &'a [Rating]) -> Option<&'a Rating> {
    ratings.iter().find(|rating| belongs_to(rating, reservation))
}

/// Classifies a reservation against the known ratings.
pub fn review_eligibility(reservation: &Reservation, ratings: &[Rating]) -> ReviewEligibility {
    if reservation.status != ReservationStatus::Accepted {
        return ReviewEligibility::NotYetEligible {
            status: reservation.status,
        };
    }
    match find_review(reservation, ratings) {
        Some(rating) => ReviewEligibility::AlreadyReviewed {
            rating_id: rating.id.clone(),
        },
        None => ReviewEligibility::Eligible,
    }
}

/// Checks that a new review may be created.
///
/// ## Errors
/// - [`CoreError::ReviewNotAllowed`] when the reservation is not accepted
/// - [`CoreError::DuplicateReview`] when the renter already reviewed it
pub fn ensure_can_review(reservation: &Reservation, ratings: &[Rating]) -> CoreResult<()> {
    match review_eligibility(reservation, ratings) {
        ReviewEligibility::Eligible => Ok(()),
        ReviewEligibility::NotYetEligible { status } => Err(CoreError::ReviewNotAllowed {
            reservation_id: reservation.id.clone(),
            status,
        }),
        ReviewEligibility::AlreadyReviewed { rating_id } => Err(CoreError::DuplicateReview {
            reservation_id: reservation.id.clone(),
            rating_id,
        }),
    }
}

/// Checks that `user_id` wrote `rating` before an edit or delete.
pub fn ensure_author(rating: &Rating, user_id: &str) -> CoreResult<()> {
    if rating.author_id() == Some(user_id) {
        Ok(())
    } else {
        Err(CoreError::NotReviewAuthor {
            rating_id: rating.id.clone(),
        })
    }
}

/// Validates form input and the eligibility gate, producing the request
/// body for a new review.
pub fn prepare_review(
    reservation: &Reservation,
    ratings: &[Rating],
    score: u8,
    comment: &str,
) -> CoreResult<RatingInput> {
    ensure_can_review(reservation, ratings)?;
    let mut input = validate_rating_input(score, comment)?;
    input.reservation = Some(reservation.id.clone());
    Ok(input)
}

// =============================================================================
// Unit Tests
// =============================================================================
