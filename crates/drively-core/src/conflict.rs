//! # Conflict Resolver
//!
//! Works out which pending requests are removed when an owner accepts one.
//!
//! ## Acceptance Flow
//! ```text
//! Owner accepts r-2 (pending, car c-1, May 5 → May 10)
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. r-2 must be pending           else InvalidStatusTransition │
//! │ 2. no accepted booking on c-1    else ConflictNotResolved     │
//! │    overlaps May 5 → May 10                                    │
//! │ 3. every other pending booking on c-1 that overlaps           │
//! │    becomes a conflict                                         │
//! └──────────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! ConflictResolution { conflicting_ids: ["r-3", "r-7"] }
//! ```
//!
//! The backend applies acceptance and removal atomically; this module only
//! predicts the outcome so the UI can preview it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Reservation, ReservationStatus};

/// Outcome of accepting a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConflictResolution {
    /// Pending reservations that will be removed, ascending and unique.
    pub conflicting_ids: Vec<String>,
}

impl ConflictResolution {
    #[inline]
    pub fn count(&self) -> usize {
        self.conflicting_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.conflicting_ids.is_empty()
    }

    /// Notice shown to the owner after accepting.
    pub fn message(&self) -> String {
        acceptance_notice(self.count())
    }
}

/// `"Request accepted."`, plus the removal count when there was one.
pub fn acceptance_notice(removed: usize) -> String {
    if removed == 0 {
        "Request accepted.".to_string()
    } else {
        format!(
            "Request accepted. {} conflicting request(s) were automatically removed.",
            removed
        )
    }
}

/// Finds the pending reservations that conflict with accepting `target`.
///
/// `reservations` may contain bookings for any car and may include the
/// target itself; both are ignored. The result is deterministic, so calling
/// it twice on the same input gives the same answer.
///
/// ## Errors
/// - [`CoreError::InvalidStatusTransition`] when `target` is not pending
/// - [`CoreError::ConflictNotResolved`] when an accepted booking on the same
///   car already covers part of the target's dates
pub fn resolve_conflicts(
    target: &Reservation,
    reservations: &[Reservation],
) -> CoreResult<ConflictResolution> {
    target.ensure_transition(ReservationStatus::Accepted)?;

    let competing = reservations
        .iter()
        .filter(|other| other.id != target.id)
        .filter(|other| other.car_id() == target.car_id())
        .filter(|other| other.overlaps(target));

    let mut conflicting_ids = Vec::new();
    for other in competing {
        match other.status {
            ReservationStatus::Pending => conflicting_ids.push(other.id.clone()),
            ReservationStatus::Accepted => {
                return Err(CoreError::ConflictNotResolved {
                    reservation_id: target.id.clone(),
                    reason: format!(
                        "reservation {} is already accepted for {} to {}",
                        other.id, other.pick_up_date, other.return_date
                    ),
                });
            }
            ReservationStatus::Completed | ReservationStatus::Cancelled => {}
        }
    }

    conflicting_ids.sort();
    conflicting_ids.dedup();

    Ok(ConflictResolution { conflicting_ids })
}

// =============================================================================
// Unit Tests
// =============================================================================
