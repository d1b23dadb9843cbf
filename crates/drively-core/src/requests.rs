//! # Owner Request Queue
//!
//! Ordering, grouping and filtering of the reservations an owner receives.
//!
//! ```text
//! /reservations/received ──► filter(StatusFilter) ──► group_by_car
//!                        └─► owner_queue ──► dashboard_queue (first 5)
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{CarRef, Reservation, ReservationStatus};

/// Number of requests shown on the owner dashboard.
pub const DASHBOARD_QUEUE_LEN: usize = 5;

/// Status tabs on the received-requests page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Accepted,
}

impl StatusFilter {
    pub fn matches(&self, status: ReservationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == ReservationStatus::Pending,
            StatusFilter::Accepted => status == ReservationStatus::Accepted,
        }
    }

    pub fn apply<'a>(&self, reservations: &'a [Reservation]) -> Vec<&'a Reservation> {
        reservations
            .iter()
            .filter(|r| self.matches(r.status))
            .collect()
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "accepted" => Ok(StatusFilter::Accepted),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec![
                    "all".to_string(),
                    "pending".to_string(),
                    "accepted".to_string(),
                ],
            }),
        }
    }
}

/// Dashboard order: pending first, then earliest pick-up.
///
/// The sort is stable, so ties keep their input order.
pub fn owner_queue(reservations: &[Reservation]) -> Vec<&Reservation> {
    let mut queue: Vec<&Reservation> = reservations.iter().collect();
    queue.sort_by_key(|r| (r.status != ReservationStatus::Pending, r.pick_up_date));
    queue
}

/// The head of [`owner_queue`] shown on the owner dashboard.
pub fn dashboard_queue(reservations: &[Reservation]) -> Vec<&Reservation> {
    let mut queue = owner_queue(reservations);
    queue.truncate(DASHBOARD_QUEUE_LEN);
    queue
}

/// Reservations for one car.
#[derive(Debug, Clone)]
pub struct CarGroup<'a> {
    /// The car as it appeared on the first reservation seen for it.
    pub car: &'a CarRef,
    pub reservations: Vec<&'a Reservation>,
}

impl CarGroup<'_> {
    pub fn car_id(&self) -> &str {
        self.car.id()
    }

    pub fn pending_count(&self) -> usize {
        self.reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Pending)
            .count()
    }
}

/// Groups reservations per car.
///
/// Groups appear in first-seen order; each group is sorted by pick-up date.
pub fn group_by_car(reservations: &[Reservation]) -> Vec<CarGroup<'_>> {
    let mut groups: Vec<CarGroup<'_>> = Vec::new();
    for reservation in reservations {
        match groups
            .iter_mut()
            .find(|group| group.car_id() == reservation.car_id())
        {
            Some(group) => group.reservations.push(reservation),
            None => groups.push(CarGroup {
                car: &reservation.car,
                reservations: vec![reservation],
            }),
        }
    }
    for group in &mut groups {
        group.reservations.sort_by_key(|r| r.pick_up_date);
    }
    groups
}
