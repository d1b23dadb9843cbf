//! # Reservations
//!
//! Booking, the three reservation lists, and the owner's accept/cancel
//! actions.
//!
//! ## Accept Flow
//! ```text
//! owner clicks "Accept"
//!      │
//!      ▼
//! resolve_conflicts(target, known)     local: status must be pending,
//!      │                               no accepted overlap on the car
//!      ▼
//! PUT /reservations/:id/status {"status":"accepted"}
//!      │
//!      ├── 409 ──► CoreError::ConflictNotResolved
//!      │
//!      ▼
//! deletedConflicts from the backend ──► acceptance_notice(n)
//! ```
//!
//! The backend is authoritative for both the total price and which
//! conflicts were removed. Local results are previews.

use drively_core::conflict::{acceptance_notice, resolve_conflicts, ConflictResolution};
use drively_core::pricing::{quote, PriceQuote};
use drively_core::{
    Car, CoreError, MembershipTier, RentalPeriod, Reservation, ReservationRequest,
    ReservationStatus,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::CacheKey;
use crate::client::DrivelyClient;
use crate::error::{ClientError, ClientResult};

/// A created reservation with the price the renter was shown.
#[derive(Debug, Clone)]
pub struct Booking {
    pub reservation: Reservation,
    /// Local quote computed before sending.
    pub quote: PriceQuote,
}

impl Booking {
    /// True when the backend charged something other than the quote.
    pub fn total_differs(&self) -> bool {
        !self.reservation.total_price.is_zero() && self.reservation.total_price != self.quote.total
    }
}

/// Result of accepting a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptOutcome {
    pub reservation_id: String,
    /// Conflicts predicted from the reservations the owner could see.
    pub predicted: ConflictResolution,
    /// Conflicts the backend reports it removed.
    pub deleted_conflicts: usize,
    /// Notice shown to the owner.
    pub notice: String,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: ReservationStatus,
}

impl DrivelyClient {
    /// `POST /reservations`
    ///
    /// Prices the rental locally first so an invalid price never reaches the
    /// backend. The reservation returned carries the server's total.
    pub async fn create_reservation(
        &self,
        car: &Car,
        period: RentalPeriod,
        tier: Option<MembershipTier>,
    ) -> ClientResult<Booking> {
        let quote = quote(car.rental_price, tier, period)?;
        let request = ReservationRequest::new(car.id.clone(), period);

        let reservation: Reservation = self
            .transport
            .post("/reservations", &request)
            .await?
            .into_data("/reservations")?;

        let booking = Booking { reservation, quote };
        if booking.total_differs() {
            warn!(
                reservation_id = %booking.reservation.id,
                quoted = %booking.quote.total,
                charged = %booking.reservation.total_price,
                "Backend total differs from local quote"
            );
        }

        info!(
            reservation_id = %booking.reservation.id,
            car_id = %car.id,
            days = booking.quote.days,
            "Reservation requested"
        );

        self.invalidate_reservations(&car.id).await;
        Ok(booking)
    }

    /// `GET /reservations/my`: the renter's own bookings.
    pub async fn my_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.fetch_cached_list(CacheKey::MyReservations, "/reservations/my", &[])
            .await
    }

    /// `GET /reservations/received`: requests on the owner's cars.
    pub async fn received_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.fetch_cached_list(CacheKey::ReceivedReservations, "/reservations/received", &[])
            .await
    }

    /// `GET /reservations/all` (admin).
    pub async fn all_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.fetch_cached_list(CacheKey::AllReservations, "/reservations/all", &[])
            .await
    }

    /// `PUT /reservations/:id/status`
    ///
    /// `known` is whatever reservation list the owner is looking at. It is
    /// used for the local preview and to refuse an accept that would double
    /// book the car.
    pub async fn accept_reservation(
        &self,
        target: &Reservation,
        known: &[Reservation],
    ) -> ClientResult<AcceptOutcome> {
        let predicted = resolve_conflicts(target, known)?;
        debug!(
            reservation_id = %target.id,
            predicted = predicted.count(),
            "Accepting reservation"
        );

        let path = format!("/reservations/{}/status", target.id);
        let body = StatusUpdate {
            status: ReservationStatus::Accepted,
        };

        let envelope = match self.transport.put::<_, serde_json::Value>(&path, &body).await {
            Ok(envelope) => envelope.ensure_success()?,
            Err(ClientError::Conflict(reason)) => {
                warn!(reservation_id = %target.id, %reason, "Accept refused by backend");
                return Err(CoreError::ConflictNotResolved {
                    reservation_id: target.id.clone(),
                    reason,
                }
                .into());
            }
            Err(err) => return Err(err),
        };

        let deleted_conflicts = envelope.deleted_conflicts.unwrap_or(0);
        if deleted_conflicts != predicted.count() {
            debug!(
                reservation_id = %target.id,
                predicted = predicted.count(),
                deleted_conflicts,
                "Backend removed a different number of conflicts than predicted"
            );
        }

        info!(reservation_id = %target.id, deleted_conflicts, "Reservation accepted");

        self.invalidate_reservations(target.car_id()).await;
        Ok(AcceptOutcome {
            reservation_id: target.id.clone(),
            predicted,
            deleted_conflicts,
            notice: acceptance_notice(deleted_conflicts),
        })
    }

    /// `DELETE /reservations/:id`. Used by renters withdrawing a request and
    /// owners rejecting one.
    pub async fn cancel_reservation(&self, reservation: &Reservation) -> ClientResult<()> {
        reservation.ensure_transition(ReservationStatus::Cancelled)?;

        let path = format!("/reservations/{}", reservation.id);
        self.transport
            .delete::<serde_json::Value>(&path)
            .await?
            .ensure_success()?;

        info!(reservation_id = %reservation.id, "Reservation cancelled");

        self.invalidate_reservations(reservation.car_id()).await;
        Ok(())
    }

    async fn invalidate_reservations(&self, car_id: &str) {
        self.cache.invalidate(&CacheKey::RESERVATION_LISTS).await;
        self.cache
            .invalidate(&[CacheKey::Car(car_id.to_string())])
            .await;
        self.cache.invalidate_searches().await;
    }
}
