//! Endpoint groups, each an `impl DrivelyClient` block.
//!
//! Every state-changing call validates locally first, then invalidates the
//! cached reads it affects (see [`crate::cache`]).

mod cars;
mod membership;
mod promotions;
mod ratings;
mod reservations;
mod users;

pub use reservations::{AcceptOutcome, Booking};
