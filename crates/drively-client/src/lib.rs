//! # drively-client: Typed REST Client for Drively
//!
//! Async client for the Drively backend. Every call checks the local rules
//! from `drively-core` before anything goes over the wire, so obviously
//! invalid requests fail fast with a typed error.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        drively-client                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  DrivelyClient (client.rs)                       │  │
//! │  │                                                                  │  │
//! │  │  cars · reservations · ratings · membership · promos · users    │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ ResponseCache  │  │ HttpTransport  │  │  ApiEnvelope           │    │
//! │  │                │  │                │  │                        │    │
//! │  │ moka TTL, per- │  │ reqwest, bearer│  │ {success, data, error, │    │
//! │  │ key explicit   │  │ token, request │  │  count,                │    │
//! │  │ invalidation   │  │ ids, status map│  │  deletedConflicts}     │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ClientConfig: defaults → client.toml → DRIVELY_* environment          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `DrivelyClient` and the cached read helpers
//! - [`config`] - Client configuration (base URL, token, timeout, cache)
//! - [`error`] - Client error types and HTTP status mapping
//! - [`envelope`] - Backend response envelope
//! - [`transport`] - reqwest wrapper
//! - [`cache`] - Response cache and invalidation keys
//! - [`services`] - Endpoint groups
//!
//! ## Usage
//!
//! ```rust,ignore
//! use drively_client::DrivelyClient;
//! use drively_core::{search::CarQuery, MembershipTier, RentalPeriod};
//!
//! let client = DrivelyClient::load(None)?;
//! client.set_token(Some(token)).await;
//!
//! let cars = client.search_cars(&CarQuery::available_only()).await?;
//! let booking = client
//!     .create_reservation(&cars[0], period, Some(MembershipTier::Silver))
//!     .await?;
//! println!("Booked for {}", booking.reservation.total_price);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod services;
pub mod transport;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{CacheKey, ResponseCache};
pub use client::DrivelyClient;
pub use config::{ApiSettings, CacheSettings, ClientConfig};
pub use envelope::ApiEnvelope;
pub use error::{ClientError, ClientResult};
pub use services::{AcceptOutcome, Booking};
pub use transport::REQUEST_ID_HEADER;
