//! Mock Drively backend for integration testing
//!
//! Wraps a wiremock server mounted under `/api/v1` plus JSON fixtures in the
//! shape the real backend sends.

#![allow(dead_code)]

use drively_client::{ClientConfig, DrivelyClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_PREFIX: &str = "/api/v1";
pub const TEST_TOKEN: &str = "test-token-123";

pub struct BackendMock {
    pub server: MockServer,
}

impl BackendMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL the client should use.
    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), API_PREFIX)
    }

    /// Full mock path for an API path.
    pub fn path(api_path: &str) -> String {
        format!("{}{}", API_PREFIX, api_path)
    }

    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::with_base_url(self.url());
        config.api.timeout_secs = 5;
        config
    }

    /// Signed-in client with caching on.
    pub fn client(&self) -> DrivelyClient {
        let mut config = self.config();
        config.api.token = Some(TEST_TOKEN.to_string());
        DrivelyClient::new(config).expect("mock config is valid")
    }

    /// Signed-in client with caching off.
    pub fn uncached_client(&self) -> DrivelyClient {
        let mut config = self.config();
        config.api.token = Some(TEST_TOKEN.to_string());
        config.cache.enabled = false;
        DrivelyClient::new(config).expect("mock config is valid")
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn car_json(id: &str, price: u32) -> Value {
    json!({
        "_id": id,
        "make": "Toyota",
        "model": "Yaris",
        "year": 2022,
        "numberPlates": "1กข 1234",
        "description": "City car",
        "rentalPrice": price,
        "color": "white",
        "transmission": "automatic",
        "fuelType": "petrol",
        "features": ["Bluetooth"],
        "available": true,
        "ratingScore": 4.5,
        "reviewCount": 2,
        "createdBy": { "_id": "owner-1", "name": "Somchai" },
        "ratings": [],
        "createdAt": "2025-04-01T08:00:00.000Z"
    })
}

pub fn reservation_json(id: &str, car: &str, from: &str, to: &str, status: &str, total: u32) -> Value {
    json!({
        "_id": id,
        "user": { "_id": "renter-1", "name": "Malee" },
        "car": { "_id": car, "make": "Toyota", "model": "Yaris" },
        "pickUpDate": format!("{}T00:00:00.000Z", from),
        "returnDate": format!("{}T00:00:00.000Z", to),
        "totalPrice": total,
        "status": status,
        "createdAt": "2025-04-20T10:00:00.000Z"
    })
}

pub fn rating_json(id: &str, user: &str, reservation: Option<&str>, score: u8) -> Value {
    json!({
        "_id": id,
        "user": { "_id": user, "name": "Malee" },
        "reservation": reservation,
        "score": score,
        "comment": "Clean and on time",
        "createdAt": "2025-05-13T09:00:00.000Z"
    })
}

/// `{ success: true, data }`
pub fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// `{ success: true, count, data: [...] }`
pub fn ok_list(items: Vec<Value>) -> Value {
    json!({ "success": true, "count": items.len(), "data": items })
}

/// `{ success: false, error }`
pub fn failure(error: &str) -> Value {
    json!({ "success": false, "error": error })
}
