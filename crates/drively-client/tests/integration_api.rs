//! Integration tests for the Drively client
//!
//! These tests use wiremock to stand in for the REST backend and verify
//! request shapes, status mapping, local rule checks and cache invalidation.

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::{
    car_json, failure, ok, ok_list, rating_json, reservation_json, BackendMock, TEST_TOKEN,
};
use drively_client::{CacheKey, ClientError};
use drively_core::search::{CarQuery, CarSort};
use drively_core::promotion::Promotion;
use drively_core::{
    Car, CarListing, CoreError, FuelType, Membership, MembershipTier, Money, ProfileUpdate,
    Rating, RentalPeriod, Reservation, Transmission, UserUpdate, ValidationError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{
    body_json, body_partial_json, header, header_exists, method, path, query_param,
};
use wiremock::{Mock, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reservation(id: &str, from: &str, to: &str, status: &str) -> Reservation {
    serde_json::from_value(reservation_json(id, "car-1", from, to, status, 0)).unwrap()
}

fn listing() -> CarListing {
    CarListing {
        make: "Honda".to_string(),
        model: "City".to_string(),
        year: 2023,
        number_plates: "2ขค 5678".to_string(),
        description: "Sedan".to_string(),
        rental_price: Money::from_major(1200),
        color: "grey".to_string(),
        transmission: Transmission::Automatic,
        fuel_type: FuelType::Petrol,
        features: vec!["Bluetooth".to_string()],
    }
}

fn promotion(id: &str) -> Promotion {
    Promotion {
        id: id.to_string(),
        title: "Songkran".to_string(),
        description: String::new(),
        discount_percent: 20,
        valid_from: date(2025, 4, 10),
        valid_to: date(2025, 4, 20),
    }
}

fn promotion_json(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": "Songkran",
        "discountPercent": 20,
        "validFrom": "2025-04-10",
        "validTo": "2025-04-20"
    })
}

fn user_json(id: &str, name: &str, tier: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": name,
        "email": "malee@example.com",
        "role": "car-renter",
        "membershipTier": tier
    })
}

// =============================================================================
// Cars
// =============================================================================

#[tokio::test]
async fn test_search_sends_query_token_and_request_id() {
    let mock = BackendMock::start().await;

    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars")))
        .and(query_param("make", "Toyota"))
        .and(query_param("sort", "rentalPrice"))
        .and(query_param("available", "true"))
        .and(header("Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .and(header_exists("X-Request-Id"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_list(vec![car_json("car-1", 1000), car_json("car-2", 500)])),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let mut query = CarQuery::available_only();
    query.make = Some("Toyota".to_string());
    query.sort = CarSort::PriceAsc;

    let cars = client.search_cars(&query).await.unwrap();
    assert_eq!(cars.len(), 2);
    assert_eq!(cars[0].rental_price, Money::from_major(1000));

    // Served from cache; the mock expects exactly one hit.
    let again = client.search_cars(&query).await.unwrap();
    assert_eq!(again.len(), 2);
}

#[tokio::test]
async fn test_invalid_search_is_not_sent() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![])))
        .expect(0)
        .mount(&mock.server)
        .await;

    let mut query = CarQuery::default();
    query.min_price = Some(Money::from_major(900));
    query.max_price = Some(Money::from_major(100));

    let result = mock.client().search_cars(&query).await;
    assert!(matches!(
        result,
        Err(ClientError::Domain(CoreError::Validation(_)))
    ));
}

#[tokio::test]
async fn test_missing_car_maps_to_not_found() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars/nope")))
        .respond_with(ResponseTemplate::new(404).set_body_json(failure("Car not found")))
        .mount(&mock.server)
        .await;

    let err = mock.client().get_car("nope").await.unwrap_err();
    match &err {
        ClientError::NotFound(message) => assert_eq!(message, "Car not found"),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(!err.is_retryable());
    assert_eq!(err.user_message(), "Car not found");
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars/my")))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock.server)
        .await;

    let err = mock.client().my_cars().await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_rejected() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars/my/top-rated")))
        .respond_with(ResponseTemplate::new(200).set_body_json(failure("Owner only")))
        .mount(&mock.server)
        .await;

    let err = mock.client().my_top_rated_cars().await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(ref reason) if reason == "Owner only"));
}

#[tokio::test]
async fn test_owner_car_crud_refreshes_listings() {
    let mock = BackendMock::start().await;
    let today = date(2025, 5, 10);

    // Initial read, then one refetch after each of create, update, delete.
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars/my")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_list(vec![car_json("car-1", 1000)])),
        )
        .expect(4)
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path(BackendMock::path("/cars")))
        .and(body_partial_json(json!({
            "make": "Honda",
            "model": "City",
            "year": 2023,
            "rentalPrice": 1200,
            "transmission": "automatic",
            "fuelType": "petrol"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ok(car_json("car-9", 1200))))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/cars/car-9")))
        .and(body_partial_json(json!({ "rentalPrice": 1100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(car_json("car-9", 1100))))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(BackendMock::path("/cars/car-9")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": {} })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    assert_eq!(client.my_cars().await.unwrap().len(), 1);
    let _ = client.my_cars().await.unwrap();
    assert!(client.cache().contains(&CacheKey::MyCars));

    let created = client.create_car(&listing(), today).await.unwrap();
    assert_eq!(created.id, "car-9");
    assert!(!client.cache().contains(&CacheKey::MyCars));
    let _ = client.my_cars().await.unwrap();

    let mut cheaper = listing();
    cheaper.rental_price = Money::from_major(1100);
    let updated = client.update_car("car-9", &cheaper, today).await.unwrap();
    assert_eq!(updated.rental_price, Money::from_major(1100));
    let _ = client.my_cars().await.unwrap();

    client.delete_car("car-9").await.unwrap();
    let _ = client.my_cars().await.unwrap();
}

#[tokio::test]
async fn test_invalid_listing_is_not_sent() {
    let mock = BackendMock::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock.server)
        .await;

    let mut free = listing();
    free.rental_price = Money::zero();
    let err = mock
        .client()
        .create_car(&free, date(2025, 5, 10))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Domain(CoreError::Validation(ValidationError::MustBePositive { .. }))
    ));
}

#[tokio::test]
async fn test_car_write_drops_cached_searches() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![car_json("car-1", 1000)])))
        .expect(2)
        .mount(&mock.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(BackendMock::path("/cars/car-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let query = CarQuery::available_only();
    let _ = client.search_cars(&query).await.unwrap();
    let _ = client.search_cars(&query).await.unwrap();

    client.delete_car("car-1").await.unwrap();
    let _ = client.search_cars(&query).await.unwrap();
}

#[tokio::test]
async fn test_my_top_rated_cars() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars/my/top-rated")))
        .and(header("Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![
            car_json("car-2", 800),
            car_json("car-1", 1000),
        ])))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let top = client.my_top_rated_cars().await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, "car-2");
    // Cached.
    assert_eq!(client.my_top_rated_cars().await.unwrap().len(), 2);
}

// =============================================================================
// Reservations
// =============================================================================

#[tokio::test]
async fn test_create_reservation_posts_dates_and_quotes() {
    let mock = BackendMock::start().await;

    Mock::given(method("POST"))
        .and(path(BackendMock::path("/reservations")))
        .and(body_json(json!({
            "car": "car-1",
            "pickUpDate": "2025-05-10",
            "returnDate": "2025-05-12"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ok(reservation_json(
            "res-1",
            "car-1",
            "2025-05-10",
            "2025-05-12",
            "pending",
            1800,
        ))))
        .expect(1)
        .mount(&mock.server)
        .await;

    let car: Car = serde_json::from_value(car_json("car-1", 1000)).unwrap();
    let period = RentalPeriod::new(date(2025, 5, 10), date(2025, 5, 12)).unwrap();

    let booking = mock
        .client()
        .create_reservation(&car, period, Some(MembershipTier::Silver))
        .await
        .unwrap();

    assert_eq!(booking.quote.days, 2);
    assert_eq!(booking.quote.effective_price_per_day, Money::from_major(900));
    assert_eq!(booking.quote.total, Money::from_major(1800));
    assert_eq!(booking.reservation.id, "res-1");
    assert!(!booking.total_differs());
}

#[tokio::test]
async fn test_reservation_with_invalid_price_is_not_sent() {
    let mock = BackendMock::start().await;
    Mock::given(method("POST"))
        .and(path(BackendMock::path("/reservations")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock.server)
        .await;

    let car: Car = serde_json::from_value(car_json("car-1", 0)).unwrap();
    let period = RentalPeriod::new(date(2025, 5, 10), date(2025, 5, 12)).unwrap();

    let err = mock
        .client()
        .create_reservation(&car, period, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Domain(CoreError::InvalidPrice(_))));
}

#[tokio::test]
async fn test_accept_reports_deleted_conflicts() {
    let mock = BackendMock::start().await;

    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/reservations/res-1/status")))
        .and(body_json(json!({ "status": "accepted" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": reservation_json("res-1", "car-1", "2025-05-05", "2025-05-10", "accepted", 4500),
            "deletedConflicts": 2
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let target = reservation("res-1", "2025-05-05", "2025-05-10", "pending");
    let known = vec![
        target.clone(),
        reservation("res-2", "2025-05-01", "2025-05-06", "pending"),
        reservation("res-3", "2025-05-09", "2025-05-12", "pending"),
        reservation("res-4", "2025-05-10", "2025-05-15", "pending"),
    ];

    let outcome = mock.client().accept_reservation(&target, &known).await.unwrap();
    assert_eq!(outcome.predicted.conflicting_ids, vec!["res-2", "res-3"]);
    assert_eq!(outcome.deleted_conflicts, 2);
    assert_eq!(
        outcome.notice,
        "Request accepted. 2 conflicting request(s) were automatically removed."
    );
}

#[tokio::test]
async fn test_accept_conflict_status_maps_to_conflict_not_resolved() {
    let mock = BackendMock::start().await;
    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/reservations/res-1/status")))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(failure("Car already booked for these dates")),
        )
        .mount(&mock.server)
        .await;

    let target = reservation("res-1", "2025-05-05", "2025-05-10", "pending");
    let err = mock
        .client()
        .accept_reservation(&target, &[])
        .await
        .unwrap_err();

    match err {
        ClientError::Domain(CoreError::ConflictNotResolved {
            reservation_id,
            reason,
        }) => {
            assert_eq!(reservation_id, "res-1");
            assert_eq!(reason, "Car already booked for these dates");
        }
        other => panic!("expected ConflictNotResolved, got {:?}", other),
    }
}

#[tokio::test]
async fn test_accept_non_pending_is_refused_locally() {
    let mock = BackendMock::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;

    let target = reservation("res-1", "2025-05-05", "2025-05-10", "accepted");
    let err = mock
        .client()
        .accept_reservation(&target, &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Domain(CoreError::InvalidStatusTransition { .. })
    ));
}

#[tokio::test]
async fn test_accept_invalidates_received_list() {
    let mock = BackendMock::start().await;

    Mock::given(method("GET"))
        .and(path(BackendMock::path("/reservations/received")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![reservation_json(
            "res-1",
            "car-1",
            "2025-05-05",
            "2025-05-10",
            "pending",
            4500,
        )])))
        .expect(2)
        .mount(&mock.server)
        .await;

    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/reservations/res-1/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "deletedConflicts": 0
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let received = client.received_reservations().await.unwrap();
    // Cached.
    let _ = client.received_reservations().await.unwrap();

    let outcome = client.accept_reservation(&received[0], &received).await.unwrap();
    assert_eq!(outcome.notice, "Request accepted.");

    // Refetched after the accept.
    let _ = client.received_reservations().await.unwrap();
}

#[tokio::test]
async fn test_read_in_flight_during_accept_is_not_cached() {
    let mock = BackendMock::start().await;

    // Slow enough for the accept to land while the first read is in flight.
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/reservations/received")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_list(vec![reservation_json(
                    "res-1",
                    "car-1",
                    "2025-05-05",
                    "2025-05-10",
                    "pending",
                    4500,
                )]))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(2)
        .mount(&mock.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/reservations/res-1/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let target = reservation("res-1", "2025-05-05", "2025-05-10", "pending");

    let (stale, accepted) = tokio::join!(client.received_reservations(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        client.accept_reservation(&target, &[]).await
    });
    assert_eq!(stale.unwrap().len(), 1);
    accepted.unwrap();

    // The pre-accept list was not kept, so this goes back to the server.
    assert!(!client.cache().contains(&CacheKey::ReceivedReservations));
    let _ = client.received_reservations().await.unwrap();
}

#[tokio::test]
async fn test_cancel_pending_reservation() {
    let mock = BackendMock::start().await;
    Mock::given(method("DELETE"))
        .and(path(BackendMock::path("/reservations/res-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": {} })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let target = reservation("res-1", "2025-05-05", "2025-05-10", "pending");
    mock.client().cancel_reservation(&target).await.unwrap();
}

#[tokio::test]
async fn test_cancel_completed_reservation_is_refused_locally() {
    let mock = BackendMock::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;

    let target = reservation("res-1", "2025-05-05", "2025-05-10", "completed");
    let err = mock.client().cancel_reservation(&target).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Domain(CoreError::InvalidStatusTransition { .. })
    ));
}

// =============================================================================
// Ratings
// =============================================================================

#[tokio::test]
async fn test_create_rating_for_accepted_reservation() {
    let mock = BackendMock::start().await;
    Mock::given(method("POST"))
        .and(path(BackendMock::path("/cars/car-1/ratings")))
        .and(body_json(json!({
            "score": 5,
            "comment": "Clean and on time",
            "reservation": "res-1"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(ok(rating_json("rate-1", "renter-1", Some("res-1"), 5))),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    let accepted = reservation("res-1", "2025-05-05", "2025-05-10", "accepted");
    let rating = mock
        .client()
        .create_rating(&accepted, &[], 5, "  Clean and on time ")
        .await
        .unwrap();
    assert_eq!(rating.id, "rate-1");
    assert_eq!(rating.score, 5);
}

#[tokio::test]
async fn test_second_review_is_refused_locally() {
    let mock = BackendMock::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock.server)
        .await;

    let accepted = reservation("res-1", "2025-05-05", "2025-05-10", "accepted");
    let existing: Rating =
        serde_json::from_value(rating_json("rate-1", "renter-1", Some("res-1"), 4)).unwrap();

    let err = mock
        .client()
        .create_rating(&accepted, &[existing], 5, "Again")
        .await
        .unwrap_err();
    match err {
        ClientError::Domain(CoreError::DuplicateReview { rating_id, .. }) => {
            assert_eq!(rating_id, "rate-1")
        }
        other => panic!("expected DuplicateReview, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pending_reservation_cannot_be_reviewed() {
    let mock = BackendMock::start().await;
    let pending = reservation("res-1", "2025-05-05", "2025-05-10", "pending");

    let err = mock
        .client()
        .create_rating(&pending, &[], 5, "Great")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Domain(CoreError::ReviewNotAllowed { .. })
    ));
}

#[tokio::test]
async fn test_rating_write_refreshes_car_and_top_rated() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars/car-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(car_json("car-1", 1000))))
        .expect(2)
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/cars/my/top-rated")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![car_json("car-1", 1000)])))
        .expect(2)
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path(BackendMock::path("/cars/car-1/ratings")))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(ok(rating_json("rate-1", "renter-1", Some("res-1"), 4))),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    assert!(client.car_ratings("car-1").await.unwrap().is_empty());
    let _ = client.get_car("car-1").await.unwrap();
    let _ = client.my_top_rated_cars().await.unwrap();

    let accepted = reservation("res-1", "2025-05-05", "2025-05-10", "accepted");
    client
        .create_rating(&accepted, &[], 4, "Good")
        .await
        .unwrap();
    assert!(!client.cache().contains(&CacheKey::Car("car-1".to_string())));
    assert!(!client.cache().contains(&CacheKey::MyTopRatedCars));

    let _ = client.get_car("car-1").await.unwrap();
    let _ = client.my_top_rated_cars().await.unwrap();
}

#[tokio::test]
async fn test_author_can_update_and_delete_review() {
    let mock = BackendMock::start().await;
    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/cars/car-1/ratings/rate-1")))
        .and(body_json(json!({
            "score": 3,
            "comment": "Okay",
            "reservation": "res-1"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(rating_json("rate-1", "renter-1", Some("res-1"), 3))),
        )
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(BackendMock::path("/cars/car-1/ratings/rate-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let rating: Rating =
        serde_json::from_value(rating_json("rate-1", "renter-1", Some("res-1"), 5)).unwrap();

    let updated = client
        .update_rating("car-1", &rating, "renter-1", 3, "Okay")
        .await
        .unwrap();
    assert_eq!(updated.score, 3);

    client.delete_rating("car-1", &rating, "renter-1").await.unwrap();

    let err = client
        .delete_rating("car-1", &rating, "someone-else")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Domain(CoreError::NotReviewAuthor { .. })
    ));
}

// =============================================================================
// Membership & Promotions
// =============================================================================

#[tokio::test]
async fn test_upgrade_refreshes_status() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/membership/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "membershipTier": "gold",
            "membershipExpiryDate": "2026-05-10T00:00:00.000Z"
        }))))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path(BackendMock::path("/membership/upgrade")))
        .and(body_json(json!({ "tier": "gold" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let status = mock
        .client()
        .upgrade_membership(MembershipTier::Gold)
        .await
        .unwrap();
    assert_eq!(status.membership_tier, MembershipTier::Gold);
    assert!(status.membership_expiry_date.is_some());
}

#[tokio::test]
async fn test_cancel_membership_refreshes_status() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/membership/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "membershipTier": "silver",
            "membershipExpiryDate": "2026-05-10T00:00:00.000Z"
        }))))
        .expect(2)
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path(BackendMock::path("/membership/cancel")))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let status = client.membership_status().await.unwrap();
    assert_eq!(status.membership_tier, MembershipTier::Silver);
    let _ = client.membership_status().await.unwrap();

    client.cancel_membership().await.unwrap();
    assert!(!client.cache().contains(&CacheKey::MembershipStatus));
    let _ = client.membership_status().await.unwrap();
}

#[tokio::test]
async fn test_upgrade_to_basic_is_refused() {
    let mock = BackendMock::start().await;
    let err = mock
        .uncached_client()
        .upgrade_membership(MembershipTier::Basic)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Domain(CoreError::Validation(_))
    ));
}

#[tokio::test]
async fn test_empty_tier_list_falls_back_to_catalogue() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/membership/tiers")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![])))
        .mount(&mock.server)
        .await;

    let tiers = mock.uncached_client().membership_tiers().await.unwrap();
    assert_eq!(tiers.len(), 3);
    assert_eq!(tiers[0].tier, MembershipTier::Basic);
}

#[tokio::test]
async fn test_member_promotions_by_tier() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/promotions")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![
            json!({
                "_id": "p-1",
                "title": "Songkran",
                "discountPercent": 20,
                "validFrom": "2025-04-10",
                "validTo": "2025-04-20"
            }),
            json!({
                "_id": "p-2",
                "title": "Rainy season",
                "discountPercent": 10,
                "validFrom": "2025-07-01",
                "validTo": "2025-09-30"
            }),
        ])))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let now = Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).unwrap();
    let expiry = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    // Basic members never hit the endpoint.
    let basic = Membership::new(MembershipTier::Basic, None);
    assert!(client.member_promotions(&basic, now).await.unwrap().is_empty());

    let gold = Membership::new(MembershipTier::Gold, Some(expiry));
    let visible = client.member_promotions(&gold, now).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Songkran");
}

#[tokio::test]
async fn test_admin_promotion_crud_refreshes_list() {
    let mock = BackendMock::start().await;
    // Initial read, then one refetch after each write.
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/promotions")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![promotion_json("p-1")])))
        .expect(4)
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path(BackendMock::path("/promotions")))
        .and(body_json(json!({
            "title": "Songkran",
            "description": "",
            "discountPercent": 20,
            "validFrom": "2025-04-10",
            "validTo": "2025-04-20"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ok(promotion_json("p-2"))))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/promotions/p-2")))
        .and(body_partial_json(json!({ "_id": "p-2", "discountPercent": 25 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(promotion_json("p-2"))))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(BackendMock::path("/promotions/p-2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    assert_eq!(client.promotions().await.unwrap().len(), 1);
    let _ = client.promotions().await.unwrap();

    let created = client.create_promotion(&promotion("")).await.unwrap();
    assert_eq!(created.id, "p-2");
    let _ = client.promotions().await.unwrap();

    let mut deeper = promotion("p-2");
    deeper.discount_percent = 25;
    client.update_promotion(&deeper).await.unwrap();
    let _ = client.promotions().await.unwrap();

    client.delete_promotion("p-2").await.unwrap();
    let _ = client.promotions().await.unwrap();
}

#[tokio::test]
async fn test_invalid_promotions_are_not_sent() {
    let mock = BackendMock::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let mut backwards = promotion("");
    backwards.valid_to = date(2025, 4, 1);
    assert!(matches!(
        client.create_promotion(&backwards).await,
        Err(ClientError::Domain(CoreError::Validation(ValidationError::OutOfOrder { .. })))
    ));

    // Updates need an id to address.
    assert!(matches!(
        client.update_promotion(&promotion("")).await,
        Err(ClientError::Domain(CoreError::Validation(ValidationError::Required { .. })))
    ));
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_admin_updates_user_membership() {
    let mock = BackendMock::start().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::path("/auth/allusers")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_list(vec![
            user_json("u-1", "Malee", "basic"),
            user_json("u-2", "Somchai", "gold"),
        ])))
        .expect(2)
        .mount(&mock.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/auth/user/u-1")))
        .and(body_json(json!({ "name": "Malee", "membershipTier": "gold" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let users = client.all_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].membership().tier, MembershipTier::Basic);
    let _ = client.all_users().await.unwrap();

    let update = UserUpdate {
        name: "  Malee ".to_string(),
        membership_tier: MembershipTier::Gold,
    };
    assert!(client.update_user("u-1", &update).await.unwrap().is_none());
    assert!(!client.cache().contains(&CacheKey::AllUsers));
    let _ = client.all_users().await.unwrap();
}

#[tokio::test]
async fn test_update_profile() {
    let mock = BackendMock::start().await;
    Mock::given(method("PUT"))
        .and(path(BackendMock::path("/users/update")))
        .and(header("Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .and(body_json(json!({
            "name": "Malee",
            "telephone": "0812345678",
            "email": "malee@example.com"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok(user_json("u-1", "Malee", "silver"))),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let mut form = ProfileUpdate {
        name: "Malee".to_string(),
        telephone: " 0812345678 ".to_string(),
        email: "malee-at-example.com".to_string(),
    };

    // Refused locally; the mock expects a single request.
    assert!(matches!(
        client.update_profile(&form).await,
        Err(ClientError::Domain(CoreError::Validation(ValidationError::InvalidFormat { .. })))
    ));

    form.email = "malee@example.com".to_string();
    let profile = client.update_profile(&form).await.unwrap().unwrap();
    assert_eq!(profile.id, "u-1");
    assert_eq!(profile.membership().tier, MembershipTier::Silver);
}
