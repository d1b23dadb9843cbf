//! Reviews on cars. Creation is gated by the review eligibility rule;
//! edits and deletes only check authorship.

use drively_core::review::{ensure_author, prepare_review};
use drively_core::validation::validate_rating_input;
use drively_core::{Rating, Reservation};
use tracing::info;

use crate::cache::CacheKey;
use crate::client::DrivelyClient;
use crate::error::ClientResult;

impl DrivelyClient {
    /// Ratings embedded in the car document.
    pub async fn car_ratings(&self, car_id: &str) -> ClientResult<Vec<Rating>> {
        Ok(self.get_car(car_id).await?.ratings)
    }

    /// `POST /cars/:id/ratings`
    ///
    /// `ratings` are the car's known ratings, used to refuse a second
    /// review of the same reservation before anything is sent.
    pub async fn create_rating(
        &self,
        reservation: &Reservation,
        ratings: &[Rating],
        score: u8,
        comment: &str,
    ) -> ClientResult<Rating> {
        let input = prepare_review(reservation, ratings, score, comment)?;

        let car_id = reservation.car_id();
        let path = format!("/cars/{}/ratings", car_id);
        let rating: Rating = self.transport.post(&path, &input).await?.into_data(&path)?;

        info!(
            car_id,
            reservation_id = %reservation.id,
            score,
            "Review posted"
        );

        self.invalidate_car_ratings(car_id).await;
        Ok(rating)
    }

    /// `PUT /cars/:id/ratings/:ratingId`
    pub async fn update_rating(
        &self,
        car_id: &str,
        rating: &Rating,
        user_id: &str,
        score: u8,
        comment: &str,
    ) -> ClientResult<Rating> {
        ensure_author(rating, user_id)?;
        let mut input = validate_rating_input(score, comment)?;
        input.reservation = rating.reservation.clone();

        let path = format!("/cars/{}/ratings/{}", car_id, rating.id);
        let updated: Rating = self.transport.put(&path, &input).await?.into_data(&path)?;

        info!(car_id, rating_id = %rating.id, score, "Review updated");

        self.invalidate_car_ratings(car_id).await;
        Ok(updated)
    }

    /// `DELETE /cars/:id/ratings/:ratingId`
    pub async fn delete_rating(&self, car_id: &str, rating: &Rating, user_id: &str) -> ClientResult<()> {
        ensure_author(rating, user_id)?;

        let path = format!("/cars/{}/ratings/{}", car_id, rating.id);
        self.transport
            .delete::<serde_json::Value>(&path)
            .await?
            .ensure_success()?;

        info!(car_id, rating_id = %rating.id, "Review deleted");

        self.invalidate_car_ratings(car_id).await;
        Ok(())
    }

    // Rating aggregates show up in search results and the owner's top list.
    async fn invalidate_car_ratings(&self, car_id: &str) {
        self.cache
            .invalidate(&[CacheKey::Car(car_id.to_string()), CacheKey::MyTopRatedCars])
            .await;
        self.cache.invalidate_searches().await;
    }
}
