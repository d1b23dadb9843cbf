//! Car catalogue: public search, owner listings and CRUD.

use chrono::NaiveDate;
use drively_core::search::CarQuery;
use drively_core::validation::validate_car_listing;
use drively_core::{Car, CarListing};
use tracing::info;

use crate::cache::CacheKey;
use crate::client::DrivelyClient;
use crate::error::ClientResult;

/// Renders query pairs as a stable cache key.
fn search_key(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

impl DrivelyClient {
    /// `GET /cars/:id`, ratings included.
    pub async fn get_car(&self, car_id: &str) -> ClientResult<Car> {
        let path = format!("/cars/{}", car_id);
        self.fetch_cached(CacheKey::Car(car_id.to_string()), &path, &[])
            .await
    }

    /// `GET /cars?...`. The query is checked locally before sending.
    pub async fn search_cars(&self, query: &CarQuery) -> ClientResult<Vec<Car>> {
        query.validate()?;
        let pairs = query.to_query_pairs();
        self.fetch_cached_list(CacheKey::CarSearch(search_key(&pairs)), "/cars", &pairs)
            .await
    }

    /// `GET /cars/my`: the signed-in owner's listings.
    pub async fn my_cars(&self) -> ClientResult<Vec<Car>> {
        self.fetch_cached_list(CacheKey::MyCars, "/cars/my", &[]).await
    }

    /// `GET /cars/my/top-rated`
    pub async fn my_top_rated_cars(&self) -> ClientResult<Vec<Car>> {
        self.fetch_cached_list(CacheKey::MyTopRatedCars, "/cars/my/top-rated", &[])
            .await
    }

    /// `POST /cars`
    pub async fn create_car(&self, listing: &CarListing, today: NaiveDate) -> ClientResult<Car> {
        validate_car_listing(listing, today)?;

        let car: Car = self.transport.post("/cars", listing).await?.into_data("/cars")?;
        info!(car_id = %car.id, make = %car.make, model = %car.model, "Car listed");

        self.invalidate_car(&car.id).await;
        Ok(car)
    }

    /// `PUT /cars/:id`
    pub async fn update_car(
        &self,
        car_id: &str,
        listing: &CarListing,
        today: NaiveDate,
    ) -> ClientResult<Car> {
        validate_car_listing(listing, today)?;

        let path = format!("/cars/{}", car_id);
        let car: Car = self.transport.put(&path, listing).await?.into_data(&path)?;
        info!(car_id, "Car updated");

        self.invalidate_car(car_id).await;
        Ok(car)
    }

    /// `DELETE /cars/:id`
    pub async fn delete_car(&self, car_id: &str) -> ClientResult<()> {
        let path = format!("/cars/{}", car_id);
        self.transport
            .delete::<serde_json::Value>(&path)
            .await?
            .ensure_success()?;
        info!(car_id, "Car deleted");

        self.invalidate_car(car_id).await;
        Ok(())
    }

    async fn invalidate_car(&self, car_id: &str) {
        self.cache
            .invalidate(&[
                CacheKey::Car(car_id.to_string()),
                CacheKey::MyCars,
                CacheKey::MyTopRatedCars,
            ])
            .await;
        self.cache.invalidate_searches().await;
    }
}
