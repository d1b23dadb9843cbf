//! Member promotions and their admin management.

use chrono::{DateTime, Utc};
use drively_core::promotion::{sees_promotions, visible_promotions, Promotion};
use drively_core::validation::validate_required;
use drively_core::Membership;
use tracing::info;

use crate::cache::CacheKey;
use crate::client::DrivelyClient;
use crate::error::ClientResult;

impl DrivelyClient {
    /// `GET /promotions`
    pub async fn promotions(&self) -> ClientResult<Vec<Promotion>> {
        self.fetch_cached_list(CacheKey::Promotions, "/promotions", &[])
            .await
    }

    /// The active promotions `membership` is entitled to see at `now`.
    /// Basic members never trigger a request.
    pub async fn member_promotions(
        &self,
        membership: &Membership,
        now: DateTime<Utc>,
    ) -> ClientResult<Vec<Promotion>> {
        let tier = membership.effective_tier(now);
        if !sees_promotions(tier) {
            return Ok(Vec::new());
        }
        let all = self.promotions().await?;
        Ok(visible_promotions(tier, &all, now)
            .into_iter()
            .cloned()
            .collect())
    }

    /// `POST /promotions` (admin).
    pub async fn create_promotion(&self, promotion: &Promotion) -> ClientResult<Promotion> {
        promotion.validate()?;

        let created: Promotion = self
            .transport
            .post("/promotions", promotion)
            .await?
            .into_data("/promotions")?;
        info!(promotion_id = %created.id, title = %created.title, "Promotion created");

        self.cache.invalidate(&[CacheKey::Promotions]).await;
        Ok(created)
    }

    /// `PUT /promotions/:id` (admin). `promotion.id` picks the target.
    pub async fn update_promotion(&self, promotion: &Promotion) -> ClientResult<Promotion> {
        let id = validate_required("_id", &promotion.id)?;
        promotion.validate()?;

        let path = format!("/promotions/{}", id);
        let updated: Promotion = self.transport.put(&path, promotion).await?.into_data(&path)?;
        info!(promotion_id = %id, "Promotion updated");

        self.cache.invalidate(&[CacheKey::Promotions]).await;
        Ok(updated)
    }

    /// `DELETE /promotions/:id` (admin).
    pub async fn delete_promotion(&self, promotion_id: &str) -> ClientResult<()> {
        let path = format!("/promotions/{}", promotion_id);
        self.transport
            .delete::<serde_json::Value>(&path)
            .await?
            .ensure_success()?;
        info!(promotion_id, "Promotion deleted");

        self.cache.invalidate(&[CacheKey::Promotions]).await;
        Ok(())
    }
}
