//! Membership status, the tier catalogue, upgrades and cancellation.

use drively_core::error::ValidationError;
use drively_core::membership::{tier_catalogue, TierInfo};
use drively_core::{MembershipStatus, MembershipTier};
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::CacheKey;
use crate::client::DrivelyClient;
use crate::error::ClientResult;

#[derive(Serialize)]
struct UpgradeRequest {
    tier: MembershipTier,
}

impl DrivelyClient {
    /// `GET /membership/status`
    pub async fn membership_status(&self) -> ClientResult<MembershipStatus> {
        self.fetch_cached(CacheKey::MembershipStatus, "/membership/status", &[])
            .await
    }

    /// `GET /membership/tiers`. Falls back to the built-in catalogue when
    /// the backend returns no tiers.
    pub async fn membership_tiers(&self) -> ClientResult<Vec<TierInfo>> {
        let tiers: Vec<TierInfo> = self
            .fetch_cached_list(CacheKey::MembershipTiers, "/membership/tiers", &[])
            .await?;
        if tiers.is_empty() {
            debug!("Backend sent no tiers, using built-in catalogue");
            return Ok(tier_catalogue());
        }
        Ok(tiers)
    }

    /// `POST /membership/upgrade {tier}`, then re-reads the status.
    pub async fn upgrade_membership(&self, tier: MembershipTier) -> ClientResult<MembershipStatus> {
        if !tier.is_paid() {
            return Err(ValidationError::NotAllowed {
                field: "tier".to_string(),
                allowed: MembershipTier::ALL
                    .iter()
                    .filter(|t| t.is_paid())
                    .map(|t| t.as_str().to_string())
                    .collect(),
            }
            .into());
        }

        self.transport
            .post::<_, serde_json::Value>("/membership/upgrade", &UpgradeRequest { tier })
            .await?
            .ensure_success()?;
        info!(%tier, "Membership upgraded");

        self.cache.invalidate(&[CacheKey::MembershipStatus]).await;
        self.membership_status().await
    }

    /// `POST /membership/cancel`
    pub async fn cancel_membership(&self) -> ClientResult<()> {
        self.transport
            .post::<_, serde_json::Value>("/membership/cancel", &serde_json::json!({}))
            .await?
            .ensure_success()?;
        info!("Membership cancelled");

        self.cache.invalidate(&[CacheKey::MembershipStatus]).await;
        Ok(())
    }
}
