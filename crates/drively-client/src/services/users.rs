//! Accounts: the admin user list and profile edits.

use drively_core::validation::{validate_profile_update, validate_user_update};
use drively_core::{ProfileUpdate, UserProfile, UserUpdate};
use tracing::info;

use crate::cache::CacheKey;
use crate::client::DrivelyClient;
use crate::error::ClientResult;

impl DrivelyClient {
    /// `GET /auth/allusers` (admin).
    pub async fn all_users(&self) -> ClientResult<Vec<UserProfile>> {
        self.fetch_cached_list(CacheKey::AllUsers, "/auth/allusers", &[])
            .await
    }

    /// `PUT /auth/user/:id {name, membershipTier}` (admin). Returns the
    /// backend's copy of the user when it sends one.
    pub async fn update_user(
        &self,
        user_id: &str,
        update: &UserUpdate,
    ) -> ClientResult<Option<UserProfile>> {
        let body = validate_user_update(update)?;

        let path = format!("/auth/user/{}", user_id);
        let user = self
            .transport
            .put::<_, UserProfile>(&path, &body)
            .await?
            .ensure_success()?
            .data;
        info!(user_id, tier = %body.membership_tier, "User updated");

        self.cache.invalidate(&[CacheKey::AllUsers]).await;
        Ok(user)
    }

    /// `PUT /users/update {name, telephone, email}` for the signed-in user.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Option<UserProfile>> {
        let body = validate_profile_update(update)?;

        let profile = self
            .transport
            .put::<_, UserProfile>("/users/update", &body)
            .await?
            .ensure_success()?
            .data;
        info!(email = %body.email, "Profile updated");

        self.cache
            .invalidate(&[CacheKey::AllUsers, CacheKey::MembershipStatus])
            .await;
        Ok(profile)
    }
}
