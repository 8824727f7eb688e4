use thiserror::Error;
use tracing::instrument;

use crate::matching::{MatchingConfig, MatchingEngine, MatchingError};
use crate::store::{ProfileDraft, ProfileStore, StoreError};
use crate::UserProfile;

/// Suggestions returned when the caller does not ask for a specific limit.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requester has not completed their own profile, so matching has
    /// nothing to compare against. Callers surface this as a
    /// "complete your profile first" condition, not an internal failure.
    #[error("user {0} has no roommate profile")]
    ProfileNotFound(i64),
    #[error("profile {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Matching(#[from] MatchingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Caller-facing facade over a profile store and the matching engine.
///
/// Each operation is a synchronous, side-effect-free pass over the store's
/// current contents; there is no caching or precomputed index, and nothing
/// here ever writes a recomputed score back.
pub struct RoommateService<S> {
    store: S,
    engine: MatchingEngine,
}

impl<S: ProfileStore> RoommateService<S> {
    pub fn new(store: S, config: MatchingConfig) -> Self {
        Self {
            store,
            engine: MatchingEngine::new(config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Live raw score for a profile under the current weight tables. The
    /// persisted `total_score` snapshot is ignored.
    pub fn get_total_score(&self, profile: &UserProfile) -> i64 {
        self.engine.scorer().total_score(profile)
    }

    /// Ranked roommate suggestions for `user_id`, best match first, at most
    /// `top_n` entries. Fails with `ProfileNotFound` when the requester has
    /// no stored profile.
    #[instrument(skip(self))]
    pub fn get_suggestions(
        &self,
        user_id: i64,
        top_n: usize,
    ) -> Result<Vec<UserProfile>, ServiceError> {
        let current = self
            .store
            .find_by_user_id(user_id)?
            .ok_or(ServiceError::ProfileNotFound(user_id))?;
        let candidates = self.store.list_all_except(user_id)?;

        Ok(self.engine.suggest(&current, &candidates, top_n)?)
    }

    /// `get_suggestions` with the default limit.
    pub fn get_default_suggestions(&self, user_id: i64) -> Result<Vec<UserProfile>, ServiceError> {
        self.get_suggestions(user_id, DEFAULT_SUGGESTION_LIMIT)
    }

    pub fn get_all_profiles(&self) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.list_all()?)
    }

    pub fn get_profile_by_id(&self, id: i64) -> Result<UserProfile, ServiceError> {
        self.store
            .find_by_id(id)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Create or replace the profile owned by `user_id`.
    #[instrument(skip(self, draft))]
    pub fn upsert_profile(
        &mut self,
        user_id: i64,
        draft: ProfileDraft,
    ) -> Result<UserProfile, ServiceError> {
        Ok(self.store.upsert(user_id, draft)?)
    }
}
