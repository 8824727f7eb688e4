use std::collections::HashMap;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Gender, Lifestyle, Personality, UserProfile};

/// 24-hour "HH:MM"; single-digit hours allowed, minutes always two digits.
static CLOCK_TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid pattern"));

/// Wholesale profile submission. A draft replaces the user's previous
/// profile entirely; there is no partial-update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub gender: Gender,
    pub lifestyle: Lifestyle,
    pub personality: Personality,
    pub pets: bool,
    pub smoking: bool,
    pub age: i64,
    pub wake_up_time: String,
    pub bed_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileValidationError {
    #[error("age must be positive, got {0}")]
    NonPositiveAge(i64),
    #[error("{field} must be 24-hour HH:MM, got {value:?}")]
    MalformedTime { field: &'static str, value: String },
}

impl ProfileDraft {
    /// Reject invalid drafts before they reach storage, so the matching
    /// engine can rely on stored records being well-formed.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.age <= 0 {
            return Err(ProfileValidationError::NonPositiveAge(self.age));
        }
        for (field, value) in [
            ("wake_up_time", &self.wake_up_time),
            ("bed_time", &self.bed_time),
        ] {
            if !CLOCK_TIME_PATTERN.is_match(value) {
                return Err(ProfileValidationError::MalformedTime {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ProfileValidationError),
    #[error("profile store backend error: {0}")]
    Backend(String),
}

/// Persistence boundary for profile records. The deployed service keeps
/// profiles in the marketplace database; the matching core only ever talks
/// to this interface.
pub trait ProfileStore {
    fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError>;
    fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, StoreError>;
    /// Every stored profile, in ascending profile-id order.
    fn list_all(&self) -> Result<Vec<UserProfile>, StoreError>;
    /// Every stored profile except the one owned by `user_id`, in ascending
    /// profile-id order.
    fn list_all_except(&self, user_id: i64) -> Result<Vec<UserProfile>, StoreError>;
    /// Create or replace the profile owned by `user_id`. The draft is
    /// validated first; replacement keeps the original profile id and
    /// creation timestamp.
    fn upsert(&mut self, user_id: i64, draft: ProfileDraft) -> Result<UserProfile, StoreError>;
}

/// In-memory reference implementation; also the test double for the core.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: HashMap<i64, UserProfile>,
    next_id: i64,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.get(&user_id).cloned())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .profiles
            .values()
            .find(|profile| profile.id == id)
            .cloned())
    }

    fn list_all(&self) -> Result<Vec<UserProfile>, StoreError> {
        let mut profiles: Vec<_> = self.profiles.values().cloned().collect();
        profiles.sort_by_key(|profile| profile.id);
        Ok(profiles)
    }

    fn list_all_except(&self, user_id: i64) -> Result<Vec<UserProfile>, StoreError> {
        let mut profiles: Vec<_> = self
            .profiles
            .values()
            .filter(|profile| profile.user_id != user_id)
            .cloned()
            .collect();
        profiles.sort_by_key(|profile| profile.id);
        Ok(profiles)
    }

    fn upsert(&mut self, user_id: i64, draft: ProfileDraft) -> Result<UserProfile, StoreError> {
        draft.validate()?;

        let now = Utc::now();
        let profile = match self.profiles.get(&user_id) {
            Some(existing) => {
                let mut replaced = apply_draft(existing.id, user_id, draft);
                // total_score stays whatever was last persisted; the engine
                // recomputes live and never trusts this column.
                replaced.total_score = existing.total_score;
                replaced.created_at = existing.created_at;
                replaced.updated_at = Some(now);
                replaced
            }
            None => {
                self.next_id += 1;
                let mut created = apply_draft(self.next_id, user_id, draft);
                created.created_at = Some(now);
                created.updated_at = Some(now);
                created
            }
        };

        self.profiles.insert(user_id, profile.clone());
        Ok(profile)
    }
}

fn apply_draft(id: i64, user_id: i64, draft: ProfileDraft) -> UserProfile {
    UserProfile {
        id,
        user_id,
        gender: draft.gender,
        lifestyle: draft.lifestyle,
        personality: draft.personality,
        pets: draft.pets,
        smoking: draft.smoking,
        age: draft.age,
        wake_up_time: draft.wake_up_time,
        bed_time: draft.bed_time,
        total_score: 0,
        created_at: None,
        updated_at: None,
    }
}
