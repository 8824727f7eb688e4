pub mod clock;
pub mod logging;
pub mod matching;
pub mod service;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use matching::weights::ProfileAttribute;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
pub enum Gender {
    Male,
    Female,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
pub enum Lifestyle {
    Clean,
    Normal,
    Messy,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
pub enum Personality {
    Introvert,
    Extrovert,
}

/// Roommate-matching attribute record. At most one per user; a new
/// submission replaces the previous record wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub gender: Gender,
    pub lifestyle: Lifestyle,
    pub personality: Personality,
    pub pets: bool,
    pub smoking: bool,
    pub age: i64,
    /// 24-hour "HH:MM", stored exactly as submitted. Parsed on demand by
    /// the matching engine.
    pub wake_up_time: String,
    /// 24-hour "HH:MM", same handling as `wake_up_time`.
    pub bed_time: String,
    /// Persisted snapshot of the raw weighted score. Ranking never reads
    /// it; scores are recomputed live against the current weight tables.
    pub total_score: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// The five attribute values that participate in the table-driven raw
    /// score. Age and the schedule fields are handled by the affinity
    /// bonuses instead and never appear here.
    pub fn scoreable_attributes(&self) -> [ProfileAttribute; 5] {
        [
            ProfileAttribute::Gender(self.gender),
            ProfileAttribute::Lifestyle(self.lifestyle),
            ProfileAttribute::Personality(self.personality),
            ProfileAttribute::Pets(self.pets),
            ProfileAttribute::Smoking(self.smoking),
        ]
    }
}
