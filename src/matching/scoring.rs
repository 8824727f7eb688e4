use chrono::NaiveTime;
use thiserror::Error;

use super::weights::WeightConfig;
use crate::clock::{linear_gap_hours, parse_clock_time, ClockTimeError};
use crate::UserProfile;

/// Tunables for pairwise compatibility. The weight tables come from the
/// startup artifact; the affinity thresholds default to the product values
/// (one year, one hour, one bonus point each).
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub weights: WeightConfig,
    /// Maximum age difference, in years, that still earns the bonus.
    pub age_affinity_years: i64,
    /// Maximum wake/bed time gap, in hours, that still earns the bonus.
    pub schedule_affinity_hours: f64,
    /// Points added to the candidate's score per matching affinity.
    pub affinity_bonus: i64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            age_affinity_years: 1,
            schedule_affinity_hours: 1.0,
            affinity_bonus: 1,
        }
    }
}

impl MatchingConfig {
    pub fn with_weights(weights: WeightConfig) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum MatchingError {
    /// The store-side validation should have rejected this record before it
    /// was persisted. Scoring a garbage schedule would produce a
    /// plausible-looking similarity, so the whole request fails instead.
    #[error("profile {profile_id} (user {user_id}) has a malformed {field}: {source}")]
    MalformedTime {
        profile_id: i64,
        user_id: i64,
        field: &'static str,
        #[source]
        source: ClockTimeError,
    },
}

/// Raw weighted score: the sum of configured weights over the profile's
/// scoreable attribute values. The persisted `total_score` column is
/// deliberately not consulted, so a stale snapshot never affects ranking.
pub fn calculate_total_score(weights: &WeightConfig, profile: &UserProfile) -> i64 {
    profile
        .scoreable_attributes()
        .iter()
        .map(|attribute| weights.weight(attribute))
        .sum()
}

pub struct CompatibilityEngine {
    config: MatchingConfig,
}

impl CompatibilityEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn total_score(&self, profile: &UserProfile) -> i64 {
        calculate_total_score(&self.config.weights, profile)
    }

    /// Pairwise similarity in (0, 1]; 1.0 exactly when the adjusted scores
    /// match, shrinking as they diverge.
    ///
    /// Affinity bonuses (close age, close wake time, close bed time) are
    /// credited to the candidate's side only, so `similarity(a, b)` and
    /// `similarity(b, a)` can differ. That asymmetry is pinned behavior;
    /// see DESIGN.md before changing it.
    pub fn similarity(
        &self,
        current: &UserProfile,
        candidate: &UserProfile,
    ) -> Result<f64, MatchingError> {
        let score_current = self.total_score(current);
        let mut score_candidate = self.total_score(candidate);

        let current_wake = wake_up_time(current)?;
        let candidate_wake = wake_up_time(candidate)?;
        let current_bed = bed_time(current)?;
        let candidate_bed = bed_time(candidate)?;

        if (current.age - candidate.age).abs() <= self.config.age_affinity_years {
            score_candidate += self.config.affinity_bonus;
        }
        if linear_gap_hours(current_wake, candidate_wake) <= self.config.schedule_affinity_hours {
            score_candidate += self.config.affinity_bonus;
        }
        if linear_gap_hours(current_bed, candidate_bed) <= self.config.schedule_affinity_hours {
            score_candidate += self.config.affinity_bonus;
        }

        Ok(1.0 / (1.0 + (score_current - score_candidate).abs() as f64))
    }
}

fn wake_up_time(profile: &UserProfile) -> Result<NaiveTime, MatchingError> {
    parsed_time(profile, "wake_up_time", &profile.wake_up_time)
}

fn bed_time(profile: &UserProfile) -> Result<NaiveTime, MatchingError> {
    parsed_time(profile, "bed_time", &profile.bed_time)
}

fn parsed_time(
    profile: &UserProfile,
    field: &'static str,
    raw: &str,
) -> Result<NaiveTime, MatchingError> {
    parse_clock_time(raw).map_err(|source| MatchingError::MalformedTime {
        profile_id: profile.id,
        user_id: profile.user_id,
        field,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, Lifestyle, Personality};

    fn base_weights() -> WeightConfig {
        WeightConfig::from_json_str(
            r#"{
                "gender": {"Male": 2, "Female": 2},
                "lifestyle": {"Clean": 5, "Normal": 3, "Messy": 1},
                "personality": {"Introvert": 2, "Extrovert": 2},
                "pets": {"true": 2, "false": 2},
                "smoking": {"true": 0, "false": 3}
            }"#,
        )
        .expect("valid config")
    }

    fn base_profile() -> UserProfile {
        UserProfile {
            id: 1,
            user_id: 10,
            gender: Gender::Male,
            lifestyle: Lifestyle::Clean,
            personality: Personality::Introvert,
            pets: true,
            smoking: false,
            age: 25,
            wake_up_time: "07:00".into(),
            bed_time: "22:00".into(),
            total_score: 0,
            created_at: None,
            updated_at: None,
        }
    }

    fn engine() -> CompatibilityEngine {
        CompatibilityEngine::new(MatchingConfig::with_weights(base_weights()))
    }

    #[test]
    fn total_score_sums_configured_weights() {
        // 2 (Male) + 5 (Clean) + 2 (Introvert) + 2 (pets) + 3 (non-smoking)
        assert_eq!(engine().total_score(&base_profile()), 14);
    }

    #[test]
    fn total_score_is_deterministic() {
        let engine = engine();
        let profile = base_profile();
        assert_eq!(engine.total_score(&profile), engine.total_score(&profile));
    }

    #[test]
    fn total_score_ignores_persisted_snapshot() {
        let mut profile = base_profile();
        profile.total_score = 999;
        assert_eq!(engine().total_score(&profile), 14);
    }

    #[test]
    fn identical_twin_earns_every_candidate_bonus() {
        let engine = engine();
        let profile = base_profile();
        let mut twin = profile.clone();
        twin.id = 2;
        twin.user_id = 20;

        // An attribute-identical twin triggers all three bonuses on the
        // candidate side: 14 vs 14 + 3 -> 0.25, not 1.0.
        assert_eq!(engine.similarity(&profile, &twin).unwrap(), 0.25);
    }

    #[test]
    fn equal_adjusted_scores_reach_similarity_one() {
        let engine = engine();
        let profile = base_profile();

        // Same raw score, every affinity out of range: no bonus fires and
        // the adjusted scores are equal.
        let mut distant = profile.clone();
        distant.id = 3;
        distant.user_id = 30;
        distant.age = 60;
        distant.wake_up_time = "11:00".into();
        distant.bed_time = "03:00".into();
        assert_eq!(engine.similarity(&profile, &distant).unwrap(), 1.0);
    }

    #[test]
    fn matches_worked_product_example() {
        let engine = engine();
        let current = base_profile();

        let mut candidate = base_profile();
        candidate.id = 2;
        candidate.user_id = 20;
        candidate.age = 26; // gap 1 year -> bonus
        candidate.wake_up_time = "07:30".into(); // gap 0.5h -> bonus
        candidate.bed_time = "23:00".into(); // gap 1h -> bonus

        // raw 14 vs adjusted 17 -> 1 / (1 + 3)
        assert_eq!(engine.similarity(&current, &candidate).unwrap(), 0.25);
    }

    #[test]
    fn bonuses_apply_to_candidate_side_only() {
        let engine = engine();
        let current = base_profile();

        let mut candidate = base_profile();
        candidate.id = 2;
        candidate.user_id = 20;
        candidate.lifestyle = Lifestyle::Messy; // raw 10 vs current's 14

        // Candidate earns all three bonuses: 14 vs 10 + 3 -> 1/2.
        assert_eq!(engine.similarity(&current, &candidate).unwrap(), 0.5);
        // Reversed direction the bonuses land on the other profile:
        // 10 vs 14 + 3 -> 1/8. The asymmetry is intentional until product
        // says otherwise.
        assert_eq!(engine.similarity(&candidate, &current).unwrap(), 0.125);
    }

    #[test]
    fn schedule_gap_beyond_threshold_earns_no_bonus() {
        let engine = engine();
        let current = base_profile();

        let mut candidate = base_profile();
        candidate.id = 2;
        candidate.user_id = 20;
        candidate.age = 40;
        candidate.wake_up_time = "09:30".into();
        candidate.bed_time = "23:30".into();

        // Same raw score, no bonuses -> adjusted scores equal.
        assert_eq!(engine.similarity(&current, &candidate).unwrap(), 1.0);
    }

    #[test]
    fn malformed_stored_time_fails_loudly() {
        let engine = engine();
        let current = base_profile();

        let mut candidate = base_profile();
        candidate.id = 2;
        candidate.user_id = 20;
        candidate.bed_time = "25:00".into();

        let err = engine.similarity(&current, &candidate).unwrap_err();
        assert!(matches!(
            err,
            MatchingError::MalformedTime {
                profile_id: 2,
                field: "bed_time",
                ..
            }
        ));
    }

    #[test]
    fn affinity_thresholds_are_configurable() {
        let mut config = MatchingConfig::with_weights(base_weights());
        config.age_affinity_years = 10;
        config.affinity_bonus = 2;
        let engine = CompatibilityEngine::new(config);

        let current = base_profile();
        let mut candidate = base_profile();
        candidate.id = 2;
        candidate.user_id = 20;
        candidate.age = 33;
        candidate.wake_up_time = "11:00".into();
        candidate.bed_time = "03:00".into();

        // Only the widened age affinity fires, worth two points now.
        assert_eq!(engine.similarity(&current, &candidate).unwrap(), 1.0 / 3.0);
    }
}
