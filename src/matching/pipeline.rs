use std::cmp::Ordering;

use tracing::debug;

use super::scoring::{CompatibilityEngine, MatchingConfig, MatchingError};
use crate::UserProfile;

/// One scored candidate from a ranking pass.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub profile: UserProfile,
    pub similarity: f64,
}

pub struct MatchingEngine {
    scorer: CompatibilityEngine,
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            scorer: CompatibilityEngine::new(config),
        }
    }

    pub fn scorer(&self) -> &CompatibilityEngine {
        &self.scorer
    }

    /// Score every candidate against `current` and sort best-first.
    ///
    /// Records carrying the requester's own user id are skipped, so a
    /// requester can never be suggested to themselves regardless of how the
    /// candidate list was fetched. Ties on similarity are broken by profile
    /// id ascending to keep the ordering reproducible.
    pub fn rank_candidates(
        &self,
        current: &UserProfile,
        candidates: &[UserProfile],
    ) -> Result<Vec<RankedCandidate>, MatchingError> {
        let mut ranked = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate.user_id == current.user_id {
                continue;
            }
            let similarity = self.scorer.similarity(current, candidate)?;
            ranked.push(RankedCandidate {
                profile: candidate.clone(),
                similarity,
            });
        }

        ranked.sort_by(|a, b| {
            match b
                .similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
            {
                Ordering::Equal => a.profile.id.cmp(&b.profile.id),
                other => other,
            }
        });

        debug!(
            user_id = current.user_id,
            candidates = candidates.len(),
            ranked = ranked.len(),
            "ranked roommate candidates"
        );

        Ok(ranked)
    }

    /// Top-N suggestions for `current`. A pool smaller than `top_n` is not
    /// an error; everything available is returned. Similarity values stay
    /// internal, callers receive the ranking only.
    pub fn suggest(
        &self,
        current: &UserProfile,
        candidates: &[UserProfile],
        top_n: usize,
    ) -> Result<Vec<UserProfile>, MatchingError> {
        let mut ranked = self.rank_candidates(current, candidates)?;
        ranked.truncate(top_n);
        Ok(ranked.into_iter().map(|entry| entry.profile).collect())
    }
}
