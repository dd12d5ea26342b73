//! Recommendation and blending over tracker scores.

use crate::clock::Clock;
use crate::config::RecommendWeights;
use crate::model::intent::Intent;
use crate::personalization::tables::{affinity_matches, ambient_tags};
use crate::tracker::BehaviorTracker;
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_RECOMMEND_LIMIT: usize = 3;

const AMBIENT_MIN_TAGS: usize = 3;

/// Stateless ranking engine; reads tracker state, never writes it.
#[derive(Debug, Clone, Default)]
pub struct PersonalizationEngine {
    weights: RecommendWeights,
}

impl PersonalizationEngine {
    pub fn new(weights: RecommendWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RecommendWeights {
        &self.weights
    }

    /// Returns 3 or 4 shuffled ambient labels for `title` using the thread rng.
    pub fn ambient_vibes(&self, title: &str) -> Vec<&'static str> {
        self.ambient_vibes_with(title, &mut rand::thread_rng())
    }

    /// Same as `ambient_vibes` with a caller-provided random source.
    ///
    /// Unknown titles yield an empty list without consuming randomness.
    pub fn ambient_vibes_with<R: Rng>(&self, title: &str, rng: &mut R) -> Vec<&'static str> {
        let tags = ambient_tags(title);
        if tags.is_empty() {
            return Vec::new();
        }

        let mut shuffled = tags.to_vec();
        shuffled.shuffle(rng);
        let take = (AMBIENT_MIN_TAGS + rng.gen_range(0..2)).min(shuffled.len());
        shuffled.truncate(take);
        shuffled
    }

    /// Ranks `intents` by tag affinity, behavior score and positive reactions.
    ///
    /// `score = tag_match·matches + tracker.score(id) + feels_right_boost·feels_right`
    ///
    /// Returns at most `limit` intents, best first; ties keep feed order.
    pub fn recommend<C: Clock, S: AsRef<str>>(
        &self,
        tracker: &BehaviorTracker<C>,
        intents: &[Intent],
        user_tags: &[S],
        limit: usize,
    ) -> Vec<Intent> {
        let mut scored = intents
            .iter()
            .map(|intent| {
                let matches = affinity_matches(&intent.title, user_tags) as f64;
                let feels_right = f64::from(tracker.reactions(&intent.id).feels_right);
                let score = self.weights.tag_match * matches
                    + tracker.score(&intent.id)
                    + self.weights.feels_right_boost * feels_right;
                (intent, score)
            })
            .collect::<Vec<_>>();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .take(limit)
            .map(|(intent, _)| intent.clone())
            .collect()
    }

    /// Picks intents that match several declared tags at once.
    ///
    /// Returns an empty list when fewer than two user tags are declared.
    /// Otherwise keeps intents with at least `blend_min_matches` matches,
    /// ranks them by `blend_tag_match·matches + tracker.score(id)` and returns
    /// at most `blend_limit`.
    pub fn blend<C: Clock, S: AsRef<str>>(
        &self,
        tracker: &BehaviorTracker<C>,
        user_tags: &[S],
        intents: &[Intent],
    ) -> Vec<Intent> {
        if user_tags.len() < 2 {
            return Vec::new();
        }

        let mut blended = intents
            .iter()
            .filter_map(|intent| {
                let matches = affinity_matches(&intent.title, user_tags);
                (matches >= self.weights.blend_min_matches).then(|| {
                    let score = self.weights.blend_tag_match * matches as f64
                        + tracker.score(&intent.id);
                    (intent, score)
                })
            })
            .collect::<Vec<_>>();

        blended.sort_by(|a, b| b.1.total_cmp(&a.1));
        blended
            .into_iter()
            .take(self.weights.blend_limit)
            .map(|(intent, _)| intent.clone())
            .collect()
    }
}
