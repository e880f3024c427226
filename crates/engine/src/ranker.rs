//! Composite scoring and top-3 selection.
//!
//! The three model-assigned axes are combined with tone-dependent weights,
//! then adjusted by the situation-relevance bonus/penalty and the
//! low-verbal-ease penalty. The score exists only for ordering.

use iiwake_core::{Candidate, ExcuseRequest, RankedReason};
use std::cmp::Ordering;

use crate::parser;

/// Below this relevance, a candidate is considered off-topic for the
/// supplied situation.
pub const RELEVANCE_THRESHOLD: f64 = 0.3;

/// Off-topic candidates keep 1% of their base score — heavily penalized,
/// but still ahead of anything genuinely empty.
pub const OFF_TOPIC_PENALTY: f64 = 0.01;

/// On-topic candidates gain relevance × this, which dominates the base
/// score once above the threshold.
pub const RELEVANCE_BONUS: f64 = 200.0;

/// Verbal ease below this suggests the excuse would need physical evidence.
pub const LOW_VERBAL_EASE_CUTOFF: u32 = 60;

/// Multiplier applied to such candidates (non-humorous tones only).
pub const LOW_VERBAL_EASE_PENALTY: f64 = 0.6;

/// How many ranked results are returned downstream.
pub const TOP_RESULTS: usize = 3;

/// Tone-dependent axis weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub persuasiveness: f64,
    pub plausibility: f64,
    pub verbal_ease: f64,
}

impl Weights {
    /// Humorous tones de-emphasize plausibility in favor of how well the
    /// excuse lands when told out loud.
    pub fn for_tone(humorous: bool) -> Self {
        if humorous {
            Self {
                persuasiveness: 0.40,
                plausibility: 0.05,
                verbal_ease: 0.55,
            }
        } else {
            Self {
                persuasiveness: 0.40,
                plausibility: 0.20,
                verbal_ease: 0.40,
            }
        }
    }
}

/// Compute the composite score for one candidate.
///
/// `relevance` is `None` when no situation was supplied (no bonus and no
/// penalty apply).
pub fn composite_score(
    persuasiveness: u32,
    plausibility: u32,
    verbal_ease: u32,
    humorous: bool,
    relevance: Option<f64>,
) -> f64 {
    let weights = Weights::for_tone(humorous);
    let base = f64::from(persuasiveness) * weights.persuasiveness
        + f64::from(plausibility) * weights.plausibility
        + f64::from(verbal_ease) * weights.verbal_ease;

    let mut score = match relevance {
        Some(r) if r < RELEVANCE_THRESHOLD => base * OFF_TOPIC_PENALTY,
        Some(r) => base + r * RELEVANCE_BONUS,
        None => base,
    };

    if !humorous && verbal_ease < LOW_VERBAL_EASE_CUTOFF {
        score *= LOW_VERBAL_EASE_PENALTY;
    }

    score
}

/// Fill in relevance and composite score for every candidate.
pub fn score_candidates(candidates: &mut [Candidate], request: &ExcuseRequest) {
    let humorous = request.is_humorous();
    let situation = request.situation();

    for candidate in candidates {
        candidate.relevance = situation
            .map(|s| parser::relevance(s, &candidate.text))
            .unwrap_or(0.0);
        candidate.score = composite_score(
            candidate.persuasiveness,
            candidate.plausibility,
            candidate.verbal_ease,
            humorous,
            situation.map(|_| candidate.relevance),
        );
    }
}

/// Sort descending by score (stable — ties keep completion order) and map
/// the top results to their ranked form.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<RankedReason> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    candidates
        .into_iter()
        .take(TOP_RESULTS)
        .enumerate()
        .map(|(i, c)| RankedReason::at_rank(i + 1, c.text))
        .collect()
}
