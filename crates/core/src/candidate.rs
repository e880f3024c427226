//! Parsed excuse candidates and the ranked results exposed downstream.

use serde::{Deserialize, Serialize};

/// One excuse parsed from the model's completion, with the three quality
/// axes the model scored it on. Never mutated after scoring; discarded once
/// the top three have been selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// The cleaned excuse narrative.
    pub text: String,

    /// 説得力 — how believable the excuse is (0–100).
    pub persuasiveness: u32,

    /// 実現可能性 — how likely the event is to actually happen (0–100).
    pub plausibility: u32,

    /// 口頭説明の容易さ — how well the excuse holds up without physical
    /// evidence (0–100, higher is better).
    pub verbal_ease: u32,

    /// Optional model-supplied advice for when evidence is demanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_advice: Option<String>,

    /// Fraction of situation tokens found in the narrative (0.0–1.0).
    /// Always 0.0 when no situation was supplied.
    pub relevance: f64,

    /// The composite ranking score. Only meaningful for ordering.
    pub score: f64,
}

/// One of the up-to-three results returned to the caller. Scores and
/// evidence advice are internal and never leave the ranking step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedReason {
    /// Stable sequential identifier: "reason1".."reason3".
    pub id: String,

    /// Display title: "理由1".."理由3".
    pub title: String,

    /// The cleaned excuse narrative.
    pub text: String,
}

impl RankedReason {
    /// Build the result for 1-based rank `rank`.
    pub fn at_rank(rank: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("reason{rank}"),
            title: format!("理由{rank}"),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_reason_identifiers() {
        let reason = RankedReason::at_rank(2, "寝坊しました");
        assert_eq!(reason.id, "reason2");
        assert_eq!(reason.title, "理由2");
    }

    #[test]
    fn candidate_serializes_without_empty_advice() {
        let candidate = Candidate {
            text: "電車が遅れました".into(),
            persuasiveness: 80,
            plausibility: 90,
            verbal_ease: 70,
            evidence_advice: None,
            relevance: 0.0,
            score: 0.0,
        };
        let json = serde_json::to_string(&candidate).unwrap();
        assert!(!json.contains("evidence_advice"));
    }
}
