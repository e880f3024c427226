//! The inbound generation request and its tone/audience vocabularies.
//!
//! A request is immutable — one per generation call. The JSON field names
//! (`delayTime`, `target`, ...) are the wire contract with the form UI and
//! must not change.

use serde::{Deserialize, Serialize};

/// Tones that ask the model for a comedic register. When one of these is
/// selected, plausibility is deliberately de-emphasized during ranking.
pub const HUMOROUS_TONES: [&str; 3] = ["ユーモラスに", "コミカルに", "ふざけて"];

/// Audiences casual enough that polite speech (敬語) can be dropped.
pub const CASUAL_TARGETS: [&str; 4] = ["友人", "友達", "親友", "後輩"];

/// One lateness-excuse generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcuseRequest {
    /// How late the requester is, free text (e.g. "15分").
    pub delay_time: String,

    /// Who the excuse is addressed to (e.g. "上司", "友人").
    pub target: String,

    /// Optional free-text description of what actually happened.
    #[serde(default)]
    pub situation: Option<String>,

    /// Optional desired tone. Recognized values get tailored prompt
    /// guidance; anything else falls back to generic guidance.
    #[serde(default)]
    pub tone: Option<String>,
}

impl ExcuseRequest {
    /// The tone, if one was supplied and is non-empty.
    pub fn tone(&self) -> Option<&str> {
        self.tone.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// The situation, if one was supplied and is non-empty.
    pub fn situation(&self) -> Option<&str> {
        self.situation
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether the requested tone is one of the humorous variants.
    pub fn is_humorous(&self) -> bool {
        self.tone().is_some_and(|t| HUMOROUS_TONES.contains(&t))
    }

    /// Whether the target is casual enough for frank speech.
    pub fn is_casual_target(&self) -> bool {
        CASUAL_TARGETS.contains(&self.target.trim())
    }

    /// Humorous tone addressed to a casual target: the prompt tells the
    /// model to drop the polite register entirely.
    pub fn avoid_polite_language(&self) -> bool {
        self.is_humorous() && self.is_casual_target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(situation: Option<&str>, tone: Option<&str>) -> ExcuseRequest {
        ExcuseRequest {
            delay_time: "15分".into(),
            target: "友人".into(),
            situation: situation.map(String::from),
            tone: tone.map(String::from),
        }
    }

    #[test]
    fn humorous_tone_recognized() {
        assert!(request(None, Some("ユーモラスに")).is_humorous());
        assert!(request(None, Some("ふざけて")).is_humorous());
        assert!(!request(None, Some("真面目に")).is_humorous());
        assert!(!request(None, None).is_humorous());
    }

    #[test]
    fn frank_register_needs_both_tone_and_target() {
        assert!(request(None, Some("ユーモラスに")).avoid_polite_language());

        let mut to_boss = request(None, Some("ユーモラスに"));
        to_boss.target = "上司".into();
        assert!(!to_boss.avoid_polite_language());

        assert!(!request(None, Some("丁寧に")).avoid_polite_language());
    }

    #[test]
    fn blank_optional_fields_are_absent() {
        let req = request(Some("   "), Some(""));
        assert!(req.situation().is_none());
        assert!(req.tone().is_none());
    }

    #[test]
    fn camel_case_wire_names() {
        let json = r#"{"delayTime":"30分","target":"上司","situation":"電車が遅延した"}"#;
        let req: ExcuseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.delay_time, "30分");
        assert_eq!(req.situation(), Some("電車が遅延した"));
        assert!(req.tone().is_none());
    }
}
