//! Completion parsing — free text in, structured candidates out.
//!
//! The completion is expected to repeat this block, blocks separated by
//! blank lines:
//!
//! ```text
//! <narrative text, no enumeration markers, no markdown>
//! 説得力: <int>, 実現可能性: <int>, 口頭説明の容易さ: <int>
//! 証拠を求められたら: <advice>      (optional)
//! ```
//!
//! Segmentation is a strict per-block grammar: a block without a parseable
//! scoring line is counted and skipped, never aborting the batch. Upstream
//! models do not always follow the convention, so the labels here and in
//! `prompt` must stay in lockstep.

use iiwake_core::error::ParseError;
use iiwake_core::Candidate;
use regex_lite::Regex;
use tracing::debug;

/// The scoring line. Field order and labels are the wire contract with the
/// prompt's `参考フォーマット` section. Accepts both ASCII and full-width
/// colons and comma separators.
const SCORE_LINE: &str =
    r"^説得力[:：]\s*(\d+)\s*[,、]\s*実現可能性[:：]\s*(\d+)\s*[,、]\s*口頭説明の容易さ[:：]\s*(\d+)";

/// The optional evidence-advice line.
const EVIDENCE_LINE: &str = r"^証拠を求められたら[:：]\s*(.+)$";

/// Result of parsing one completion.
#[derive(Debug)]
pub struct ParseOutcome {
    /// Valid candidates in completion order. Relevance and score are not
    /// yet computed (the ranker owns those).
    pub candidates: Vec<Candidate>,
    /// Malformed blocks that were skipped.
    pub blocks_skipped: usize,
}

/// Parse a raw completion into candidates.
///
/// Fails only when nothing valid remains: an empty completion or a
/// completion in which every block is malformed.
pub fn parse_completion(raw: &str) -> Result<ParseOutcome, ParseError> {
    let normalized = raw.replace("\r\n", "\n");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Err(ParseError::EmptyCompletion);
    }

    let score_line = Regex::new(SCORE_LINE).expect("score line pattern is valid");
    let evidence_line = Regex::new(EVIDENCE_LINE).expect("evidence line pattern is valid");

    let mut candidates = Vec::new();
    let mut blocks_skipped = 0usize;

    for block in blocks(normalized) {
        match parse_block(&block, &score_line, &evidence_line) {
            Some(candidate) => candidates.push(candidate),
            None => {
                blocks_skipped += 1;
                debug!(block = %block.join(" / "), "Skipping malformed excuse block");
            }
        }
    }

    if candidates.is_empty() {
        return Err(ParseError::NoCandidates { blocks_skipped });
    }

    Ok(ParseOutcome {
        candidates,
        blocks_skipped,
    })
}

/// Split the normalized text into blocks on blank lines.
fn blocks(text: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Parse one block. Returns `None` when the block is malformed: no scoring
/// line, unparseable integers, or no narrative left after cleanup.
fn parse_block(lines: &[String], score_line: &Regex, evidence_line: &Regex) -> Option<Candidate> {
    let score_idx = lines
        .iter()
        .position(|line| score_line.is_match(line.trim()))?;

    let caps = score_line.captures(lines[score_idx].trim())?;
    let persuasiveness = parse_axis(caps.get(1)?.as_str())?;
    let plausibility = parse_axis(caps.get(2)?.as_str())?;
    let verbal_ease = parse_axis(caps.get(3)?.as_str())?;

    let narrative = lines[..score_idx].join("\n");
    let text = clean_narrative(&narrative);
    if text.is_empty() {
        return None;
    }

    let evidence_advice = lines[score_idx + 1..].iter().find_map(|line| {
        evidence_line
            .captures(line.trim())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    });

    Some(Candidate {
        text,
        persuasiveness,
        plausibility,
        verbal_ease,
        evidence_advice,
        relevance: 0.0,
        score: 0.0,
    })
}

/// Parse one 0–100 axis value. Values above 100 saturate; values that do
/// not parse as integers invalidate the block.
fn parse_axis(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().map(|v| v.min(100))
}

/// Strip enumeration markers, emphasis markup, list markers, and invisible
/// characters from a narrative.
///
/// Applied to a fixpoint, so the cleanup is idempotent: cleaning already
/// clean text is a no-op.
pub fn clean_narrative(raw: &str) -> String {
    let enumeration = Regex::new(r"^\d+\.\s*").expect("enumeration pattern is valid");

    let mut text: String = raw
        .chars()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .collect();

    loop {
        let mut pass = text.trim().to_string();

        if let Some(m) = enumeration.find(&pass) {
            pass = pass[m.end()..].to_string();
        }
        if let Some(stripped) = pass.strip_prefix("**") {
            pass = stripped.trim_start().to_string();
        }
        if let Some(stripped) = pass.strip_suffix("**") {
            pass = stripped.trim_end().to_string();
        }
        for marker in ['-', '*', '#'] {
            if let Some(stripped) = pass.strip_prefix(marker) {
                pass = stripped.trim_start().to_string();
            }
        }

        let pass = pass.trim().to_string();
        if pass == text {
            return pass;
        }
        text = pass;
    }
}

/// Fraction of situation tokens found in the narrative.
///
/// Both texts are lowercased and split into word-like tokens; a situation
/// token counts as matched when it contains, or is contained by, any
/// narrative token. Returns 0.0 when the situation yields no tokens.
pub fn relevance(situation: &str, narrative: &str) -> f64 {
    let situation_tokens = tokens(situation);
    if situation_tokens.is_empty() {
        return 0.0;
    }
    let narrative_tokens = tokens(narrative);

    let matched = situation_tokens
        .iter()
        .filter(|s| {
            narrative_tokens
                .iter()
                .any(|n| n.contains(s.as_str()) || s.contains(n.as_str()))
        })
        .count();

    matched as f64 / situation_tokens.len() as f64
}

/// Lowercase word-like tokens: split on whitespace and common Japanese /
/// ASCII punctuation, drop empties.
fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, '、' | ',' | '。' | '.'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
