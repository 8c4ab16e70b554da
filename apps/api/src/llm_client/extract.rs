//! Text extraction from provider envelopes.
//!
//! Providers (and provider versions) disagree on where the generated text lives.
//! Each strategy below is a pure probe of one location; `EXTRACTION_CHAIN` is
//! tried in order and the first non-empty string wins.

use serde::Serialize;
use serde_json::Value;

type Strategy = fn(&Value) -> Option<String>;

/// Ordered list of probes. The primary Gemini path must stay first.
const EXTRACTION_CHAIN: &[(&str, Strategy)] = &[
    ("content.parts[0].text", first_part_text),
    ("content.text", content_text),
    ("text", top_level_text),
    ("output", top_level_output),
    ("message.content", message_content),
    ("generated_text", generated_text),
    ("content.parts[*].text", joined_parts_text),
];

/// Why a provider stopped before producing usable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    Length,
    Safety,
}

impl TruncationReason {
    /// Short user-facing explanation placed in front of a stand-in answer.
    pub fn notice(self) -> &'static str {
        match self {
            TruncationReason::Length => {
                "Response was cut off due to length limits. Here is a shorter answer:"
            }
            TruncationReason::Safety => "Content filtered for safety. Here is a simple answer:",
        }
    }
}

/// `candidates[0]` for Gemini, `choices[0]` for chat-completion shaped envelopes.
pub fn first_candidate(envelope: &Value) -> Option<&Value> {
    ["candidates", "choices"]
        .iter()
        .filter_map(|key| envelope.get(key).and_then(Value::as_array))
        .find_map(|list| list.first())
}

/// Runs the extraction chain against one candidate.
pub fn extract_candidate_text(candidate: &Value) -> Option<String> {
    EXTRACTION_CHAIN.iter().find_map(|(name, strategy)| {
        let text = strategy(candidate)?;
        tracing::debug!("Extracted generated text via {name}");
        Some(text)
    })
}

/// Only length and safety stops count; any other finish reason is a plain failure.
pub fn truncation_reason(candidate: &Value) -> Option<TruncationReason> {
    let reason = candidate
        .get("finishReason")
        .or_else(|| candidate.get("finish_reason"))
        .and_then(Value::as_str)?;
    match reason {
        "MAX_TOKENS" | "length" => Some(TruncationReason::Length),
        "SAFETY" | "RECITATION" | "content_filter" => Some(TruncationReason::Safety),
        _ => None,
    }
}

/// Leading and trailing whitespace is dropped; the inside of the text is kept as sent.
fn non_empty(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn first_part_text(candidate: &Value) -> Option<String> {
    non_empty(candidate.pointer("/content/parts/0/text"))
}

fn content_text(candidate: &Value) -> Option<String> {
    non_empty(candidate.pointer("/content/text"))
}

fn top_level_text(candidate: &Value) -> Option<String> {
    non_empty(candidate.get("text"))
}

fn top_level_output(candidate: &Value) -> Option<String> {
    non_empty(candidate.get("output"))
}

fn message_content(candidate: &Value) -> Option<String> {
    non_empty(candidate.pointer("/message/content"))
}

fn generated_text(candidate: &Value) -> Option<String> {
    non_empty(candidate.get("generated_text"))
}

fn joined_parts_text(candidate: &Value) -> Option<String> {
    let joined: String = candidate
        .pointer("/content/parts")?
        .as_array()?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}
