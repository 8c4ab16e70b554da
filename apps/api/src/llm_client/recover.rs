//! Structured recovery: turns free-form model text into a typed value.
//!
//! Models are told to answer with bare JSON and regularly don't. Three tiers:
//! 1. parse the (fence-stripped) text directly,
//! 2. parse the outermost `{ ... }` slice,
//! 3. hand back the caller's fully-populated fallback.
//!
//! Callers never see a partial object or an error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Which tier produced the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoverySource {
    Parsed,
    Extracted,
    Defaulted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recovered<T> {
    pub value: T,
    pub source: RecoverySource,
}

/// Recovers a `T` from `raw`, accepting a candidate only if it deserializes and
/// passes `validate`. Falls back to `fallback` untouched.
pub fn recover_structured<T, F>(raw: &str, fallback: T, validate: F) -> Recovered<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    let attempt = |text: &str| -> Option<T> {
        serde_json::from_str::<T>(text)
            .ok()
            .filter(|candidate| validate(candidate))
    };

    if let Some(value) = attempt(strip_json_fences(raw)) {
        debug!("Structured output parsed directly");
        return Recovered {
            value,
            source: RecoverySource::Parsed,
        };
    }

    if let Some(value) = outer_braces(raw).and_then(attempt) {
        debug!("Structured output extracted from surrounding prose");
        return Recovered {
            value,
            source: RecoverySource::Extracted,
        };
    }

    warn!(
        "Structured output unrecoverable, using default: {:?}",
        raw.chars().take(80).collect::<String>()
    );
    Recovered {
        value: fallback,
        source: RecoverySource::Defaulted,
    }
}

/// Greedy match: from the first `{` to the last `}`.
fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Plan {
        title: String,
        steps: Vec<String>,
    }

    fn fallback() -> Plan {
        Plan {
            title: "Default plan".into(),
            steps: vec!["Research your field".into()],
        }
    }

    fn has_title(plan: &Plan) -> bool {
        !plan.title.trim().is_empty()
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_direct_parse_round_trips() {
        let plan = Plan {
            title: "Nurse".into(),
            steps: vec!["Finish 12th grade".into(), "Apply for GNM".into()],
        };
        let raw = serde_json::to_string(&plan).unwrap();
        let recovered = recover_structured(&raw, fallback(), has_title);
        assert_eq!(recovered.value, plan);
        assert_eq!(recovered.source, RecoverySource::Parsed);
    }

    #[test]
    fn test_fenced_json_is_parsed() {
        let raw = "```json\n{\"title\": \"Pilot\", \"steps\": []}\n```";
        let recovered = recover_structured(raw, fallback(), has_title);
        assert_eq!(recovered.value.title, "Pilot");
        assert_eq!(recovered.source, RecoverySource::Parsed);
    }

    #[test]
    fn test_json_wrapped_in_prose_is_extracted() {
        let raw = "Here is your plan: {\"title\":\"X\",\"steps\":[]}";
        let recovered = recover_structured(raw, fallback(), has_title);
        assert_eq!(
            recovered.value,
            Plan {
                title: "X".into(),
                steps: vec![]
            }
        );
        assert_eq!(recovered.source, RecoverySource::Extracted);
    }

    #[test]
    fn test_not_json_defaults_every_time() {
        for _ in 0..3 {
            let recovered = recover_structured("not json at all", fallback(), has_title);
            assert_eq!(recovered.value, fallback());
            assert_eq!(recovered.source, RecoverySource::Defaulted);
        }
    }

    #[test]
    fn test_invalid_shape_defaults() {
        let raw = "{\"title\": \"\", \"steps\": []}";
        let recovered = recover_structured(raw, fallback(), has_title);
        assert_eq!(recovered.source, RecoverySource::Defaulted);
    }

    #[test]
    fn test_wrong_field_types_default() {
        let raw = "Sure! {\"title\": \"Chef\", \"steps\": \"cook a lot\"}";
        let recovered = recover_structured(raw, fallback(), has_title);
        assert_eq!(recovered.value, fallback());
    }

    #[test]
    fn test_outer_braces_requires_ordered_pair() {
        assert_eq!(outer_braces("} oops {"), None);
        assert_eq!(outer_braces("a {b} c {d} e"), Some("{b} c {d}"));
        assert_eq!(outer_braces("no braces"), None);
    }
}
