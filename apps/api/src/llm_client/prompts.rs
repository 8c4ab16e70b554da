// Shared prompt fragments and the prompt builder.
// Each feature that calls the model defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

use serde::{Deserialize, Serialize};

/// Placeholder for the user's free text.
pub const INPUT_SLOT: &str = "{input}";
/// Placeholder for the comma-joined topic tags.
pub const TAGS_SLOT: &str = "{tags}";

/// Languages the app offers for generated answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "or")]
    Odia,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Malayalam,
        Language::Kannada,
        Language::Marathi,
        Language::Bengali,
        Language::Gujarati,
        Language::Odia,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Malayalam => "ml",
            Language::Kannada => "kn",
            Language::Marathi => "mr",
            Language::Bengali => "bn",
            Language::Gujarati => "gu",
            Language::Odia => "or",
        }
    }

    /// Name as shown to (and written for) the student.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Tamil => "தமிழ்",
            Language::Telugu => "తెలుగు",
            Language::Malayalam => "മലയാളം",
            Language::Kannada => "ಕನ್ನಡ",
            Language::Marathi => "मराठी",
            Language::Bengali => "বাংলা",
            Language::Gujarati => "ગુજરાતી",
            Language::Odia => "ଓଡ଼ିଆ",
        }
    }

    /// Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Language {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code.trim()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptOptions {
    pub language: Option<Language>,
    pub tags: Vec<String>,
}

impl PromptOptions {
    pub fn in_language(language: Language) -> Self {
        Self {
            language: Some(language),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Combines a template, the user's text and options into the final prompt.
///
/// Pure: identical arguments always give the identical string. Tags are filled in
/// before the input, so a student typing `{tags}` gets it back verbatim.
/// Callers reject empty input before getting here; an empty input still yields a
/// well-formed prompt.
pub fn build_prompt(template: &str, user_input: &str, options: &PromptOptions) -> String {
    let input = user_input.trim();
    let tags = options.tags.join(", ");

    let mut prompt = if template.contains(TAGS_SLOT) {
        template.replace(TAGS_SLOT, &tags)
    } else {
        template.to_string()
    };

    prompt = if prompt.contains(INPUT_SLOT) {
        prompt.replace(INPUT_SLOT, input)
    } else if input.is_empty() {
        prompt
    } else {
        format!("{prompt}: \"{input}\".")
    };

    if !template.contains(TAGS_SLOT) && !options.tags.is_empty() {
        prompt.push_str(&format!(" Selected interests: [{tags}]."));
    }

    if let Some(language) = options.language {
        prompt.push_str(&format!(
            " Please respond in {} language.",
            language.native_name()
        ));
    }

    prompt
}
