use crate::errors::AppError;
use crate::llm_client::prompts::{build_prompt, Language, PromptOptions};
use crate::llm_client::retry::{DegradedReplies, Pipeline, Reply};
use crate::llm_client::GenerationRequest;
use crate::mentor::prompts::{
    ASK_MAX_TOKENS, CAREER_GUIDANCE_TEMPLATE, DREAM_PATH_MAX_TOKENS, EXPLAIN_SIMPLY_TEMPLATE,
    MENTOR_SHORT_ANSWER, MENTOR_UNAVAILABLE,
};

fn degraded() -> DegradedReplies {
    DegradedReplies::new(MENTOR_UNAVAILABLE, MENTOR_SHORT_ANSWER)
}

pub fn ask_request(question: &str, language: Language) -> GenerationRequest {
    GenerationRequest::new(build_prompt(
        EXPLAIN_SIMPLY_TEMPLATE,
        question,
        &PromptOptions::in_language(language),
    ))
    .max_output_tokens(ASK_MAX_TOKENS)
}

pub fn dream_path_request(interests: &[String], language: Language) -> GenerationRequest {
    let options = PromptOptions::in_language(language).with_tags(interests.to_vec());
    GenerationRequest::new(build_prompt(CAREER_GUIDANCE_TEMPLATE, "", &options))
        .max_output_tokens(DREAM_PATH_MAX_TOKENS)
}

/// Trims, drops blanks and duplicates (first occurrence wins). At least one
/// interest must survive.
pub fn normalise_interests(raw: &[String]) -> Result<Vec<String>, AppError> {
    let mut interests: Vec<String> = Vec::with_capacity(raw.len());
    for interest in raw.iter().map(|i| i.trim()).filter(|i| !i.is_empty()) {
        if !interests.iter().any(|seen| seen.eq_ignore_ascii_case(interest)) {
            interests.push(interest.to_string());
        }
    }
    if interests.is_empty() {
        return Err(AppError::Validation(
            "Please select at least one interest!".to_string(),
        ));
    }
    Ok(interests)
}

pub async fn ask(pipeline: &Pipeline, question: &str, language: Language) -> Reply {
    pipeline.reply(&ask_request(question, language), &degraded()).await
}

pub async fn dream_path(pipeline: &Pipeline, interests: &[String], language: Language) -> Reply {
    pipeline
        .reply(&dream_path_request(interests, language), &degraded())
        .await
}
