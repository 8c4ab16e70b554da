//! Career planning: prompt → retrying pipeline → structured recovery.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::career::models::{CareerPathway, CareerRoadmap};
use crate::career::prompts::{
    PATHWAY_MAX_TOKENS, PATHWAY_PROMPT_TEMPLATE, PLAN_UNAVAILABLE, ROADMAP_MAX_TOKENS,
    ROADMAP_PROMPT_TEMPLATE,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{build_prompt, PromptOptions};
use crate::llm_client::recover::{recover_structured, RecoverySource};
use crate::llm_client::retry::{DegradedReplies, Pipeline, ReplyStatus};
use crate::llm_client::GenerationRequest;

#[derive(Debug, Clone, Deserialize)]
pub struct PathwayProfile {
    pub career_dream: String,
    pub current_status: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl PathwayProfile {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.career_dream.trim().is_empty() {
            return Err(AppError::Validation("career_dream cannot be empty".to_string()));
        }
        if self.current_status.trim().is_empty() {
            return Err(AppError::Validation("current_status cannot be empty".to_string()));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("Not specified");
        format!(
            "- Career Dream: {}\n- Current Status: {}\n- Location: {}",
            self.career_dream.trim(),
            self.current_status.trim(),
            location
        )
    }
}

/// A plan plus how it was obtained.
#[derive(Debug, Clone, Serialize)]
pub struct Planned<T> {
    pub plan: T,
    pub source: RecoverySource,
    pub reply_status: ReplyStatus,
}

fn unavailable() -> DegradedReplies {
    DegradedReplies::new(PLAN_UNAVAILABLE, PLAN_UNAVAILABLE)
}

pub fn pathway_request(profile: &PathwayProfile) -> GenerationRequest {
    GenerationRequest::new(build_prompt(
        PATHWAY_PROMPT_TEMPLATE,
        &profile.render(),
        &PromptOptions::default(),
    ))
    .temperature(0.7)
    .top_k(Some(40))
    .top_p(Some(0.95))
    .max_output_tokens(PATHWAY_MAX_TOKENS)
}

pub async fn plan_pathway(pipeline: &Pipeline, profile: &PathwayProfile) -> Planned<CareerPathway> {
    let reply = pipeline.reply(&pathway_request(profile), &unavailable()).await;
    let recovered = recover_structured(
        &reply.text,
        CareerPathway::fallback(&profile.career_dream),
        CareerPathway::is_usable,
    );
    info!(
        "Career pathway ready (reply: {:?}, source: {:?}, attempts: {})",
        reply.status, recovered.source, reply.attempts
    );
    Planned {
        plan: recovered.value,
        source: recovered.source,
        reply_status: reply.status,
    }
}

pub async fn plan_roadmap(pipeline: &Pipeline, input: &str) -> Planned<CareerRoadmap> {
    let request = GenerationRequest::new(build_prompt(
        ROADMAP_PROMPT_TEMPLATE,
        input,
        &PromptOptions::default(),
    ))
    .max_output_tokens(ROADMAP_MAX_TOKENS);

    let reply = pipeline.reply(&request, &unavailable()).await;
    let recovered = recover_structured(&reply.text, CareerRoadmap::fallback(), CareerRoadmap::is_usable);
    Planned {
        plan: recovered.value,
        source: recovered.source,
        reply_status: reply.status,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::retry::testing::{pipeline_with, ScriptedGenerator};

    fn profile() -> PathwayProfile {
        PathwayProfile {
            career_dream: "Engineer".into(),
            current_status: "Class 10 student".into(),
            location: None,
        }
    }

    const GOOD_PATHWAY: &str = r#"{"title":"Becoming an Engineer","overview":"o","timeline":"4 years",
        "steps":[{"phase":"Foundation","duration":"6 months","actions":["a"],"skills":["s"],"resources":["r"]}],
        "mentors":["m"],"opportunities":["p"],"milestones":["x"]}"#;

    #[test]
    fn test_profile_rendering_defaults_location() {
        let rendered = profile().render();
        assert!(rendered.contains("- Career Dream: Engineer"));
        assert!(rendered.contains("- Location: Not specified"));
    }

    #[test]
    fn test_profile_validation() {
        assert!(profile().validate().is_ok());
        let blank = PathwayProfile {
            career_dream: "  ".into(),
            ..profile()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_pathway_request_config() {
        let request = pathway_request(&profile());
        assert_eq!(request.config.max_output_tokens, 2048);
        assert_eq!(request.config.top_p, Some(0.95));
        assert!(request.prompt.contains("Class 10 student"));
    }

    #[tokio::test]
    async fn test_pathway_parsed_from_clean_json() {
        let generator = Arc::new(ScriptedGenerator::always_text(GOOD_PATHWAY));
        let planned = plan_pathway(&pipeline_with(generator), &profile()).await;
        assert_eq!(planned.source, RecoverySource::Parsed);
        assert_eq!(planned.plan.title, "Becoming an Engineer");
        assert_eq!(planned.reply_status, ReplyStatus::Generated);
    }

    #[tokio::test]
    async fn test_pathway_defaults_when_provider_down() {
        let generator = Arc::new(ScriptedGenerator::always_status(503));
        let planned = plan_pathway(&pipeline_with(generator.clone()), &profile()).await;
        assert_eq!(planned.source, RecoverySource::Defaulted);
        assert_eq!(planned.reply_status, ReplyStatus::Degraded);
        assert_eq!(planned.plan, CareerPathway::fallback("Engineer"));
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_pathway_keeps_answer_missing_optional_lists() {
        let generator = Arc::new(ScriptedGenerator::always_text(
            r#"{"title":"Becoming a Nurse","overview":"o","timeline":"3 years",
                "steps":[{"phase":"Foundation","duration":"1 year","actions":["Finish 12th"],"skills":["Biology"]}]}"#,
        ));
        let planned = plan_pathway(&pipeline_with(generator), &profile()).await;
        assert_eq!(planned.source, RecoverySource::Parsed);
        assert_eq!(planned.plan.title, "Becoming a Nurse");
        assert!(planned.plan.mentors.is_empty());
    }

    #[tokio::test]
    async fn test_roadmap_extracted_from_prose() {
        let generator = Arc::new(ScriptedGenerator::always_text(
            r#"Sure! {"career_path":["Learn"],"recommended_courses_skills":[],"scholarships_mentorships":[],"timeline_milestones":[]} Good luck"#,
        ));
        let planned = plan_roadmap(&pipeline_with(generator), "nurse").await;
        assert_eq!(planned.source, RecoverySource::Extracted);
        assert_eq!(planned.plan.career_path, vec!["Learn".to_string()]);
    }
}
