use crate::llm_client::prompts::{build_prompt, PromptOptions};
use crate::llm_client::retry::{DegradedReplies, Pipeline, Reply};
use crate::llm_client::GenerationRequest;
use crate::quiz::bank::Question;
use crate::quiz::prompts::{
    EXPLANATION_MAX_TOKENS, EXPLANATION_PROMPT_TEMPLATE, TUTOR_MAX_TOKENS, TUTOR_PROMPT_TEMPLATE,
    TUTOR_UNAVAILABLE,
};

fn fill_question(template: &str, question: &Question) -> String {
    template
        .replace("{question}", question.prompt)
        .replace("{correct_answer}", question.answer)
}

pub fn explanation_request(question: &Question, chosen: &str, correct: bool) -> GenerationRequest {
    let template = fill_question(EXPLANATION_PROMPT_TEMPLATE, question)
        .replace("{result}", if correct { "CORRECT ✅" } else { "WRONG ❌" })
        .replace(
            "{opening}",
            if correct {
                "🎉 Great job!"
            } else {
                "💡 Let me help you understand!"
            },
        )
        .replace(
            "{closing}",
            &if correct {
                "Keep up the good work!".to_string()
            } else {
                format!("Remember: {} is correct because...", question.answer)
            },
        );

    GenerationRequest::new(build_prompt(&template, chosen, &PromptOptions::default()))
        .temperature(0.7)
        .top_k(Some(40))
        .top_p(Some(0.8))
        .max_output_tokens(EXPLANATION_MAX_TOKENS)
}

/// Offline explanation texts. The long form follows a connection failure, the
/// short form follows a truncated answer.
pub fn explanation_degraded(question: &Question, correct: bool) -> DegradedReplies {
    let (long, short) = if correct {
        (
            "🎉 Great job! You got it right! Keep practicing to improve your English.".to_string(),
            "🎉 Great job! You got it right!".to_string(),
        )
    } else {
        (
            format!(
                "💡 The correct answer is \"{}\". Don't worry, making mistakes is how we learn! \
                 Try to remember this for next time.",
                question.answer
            ),
            format!("💡 The correct answer is \"{}\". Keep practicing!", question.answer),
        )
    };
    DegradedReplies::new(
        format!(
            "🤖 I'm having trouble connecting to my AI teacher right now. \
             Let me give you a quick explanation:\n\n{long}\n\n\
             🔄 Please try again in a moment for a detailed AI explanation."
        ),
        short,
    )
}

pub fn tutor_request(question: &Question, message: &str) -> GenerationRequest {
    let template = fill_question(TUTOR_PROMPT_TEMPLATE, question);
    GenerationRequest::new(build_prompt(&template, message, &PromptOptions::default()))
        .temperature(0.7)
        .top_k(None)
        .top_p(None)
        .max_output_tokens(TUTOR_MAX_TOKENS)
}

pub async fn explain(pipeline: &Pipeline, question: &Question, chosen: &str, correct: bool) -> Reply {
    pipeline
        .reply(
            &explanation_request(question, chosen, correct),
            &explanation_degraded(question, correct),
        )
        .await
}

pub async fn tutor(pipeline: &Pipeline, question: &Question, message: &str) -> Reply {
    pipeline
        .reply(
            &tutor_request(question, message),
            &DegradedReplies::new(TUTOR_UNAVAILABLE, TUTOR_UNAVAILABLE),
        )
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::extract::TruncationReason;
    use crate::llm_client::retry::testing::{pipeline_with, step, ScriptedGenerator};
    use crate::llm_client::retry::ReplyStatus;
    use crate::llm_client::GenerationResponse;
    use crate::quiz::bank;

    fn first_question() -> &'static Question {
        &bank::LEVELS[0].questions[0]
    }

    #[test]
    fn test_explanation_prompt_mentions_everything() {
        let request = explanation_request(first_question(), "Hola", false);
        assert!(request.prompt.contains("Question: \"How do you say 'Hello' in English?\""));
        assert!(request.prompt.contains("Student's answer: \"Hola\""));
        assert!(request.prompt.contains("Result: WRONG ❌"));
        assert!(request.prompt.contains("Remember: Hello is correct because..."));
        assert_eq!(request.config.top_p, Some(0.8));
        assert_eq!(request.config.max_output_tokens, 300);
    }

    #[test]
    fn test_tutor_request_omits_sampling_extras() {
        let request = tutor_request(first_question(), "  why not Hola? ");
        assert!(request.prompt.contains("The student asks: \"why not Hola?\""));
        assert_eq!(request.config.top_k, None);
        assert_eq!(request.config.top_p, None);
        assert_eq!(request.config.max_output_tokens, 100);
    }

    #[tokio::test]
    async fn test_explanation_falls_back_with_correct_answer() {
        let generator = Arc::new(ScriptedGenerator::always_status(502));
        let reply = explain(&pipeline_with(generator), first_question(), "Ciao", false).await;
        assert_eq!(reply.status, ReplyStatus::Degraded);
        assert!(reply.text.starts_with("🤖 I'm having trouble connecting"));
        assert!(reply.text.contains("The correct answer is \"Hello\""));
    }

    #[tokio::test]
    async fn test_truncated_explanation_uses_short_answer() {
        let generator = Arc::new(ScriptedGenerator::new(vec![step(|| {
            Ok(GenerationResponse::Truncated(TruncationReason::Length))
        })]));
        let reply = explain(&pipeline_with(generator), first_question(), "Hello", true).await;
        assert_eq!(reply.status, ReplyStatus::Partial);
        assert!(reply.text.ends_with("🎉 Great job! You got it right!"));
    }
}
