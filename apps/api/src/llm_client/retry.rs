//! Bounded retry around a `TextGenerator`, ending in a degraded reply instead of an error.
//!
//! Every path out of `generate_with_retry` is renderable text: user-facing chat and
//! tutor flows never see a provider error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::llm_client::{GenerationRequest, GenerationResponse, TextGenerator};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Waits between attempts. Injected so tests can record delays instead of sleeping.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Production delay backed by the tokio timer.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Linear backoff: the wait before attempt `n` (1-based, n ≥ 2) is `base × (n − 1)`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt.saturating_sub(1)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// The call-site specific texts used when the model cannot answer.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradedReplies {
    /// Returned once every attempt has failed.
    pub exhausted: String,
    /// Placed after the truncation notice when the provider stopped early.
    pub short_answer: String,
}

impl DegradedReplies {
    pub fn new(exhausted: impl Into<String>, short_answer: impl Into<String>) -> Self {
        Self {
            exhausted: exhausted.into(),
            short_answer: short_answer.into(),
        }
    }

    fn truncated(&self, reason: crate::llm_client::extract::TruncationReason) -> String {
        format!("{} {}", reason.notice(), self.short_answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    /// The model's own text.
    Generated,
    /// The model stopped early; a stand-in was substituted.
    Partial,
    /// Every attempt failed; the call site's degraded text was substituted.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub status: ReplyStatus,
    pub attempts: u32,
}

/// Runs `request` against `generator` at most `policy.max_attempts` times, strictly
/// sequentially. Never fails.
pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    policy: &RetryPolicy,
    delay: &dyn Delay,
    degraded: &DegradedReplies,
) -> Reply {
    let max_attempts = policy.attempts();
    let mut attempt = 0;

    while attempt < max_attempts {
        attempt += 1;
        if attempt > 1 {
            let wait = policy.delay_before(attempt);
            debug!(
                "Retrying generation (attempt {attempt}/{max_attempts}) after {}ms",
                wait.as_millis()
            );
            delay.wait(wait).await;
        }

        match generator.generate(request).await {
            Ok(GenerationResponse::Text(text)) => {
                return Reply {
                    text,
                    status: ReplyStatus::Generated,
                    attempts: attempt,
                };
            }
            Ok(GenerationResponse::Truncated(reason)) => {
                return Reply {
                    text: degraded.truncated(reason),
                    status: ReplyStatus::Partial,
                    attempts: attempt,
                };
            }
            Err(e) if e.is_retryable() => {
                warn!("Generation attempt {attempt}/{max_attempts} failed: {e}");
            }
            Err(e) => {
                warn!("Generation attempt {attempt}/{max_attempts} failed permanently: {e}");
                break;
            }
        }
    }

    warn!("Generation exhausted after {attempt} attempt(s); returning degraded reply");
    Reply {
        text: degraded.exhausted.clone(),
        status: ReplyStatus::Degraded,
        attempts: attempt,
    }
}

/// Generator + policy + delay, shared by every handler through `AppState`.
#[derive(Clone)]
pub struct Pipeline {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
    delay: Arc<dyn Delay>,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, policy: RetryPolicy, delay: Arc<dyn Delay>) -> Self {
        Self {
            generator,
            policy,
            delay,
        }
    }

    pub async fn reply(&self, request: &GenerationRequest, degraded: &DegradedReplies) -> Reply {
        generate_with_retry(
            self.generator.as_ref(),
            request,
            &self.policy,
            self.delay.as_ref(),
            degraded,
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted generator and recording delay shared by pipeline and handler tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::llm_client::LlmError;

    pub type Scripted = Box<dyn Fn() -> Result<GenerationResponse, LlmError> + Send + Sync>;

    pub fn step(
        f: impl Fn() -> Result<GenerationResponse, LlmError> + Send + Sync + 'static,
    ) -> Scripted {
        Box::new(f)
    }

    /// Plays back a script of results; the last entry repeats once the script runs out.
    pub struct ScriptedGenerator {
        script: Mutex<VecDeque<Scripted>>,
        last: Scripted,
        pub requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        pub fn new(mut script: Vec<Scripted>) -> Self {
            let last = script.pop().expect("script must not be empty");
            Self {
                script: Mutex::new(script.into()),
                last,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn always_text(text: &'static str) -> Self {
            Self::new(vec![step(move || {
                Ok(GenerationResponse::Text(text.to_string()))
            })])
        }

        pub fn always_status(status: u16) -> Self {
            Self::new(vec![step(move || {
                Err(LlmError::Api {
                    status,
                    message: "scripted failure".into(),
                })
            })])
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(step) => step(),
                None => (self.last)(),
            }
        }
    }

    #[derive(Default)]
    pub struct RecordingDelay {
        pub waits: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Delay for RecordingDelay {
        async fn wait(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    pub fn pipeline_with(generator: Arc<ScriptedGenerator>) -> Pipeline {
        Pipeline::new(
            generator,
            RetryPolicy::default(),
            Arc::new(RecordingDelay::default()),
        )
    }
}
