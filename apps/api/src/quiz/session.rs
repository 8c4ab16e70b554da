//! Quiz progress as one explicit state record with a single update entry point.
//!
//! The server keeps no quiz state: the client sends its `QuizState` with every
//! action and gets the next one back. `apply` checks the incoming record before
//! touching it, so a tampered or stale state is rejected rather than scored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;
use crate::quiz::bank::{self, Level, Question};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    pub level: u8,
    pub question_index: usize,
    pub score: u32,
    /// The option picked for the current question, once answered.
    #[serde(default)]
    pub answered: Option<String>,
    #[serde(default)]
    pub level_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "answer", rename_all = "snake_case")]
pub enum QuizAction {
    Answer(String),
    Next,
    Reset,
}

/// What an action did, beyond the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Answered {
        question: &'static Question,
        correct: bool,
    },
    Advanced,
    Completed { score: u32, percent: u32 },
    Restarted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("level {0} does not exist")]
    UnknownLevel(u8),
    #[error("quiz state is not valid for this level")]
    InvalidState,
    #[error("'{0}' is not one of the options")]
    NotAnOption(String),
    #[error("this question has already been answered")]
    AlreadyAnswered,
    #[error("answer the current question first")]
    NotAnswered,
    #[error("this level is already complete")]
    LevelComplete,
}

impl From<QuizError> for AppError {
    fn from(e: QuizError) -> Self {
        match e {
            QuizError::UnknownLevel(_) => AppError::NotFound(e.to_string()),
            QuizError::InvalidState | QuizError::NotAnOption(_) => AppError::Validation(e.to_string()),
            _ => AppError::UnprocessableEntity(e.to_string()),
        }
    }
}

impl QuizState {
    pub fn start(level: u8) -> Result<Self, QuizError> {
        bank::level(level).ok_or(QuizError::UnknownLevel(level))?;
        Ok(Self {
            level,
            question_index: 0,
            score: 0,
            answered: None,
            level_complete: false,
        })
    }

    /// Resolves the level and checks the record is one `apply` could have produced.
    pub fn checked_level(&self) -> Result<&'static Level, QuizError> {
        let level = bank::level(self.level).ok_or(QuizError::UnknownLevel(self.level))?;
        let last = level.questions.len() - 1;
        if self.question_index > last {
            return Err(QuizError::InvalidState);
        }
        let answered_count = u32::try_from(self.question_index)
            .ok()
            .and_then(|index| index.checked_add(u32::from(self.answered.is_some())))
            .ok_or(QuizError::InvalidState)?;
        let consistent = self.score <= answered_count
            && (!self.level_complete || (self.question_index == last && self.answered.is_some()));
        if !consistent {
            return Err(QuizError::InvalidState);
        }
        Ok(level)
    }

    pub fn current_question(&self) -> Result<&'static Question, QuizError> {
        let level = self.checked_level()?;
        level
            .question(self.question_index)
            .ok_or(QuizError::InvalidState)
    }

    pub fn apply(&self, action: QuizAction) -> Result<(QuizState, QuizEvent), QuizError> {
        let level = self.checked_level()?;

        match action {
            QuizAction::Reset => Ok((QuizState::start(self.level)?, QuizEvent::Restarted)),

            QuizAction::Answer(choice) => {
                if self.level_complete {
                    return Err(QuizError::LevelComplete);
                }
                if self.answered.is_some() {
                    return Err(QuizError::AlreadyAnswered);
                }
                let question = level
                    .question(self.question_index)
                    .ok_or(QuizError::InvalidState)?;
                if !question.options.contains(&choice.as_str()) {
                    return Err(QuizError::NotAnOption(choice));
                }
                let correct = choice == question.answer;
                let next = QuizState {
                    score: self.score + u32::from(correct),
                    answered: Some(choice),
                    ..self.clone()
                };
                Ok((next, QuizEvent::Answered { question, correct }))
            }

            QuizAction::Next => {
                if self.level_complete {
                    return Err(QuizError::LevelComplete);
                }
                if self.answered.is_none() {
                    return Err(QuizError::NotAnswered);
                }
                if self.question_index + 1 < level.questions.len() {
                    let next = QuizState {
                        question_index: self.question_index + 1,
                        answered: None,
                        ..self.clone()
                    };
                    Ok((next, QuizEvent::Advanced))
                } else {
                    let next = QuizState {
                        level_complete: true,
                        ..self.clone()
                    };
                    let percent = percent(self.score, level.questions.len());
                    Ok((
                        next,
                        QuizEvent::Completed {
                            score: self.score,
                            percent,
                        },
                    ))
                }
            }
        }
    }
}

fn percent(score: u32, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(score) / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_of(state: &QuizState) -> String {
        state.current_question().unwrap().answer.to_string()
    }

    fn wrong_of(state: &QuizState) -> String {
        let question = state.current_question().unwrap();
        question
            .options
            .iter()
            .find(|o| **o != question.answer)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_start_unknown_level() {
        assert_eq!(QuizState::start(42), Err(QuizError::UnknownLevel(42)));
    }

    #[test]
    fn test_correct_answer_scores() {
        let state = QuizState::start(1).unwrap();
        let (next, event) = state.apply(QuizAction::Answer("Hello".into())).unwrap();
        assert_eq!(next.score, 1);
        assert_eq!(next.answered.as_deref(), Some("Hello"));
        assert!(matches!(event, QuizEvent::Answered { correct: true, .. }));
    }

    #[test]
    fn test_wrong_answer_keeps_score() {
        let state = QuizState::start(1).unwrap();
        let (next, event) = state.apply(QuizAction::Answer("Hola".into())).unwrap();
        assert_eq!(next.score, 0);
        match event {
            QuizEvent::Answered { question, correct } => {
                assert!(!correct);
                assert_eq!(question.answer, "Hello");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_answer_twice_rejected() {
        let state = QuizState::start(1).unwrap();
        let (answered, _) = state.apply(QuizAction::Answer("Hello".into())).unwrap();
        assert_eq!(
            answered.apply(QuizAction::Answer("Hola".into())),
            Err(QuizError::AlreadyAnswered)
        );
    }

    #[test]
    fn test_next_requires_answer() {
        let state = QuizState::start(3).unwrap();
        assert_eq!(state.apply(QuizAction::Next), Err(QuizError::NotAnswered));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let state = QuizState::start(1).unwrap();
        assert_eq!(
            state.apply(QuizAction::Answer("Namaste".into())),
            Err(QuizError::NotAnOption("Namaste".into()))
        );
    }

    #[test]
    fn test_full_level_run_completes() {
        let mut state = QuizState::start(5).unwrap();
        let mut completed = None;
        for i in 0..bank::QUESTIONS_PER_LEVEL {
            let choice = if i % 2 == 0 { answer_of(&state) } else { wrong_of(&state) };
            state = state.apply(QuizAction::Answer(choice)).unwrap().0;
            let (next, event) = state.apply(QuizAction::Next).unwrap();
            state = next;
            if let QuizEvent::Completed { score, percent } = event {
                completed = Some((score, percent));
            }
        }
        assert_eq!(completed, Some((5, 50)));
        assert!(state.level_complete);
        assert_eq!(state.apply(QuizAction::Next), Err(QuizError::LevelComplete));

        let (reset, event) = state.apply(QuizAction::Reset).unwrap();
        assert_eq!(event, QuizEvent::Restarted);
        assert_eq!(reset, QuizState::start(5).unwrap());
    }

    #[test]
    fn test_tampered_state_rejected() {
        let inflated = QuizState {
            level: 1,
            question_index: 2,
            score: 7,
            answered: None,
            level_complete: false,
        };
        assert_eq!(inflated.apply(QuizAction::Next), Err(QuizError::InvalidState));

        let past_end = QuizState {
            question_index: 10,
            score: 0,
            ..inflated.clone()
        };
        assert_eq!(past_end.apply(QuizAction::Reset), Err(QuizError::InvalidState));
    }

    #[test]
    fn test_huge_question_index_rejected() {
        let state = QuizState {
            level: 1,
            question_index: u32::MAX as usize,
            score: 0,
            answered: Some("Hello".into()),
            level_complete: false,
        };
        assert_eq!(state.apply(QuizAction::Next), Err(QuizError::InvalidState));

        let beyond = QuizState {
            question_index: usize::MAX,
            ..state
        };
        assert_eq!(beyond.current_question(), Err(QuizError::InvalidState));
    }

    #[test]
    fn test_action_wire_format() {
        let answer: QuizAction =
            serde_json::from_str(r#"{"type":"answer","answer":"Hello"}"#).unwrap();
        assert_eq!(answer, QuizAction::Answer("Hello".into()));
        let next: QuizAction = serde_json::from_str(r#"{"type":"next"}"#).unwrap();
        assert_eq!(next, QuizAction::Next);
    }
}
