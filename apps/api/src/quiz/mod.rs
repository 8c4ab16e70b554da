//! English quiz: a fixed question bank, a reducer over the client's quiz state,
//! and AI explanations and tutoring around each question.

pub mod bank;
pub mod handlers;
pub mod prompts;
pub mod session;
pub mod tutor;
