//! The AI mentor: open questions explained simply, and career ideas from a set
//! of interests, in the student's chosen language.

pub mod guidance;
pub mod handlers;
pub mod prompts;
