// Prompt templates for the mentor call sites. Neither has an `{input}` slot: the
// builder appends the question (or the interest list) after the instruction.

pub const EXPLAIN_SIMPLY_TEMPLATE: &str =
    "Explain this in very simple words that a child can understand";

pub const CAREER_GUIDANCE_TEMPLATE: &str = "Based on these interests, suggest 3 suitable careers \
    with exact steps including courses, scholarships, and how to find mentors. \
    Format the response with clear career titles, required courses, scholarship opportunities, \
    and mentorship guidance.";

pub const ASK_MAX_TOKENS: u32 = 1024;
pub const DREAM_PATH_MAX_TOKENS: u32 = 3000;

pub const MENTOR_UNAVAILABLE: &str = "Sorry, I encountered an error. Please try again!";

/// A shorter stand-in used when the model stops early.
pub const MENTOR_SHORT_ANSWER: &str = "Try asking again, or split your question into smaller parts.";

/// Interests offered on the dream-path screen.
pub const INTEREST_CATALOG: [&str; 16] = [
    "Science",
    "Technology",
    "Art",
    "Music",
    "Sports",
    "Writing",
    "Mathematics",
    "History",
    "Languages",
    "Medicine",
    "Engineering",
    "Teaching",
    "Business",
    "Environment",
    "Animals",
    "Space",
];
