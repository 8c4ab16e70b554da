// Prompt templates for the quiz tutor. `{question}`, `{correct_answer}` and
// `{result}` are replaced directly; `{input}` goes through `build_prompt`.

pub const EXPLANATION_PROMPT_TEMPLATE: &str = r#"You are a friendly English teacher helping a beginner student.

Question: "{question}"
Student's answer: "{input}"
Correct answer: "{correct_answer}"
Result: {result}

Please provide a simple, encouraging explanation in 3-4 short sentences. Use simple English.

Format your response like this:
{opening}

[Your explanation here]

{closing}"#;

pub const TUTOR_PROMPT_TEMPLATE: &str = r#"You are a friendly English tutor. The student is learning English and is currently on this question:

Question: "{question}"
Correct Answer: "{correct_answer}"

The student asks: "{input}"

Please provide a helpful, simple response in 2-3 sentences using basic English. If they ask about the current question, help them understand it better."#;

pub const EXPLANATION_MAX_TOKENS: u32 = 300;
pub const TUTOR_MAX_TOKENS: u32 = 100;

pub const TUTOR_UNAVAILABLE: &str =
    "I'm here to help! Feel free to ask me anything about this question or English in general.";
