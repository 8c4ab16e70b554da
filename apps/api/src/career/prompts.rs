// Prompt templates for the career call sites.
// `{input}` is filled by `llm_client::prompts::build_prompt`.

/// Pathway prompt. The input is the rendered student profile block.
pub const PATHWAY_PROMPT_TEMPLATE: &str = r#"You are an AI career mentor for girls and underprivileged youth.

Student Profile:
{input}

Respond ONLY with valid JSON in this exact format (no markdown, no extra text):
{
  "title": "Career pathway title",
  "overview": "2-3 sentence inspiring overview",
  "timeline": "Total estimated timeline",
  "steps": [
    {
      "phase": "Foundation Building",
      "duration": "3-6 months",
      "actions": ["Specific action 1", "Specific action 2", "Specific action 3"],
      "skills": ["Key skill 1", "Key skill 2", "Key skill 3"],
      "resources": ["Free resource 1", "Scholarship program", "Online course"]
    }
  ],
  "mentors": ["Type of mentor 1", "Type of mentor 2", "Industry professional"],
  "opportunities": ["Internship opportunity", "Volunteer work", "Project idea"],
  "milestones": ["Month 3: First milestone", "Month 6: Second milestone", "Year 1: Major milestone"]
}

Focus on FREE resources and opportunities for girls/underprivileged youth."#;

/// Roadmap prompt. The input is the student's own description of what they want.
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"You are a career mentor. Always respond ONLY in valid JSON with these keys:
{
  "career_path": ["Step 1", "Step 2"],
  "recommended_courses_skills": ["Course/Skill 1"],
  "scholarships_mentorships": ["Scholarship/Mentor"],
  "timeline_milestones": ["Year 1 milestone", "Year 2 milestone"]
}

Student request: {input}"#;

pub const PATHWAY_MAX_TOKENS: u32 = 2048;
pub const ROADMAP_MAX_TOKENS: u32 = 600;

/// Shown only in logs; structured call sites replace it with their default plan.
pub const PLAN_UNAVAILABLE: &str = "Career guidance is unavailable right now.";
