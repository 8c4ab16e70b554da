use serde::{Deserialize, Serialize};

/// One phase of a pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayStep {
    pub phase: String,
    pub duration: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// `title`, `overview`, `timeline` and the `steps` array must be present; the
/// other lists default to empty so a partial answer still keeps its steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPathway {
    pub title: String,
    pub overview: String,
    pub timeline: String,
    pub steps: Vec<PathwayStep>,
    #[serde(default)]
    pub mentors: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl CareerPathway {
    /// Generic but complete plan for `career_dream`.
    pub fn fallback(career_dream: &str) -> Self {
        Self {
            title: format!("Your Path to {}", career_dream.trim()),
            overview: "Let's create a personalized pathway to achieve your career dreams step by step!"
                .to_string(),
            timeline: "12-24 months".to_string(),
            steps: vec![PathwayStep {
                phase: "Getting Started".to_string(),
                duration: "3 months".to_string(),
                actions: strings(&[
                    "Research your field",
                    "Identify required skills",
                    "Create a learning plan",
                ]),
                skills: strings(&["Research", "Planning", "Goal Setting"]),
                resources: strings(&["Online courses", "Library resources", "Career websites"]),
            }],
            mentors: strings(&[
                "Industry professionals",
                "Career counselors",
                "Online communities",
            ]),
            opportunities: strings(&["Volunteer work", "Online projects", "Local networking events"]),
            milestones: strings(&[
                "Month 1: Research complete",
                "Month 3: First project",
                "Month 6: Skills assessment",
            ]),
        }
    }

    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRoadmap {
    pub career_path: Vec<String>,
    pub recommended_courses_skills: Vec<String>,
    pub scholarships_mentorships: Vec<String>,
    pub timeline_milestones: Vec<String>,
}

impl CareerRoadmap {
    pub fn fallback() -> Self {
        Self {
            career_path: strings(&[
                "Explore fields that match your interests",
                "Choose one path and learn its core skills",
                "Build small projects to show what you can do",
            ]),
            recommended_courses_skills: strings(&[
                "Free online courses",
                "Communication skills",
                "Basic computer skills",
            ]),
            scholarships_mentorships: strings(&[
                "Government scholarship portals",
                "School and community mentors",
            ]),
            timeline_milestones: strings(&[
                "Year 1: Learn the basics and finish one course",
                "Year 2: Apply for an internship or scholarship",
            ]),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.career_path.iter().any(|step| !step.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pathway_fallback_is_complete() {
        let plan = CareerPathway::fallback(" Doctor ");
        assert_eq!(plan.title, "Your Path to Doctor");
        assert!(plan.is_usable());
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].phase, "Getting Started");
        assert_eq!(plan.milestones.len(), 3);
    }

    #[test]
    fn test_pathway_missing_lists_default_to_empty() {
        let partial = r#"{"title":"X","overview":"o","timeline":"t",
            "steps":[{"phase":"Foundation","duration":"3 months","actions":["Read"]}]}"#;
        let plan: CareerPathway = serde_json::from_str(partial).unwrap();
        assert!(plan.is_usable());
        assert!(plan.mentors.is_empty());
        assert!(plan.milestones.is_empty());
        assert_eq!(plan.steps[0].actions, vec!["Read".to_string()]);
        assert!(plan.steps[0].resources.is_empty());
    }

    #[test]
    fn test_pathway_without_steps_is_rejected() {
        let partial = r#"{"title":"X","overview":"o","timeline":"t","mentors":[]}"#;
        assert!(serde_json::from_str::<CareerPathway>(partial).is_err());
    }

    #[test]
    fn test_roadmap_usability() {
        assert!(CareerRoadmap::fallback().is_usable());
        let empty = CareerRoadmap {
            career_path: vec!["  ".into()],
            ..CareerRoadmap::fallback()
        };
        assert!(!empty.is_usable());
    }
}
