use serde::Serialize;

use crate::models::student::StudentRow;

pub const LOW_ATTENDANCE_PCT: f64 = 75.0;
pub const LOW_MARKS_PCT: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceLabel {
    Excellent,
    Good,
    Average,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl PerformanceLabel {
    pub fn for_pct(pct: f64) -> Self {
        if pct >= 90.0 {
            PerformanceLabel::Excellent
        } else if pct >= 75.0 {
            PerformanceLabel::Good
        } else if pct >= 60.0 {
            PerformanceLabel::Average
        } else {
            PerformanceLabel::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub earned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub attendance_pct: f64,
    pub marks_pct: f64,
    pub remedial_participation: bool,
    pub monthly_credits: i32,
    pub redeemed_this_month: i32,
    pub attendance_label: PerformanceLabel,
    pub marks_label: PerformanceLabel,
    pub nudges: Vec<&'static str>,
    pub badges: Vec<Badge>,
}

/// Missing figures count as zero / not participating.
pub fn progress_for(student: &StudentRow) -> ProgressReport {
    let attendance = student.attendance_pct.unwrap_or(0.0);
    let marks = student.marks_pct.unwrap_or(0.0);
    let remedial = student.remedial_participation.unwrap_or(false);

    let nudges = vec![
        if attendance < LOW_ATTENDANCE_PCT {
            "⚠️ Try to attend regularly! Aim for 90% this month."
        } else {
            "✅ Great job on attendance! Keep it up!"
        },
        if marks < LOW_MARKS_PCT {
            "📖 Spend 30 minutes daily revising. It will help boost marks."
        } else {
            "🎉 You're doing well in academics!"
        },
        if remedial {
            "👏 Attended remedial sessions: extra effort counts!"
        } else {
            "Consider joining a remedial session for bonus credits."
        },
    ];

    let badges = vec![
        Badge {
            label: "Consistent Learner",
            earned: attendance >= 90.0,
        },
        Badge {
            label: "Active Participant",
            earned: remedial,
        },
        Badge {
            label: "Scholar in Progress",
            earned: marks >= 75.0,
        },
    ];

    ProgressReport {
        attendance_pct: attendance,
        marks_pct: marks,
        remedial_participation: remedial,
        monthly_credits: student.monthly_credits.unwrap_or(0),
        redeemed_this_month: student.redeemed_this_month.unwrap_or(0),
        attendance_label: PerformanceLabel::for_pct(attendance),
        marks_label: PerformanceLabel::for_pct(marks),
        nudges,
        badges,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn student(attendance: Option<f64>, marks: Option<f64>, remedial: Option<bool>) -> StudentRow {
        StudentRow {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: None,
            attendance_pct: attendance,
            marks_pct: marks,
            remedial_participation: remedial,
            monthly_credits: Some(120),
            redeemed_this_month: None,
            career_goal: None,
            gender: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(PerformanceLabel::for_pct(90.0), PerformanceLabel::Excellent);
        assert_eq!(PerformanceLabel::for_pct(89.9), PerformanceLabel::Good);
        assert_eq!(PerformanceLabel::for_pct(75.0), PerformanceLabel::Good);
        assert_eq!(PerformanceLabel::for_pct(60.0), PerformanceLabel::Average);
        assert_eq!(PerformanceLabel::for_pct(59.0), PerformanceLabel::NeedsImprovement);
        assert_eq!(
            serde_json::to_value(PerformanceLabel::NeedsImprovement).unwrap(),
            "Needs Improvement"
        );
    }

    #[test]
    fn test_struggling_student() {
        let report = progress_for(&student(Some(70.0), Some(50.0), Some(false)));
        assert!(report.nudges[0].contains("Aim for 90%"));
        assert!(report.nudges[1].contains("30 minutes"));
        assert!(report.nudges[2].starts_with("Consider joining"));
        assert!(report.badges.iter().all(|b| !b.earned));
    }

    #[test]
    fn test_strong_student_earns_all_badges() {
        let report = progress_for(&student(Some(95.0), Some(80.0), Some(true)));
        assert!(report.badges.iter().all(|b| b.earned));
        assert_eq!(report.attendance_label, PerformanceLabel::Excellent);
        assert_eq!(report.marks_label, PerformanceLabel::Good);
    }

    #[test]
    fn test_missing_figures_default_to_zero() {
        let report = progress_for(&student(None, None, None));
        assert_eq!(report.attendance_pct, 0.0);
        assert_eq!(report.monthly_credits, 120);
        assert_eq!(report.redeemed_this_month, 0);
        assert_eq!(report.marks_label, PerformanceLabel::NeedsImprovement);
    }
}
