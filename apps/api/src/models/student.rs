use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A student profile. Never selected with the password column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub attendance_pct: Option<f64>,
    pub marks_pct: Option<f64>,
    pub remedial_participation: Option<bool>,
    pub monthly_credits: Option<i32>,
    pub redeemed_this_month: Option<i32>,
    pub career_goal: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Column list matching `StudentRow`, for queries that must not touch `password`.
pub const STUDENT_COLUMNS: &str = "id, name, email, attendance_pct, marks_pct, \
    remedial_participation, monthly_credits, redeemed_this_month, career_goal, gender, created_at";
