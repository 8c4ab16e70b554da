//! Credential checks against the `students` table.
//!
//! Passwords are stored as pgcrypto `crypt()` hashes and compared inside Postgres,
//! so plaintext never leaves the request that carried it.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::student::{StudentRow, STUDENT_COLUMNS};

/// Either identifier may be used; exactly one must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub student_id: Option<Uuid>,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentity {
    Email(String),
    StudentId(Uuid),
}

impl LoginRequest {
    /// Input checks done before the database is touched.
    pub fn identity(&self) -> Result<LoginIdentity, AppError> {
        if self.password.is_empty() {
            return Err(AppError::Validation("password cannot be empty".to_string()));
        }
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());
        match (email, self.student_id) {
            (Some(email), None) => {
                if !email.contains('@') {
                    return Err(AppError::Validation("email is not valid".to_string()));
                }
                Ok(LoginIdentity::Email(email.to_lowercase()))
            }
            (None, Some(id)) => Ok(LoginIdentity::StudentId(id)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "provide either email or student_id, not both".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "email or student_id is required".to_string(),
            )),
        }
    }
}

/// Returns the student when the password matches, `None` otherwise.
pub async fn verify_credentials(
    db: &PgPool,
    identity: &LoginIdentity,
    password: &str,
) -> Result<Option<StudentRow>, AppError> {
    let student = match identity {
        LoginIdentity::Email(email) => {
            sqlx::query_as::<_, StudentRow>(&format!(
                "SELECT {STUDENT_COLUMNS} FROM students \
                 WHERE lower(email) = $1 AND password IS NOT NULL AND password = crypt($2, password)"
            ))
            .bind(email)
            .bind(password)
            .fetch_optional(db)
            .await?
        }
        LoginIdentity::StudentId(id) => {
            sqlx::query_as::<_, StudentRow>(&format!(
                "SELECT {STUDENT_COLUMNS} FROM students \
                 WHERE id = $1 AND password IS NOT NULL AND password = crypt($2, password)"
            ))
            .bind(id)
            .bind(password)
            .fetch_optional(db)
            .await?
        }
    };
    Ok(student)
}

pub async fn find_student(db: &PgPool, student_id: Uuid) -> Result<Option<StudentRow>, AppError> {
    let student = sqlx::query_as::<_, StudentRow>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
    ))
    .bind(student_id)
    .fetch_optional(db)
    .await?;
    Ok(student)
}
