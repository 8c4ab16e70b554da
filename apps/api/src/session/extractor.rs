use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{resolve_token, SessionToken, TokenState};
use crate::state::AppState;

/// The logged-in student behind an `Authorization: Bearer <token>` header.
/// Any other outcome (no header, malformed or unknown token) rejects with 401.
#[derive(Debug, Clone, Copy)]
pub struct CurrentStudent {
    pub student_id: Uuid,
    pub token: SessionToken,
}

/// Raw bearer value, if the header is present and uses the Bearer scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_token(state.sessions.as_ref(), bearer_token(&parts.headers)).await? {
            TokenState::Active(token, student_id) => Ok(CurrentStudent { student_id, token }),
            _ => Err(AppError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn headers_with(header: Option<&str>) -> HeaderMap {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0.headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&headers_with(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&headers_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&headers_with(Some("Bearer"))), None);
        assert_eq!(bearer_token(&headers_with(None)), None);
    }
}
