//! Caller identity forwarded by the upstream gateway.

use axum::{
    extract::{FromRequestParts, Query},
    http::{HeaderMap, request::Parts},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user's identifier.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's display name.
pub const USERNAME_HEADER: &str = "x-username";

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Stable user identifier.
    pub id: Uuid,
    /// Display name.
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
struct IdentityQuery {
    user_id: Option<String>,
    username: Option<String>,
}

impl CurrentUser {
    fn parse(id: Option<&str>, username: Option<&str>) -> Result<Self, AppError> {
        let id = id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Unauthorized("missing user identity".into()))?;
        let id = Uuid::parse_str(id)
            .map_err(|_| AppError::Unauthorized("user identity is not a valid UUID".into()))?;
        let username = username
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::Unauthorized("missing username".into()))?;

        Ok(Self {
            id,
            username: username.to_owned(),
        })
    }

    fn from_headers(headers: &HeaderMap) -> Option<Result<Self, AppError>> {
        let id = headers.get(USER_ID_HEADER)?.to_str().ok();
        let username = headers
            .get(USERNAME_HEADER)
            .and_then(|value| value.to_str().ok());
        Some(Self::parse(id, username))
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(result) = Self::from_headers(&parts.headers) {
            return result;
        }

        // Browsers cannot set headers on WebSocket upgrades, so the query string is accepted too.
        let query = Query::<IdentityQuery>::from_request_parts(parts, state)
            .await
            .map(|Query(query)| query)
            .unwrap_or_default();
        Self::parse(query.user_id.as_deref(), query.username.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<CurrentUser, AppError> {
        let (mut parts, _) = request.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn headers_take_precedence() {
        let id = Uuid::new_v4();
        let request = Request::builder()
            .uri(format!("/ws?user_id={}&username=query", Uuid::new_v4()))
            .header(USER_ID_HEADER, id.to_string())
            .header(USERNAME_HEADER, "alice")
            .body(())
            .unwrap();

        let user = extract(request).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn query_parameters_are_accepted() {
        let id = Uuid::new_v4();
        let request = Request::builder()
            .uri(format!("/ws/rooms/x?user_id={id}&username=bob"))
            .body(())
            .unwrap();

        let user = extract(request).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "bob");
    }

    #[tokio::test]
    async fn missing_or_malformed_identity_is_rejected() {
        let missing = Request::builder().uri("/rooms").body(()).unwrap();
        assert!(matches!(
            extract(missing).await,
            Err(AppError::Unauthorized(_))
        ));

        let malformed = Request::builder()
            .uri("/rooms")
            .header(USER_ID_HEADER, "not-a-uuid")
            .header(USERNAME_HEADER, "alice")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(malformed).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
