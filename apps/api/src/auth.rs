//! Caller identity. Authentication happens upstream; the identity provider
//! forwards the authenticated user's id in the `x-user-id` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf an operation runs.
/// Passed explicitly into every gateway and pipeline call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
}

impl Caller {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or(AppError::Unauthorized)?;
        Ok(Caller::new(user_id))
    }
}
