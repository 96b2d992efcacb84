//! Caller identity.
//!
//! Token verification happens upstream; the resolved `(user id, role)` pair reaches
//! this service in the `x-user-id` and `x-user-role` headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::{forbidden, BooklyError};
use crate::models::Role;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Fails with `Forbidden` unless the caller has `role`.
    pub fn require_role(&self, role: Role) -> Result<(), BooklyError> {
        if self.role == role {
            Ok(())
        } else {
            Err(forbidden(format!("{} role required", role)))
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = BooklyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let user_id = header(USER_ID_HEADER)
            .ok_or_else(|| BooklyError::Unauthorized("missing caller identity".to_string()))?;
        let role = header(USER_ROLE_HEADER)
            .ok_or_else(|| BooklyError::Unauthorized("missing caller role".to_string()))?
            .parse::<Role>()
            .map_err(|_| BooklyError::Unauthorized("unknown caller role".to_string()))?;

        Ok(Identity { user_id, role })
    }
}
