//! API handlers for Biblos REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::{error::AppError, AppState};

/// Access roles granted to the built-in principals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Read,
    Write,
}

/// The authenticated caller and the roles their account carries
#[derive(Debug, Clone)]
pub struct Principal {
    pub username: String,
    roles: Vec<Role>,
}

impl Principal {
    fn new(username: &str, roles: Vec<Role>) -> Self {
        Self {
            username: username.to_string(),
            roles,
        }
    }

    /// Principal used when authorization is disabled by configuration
    fn unrestricted() -> Self {
        Self::new("anonymous", vec![Role::Read, Role::Write])
    }

    pub fn require_read(&self) -> Result<(), AppError> {
        // Write access implies read access
        if self.roles.contains(&Role::Read) || self.roles.contains(&Role::Write) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "User {} may not read the catalog",
                self.username
            )))
        }
    }

    pub fn require_write(&self) -> Result<(), AppError> {
        if self.roles.contains(&Role::Write) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "User {} may not modify the catalog",
                self.username
            )))
        }
    }
}

/// Extractor for the authenticated user from HTTP basic credentials.
///
/// Two accounts exist, configured out-of-band: `user` (read) and `admin`
/// (read + write). With `auth.disabled = true` every request passes with an
/// unrestricted principal.
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.auth.disabled {
            return Ok(AuthenticatedUser(Principal::unrestricted()));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // The scheme token is case-insensitive (RFC 7617)
        let encoded = auth_header
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Basic"))
            .map(|(_, encoded)| encoded)
            .ok_or_else(|| {
                AppError::Authentication("Invalid authorization header format".to_string())
            })?;

        let decoded = BASE64
            .decode(encoded)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| AppError::Authentication("Invalid basic credentials".to_string()))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| AppError::Authentication("Invalid basic credentials".to_string()))?;

        let auth = &state.config.auth;
        let principal = match username {
            "user" if password == auth.user_password => Principal::new("user", vec![Role::Read]),
            "admin" if password == auth.admin_password => {
                Principal::new("admin", vec![Role::Read, Role::Write])
            }
            _ => {
                return Err(AppError::Authentication(
                    "Unknown user or wrong password".to_string(),
                ))
            }
        };

        Ok(AuthenticatedUser(principal))
    }
}
