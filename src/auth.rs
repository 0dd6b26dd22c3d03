use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::{AuthConfig, TokenConfig, UserConfig};
use crate::error::{AppError, AppResult};
use crate::password::PasswordManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Caller identity resolved from the `Authorization` header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Principal {
    /// `None` for anonymous callers
    pub username: Option<String>,
    pub roles: HashSet<Role>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(username: &str, roles: &[String]) -> Self {
        Self {
            username: Some(username.to_string()),
            roles: roles.iter().filter_map(|r| r.parse().ok()).collect(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Succeeds if the caller holds at least one of `roles`
    pub fn require_any(&self, roles: &[Role]) -> AppResult<()> {
        if !self.is_authenticated() {
            return Err(AppError::Unauthorized);
        }
        if roles.iter().any(|role| self.has_role(*role)) {
            Ok(())
        } else {
            tracing::debug!(
                "access denied for {:?}: requires one of {:?}",
                self.username,
                roles
            );
            Err(AppError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Principal>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Resolves bearer tokens and Basic credentials against the configuration
pub struct Authenticator {
    users: Vec<UserConfig>,
    tokens: Vec<TokenConfig>,
    password_manager: Arc<PasswordManager>,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            users: config.users.clone(),
            tokens: config.tokens.clone(),
            password_manager: Arc::new(PasswordManager::new()),
        }
    }

    /// A missing header yields the anonymous principal; invalid credentials fail
    pub async fn authenticate(&self, auth_header: Option<&str>) -> AppResult<Principal> {
        let Some(auth_header) = auth_header else {
            return Ok(Principal::anonymous());
        };

        if let Some(provided_token) = auth_header.strip_prefix("Bearer ") {
            return self
                .tokens
                .iter()
                .find(|t| t.token == provided_token.trim())
                .map(|t| Principal::new(&t.username, &t.roles))
                .ok_or(AppError::Unauthorized);
        }

        if let Some(encoded_credentials) = auth_header.strip_prefix("Basic ") {
            let decoded = general_purpose::STANDARD
                .decode(encoded_credentials.trim())
                .map_err(|_| AppError::Unauthorized)?;
            let credentials = String::from_utf8(decoded).map_err(|_| AppError::Unauthorized)?;
            let (username, password) = credentials
                .split_once(':')
                .ok_or(AppError::Unauthorized)?;

            let user = self
                .users
                .iter()
                .find(|u| u.username == username)
                .ok_or(AppError::Unauthorized)?;

            return if self.verify_password(password, &user.password).await? {
                Ok(Principal::new(&user.username, &user.roles))
            } else {
                tracing::debug!("wrong password for {}", username);
                Err(AppError::Unauthorized)
            };
        }

        Err(AppError::Unauthorized)
    }

    /// Argon2id and bcrypt are CPU bound, so hashes are checked on the blocking pool
    async fn verify_password(&self, password: &str, stored: &str) -> AppResult<bool> {
        let password_manager = Arc::clone(&self.password_manager);
        let password = password.to_string();
        let stored = stored.to_string();
        tokio::task::spawn_blocking(move || password_manager.verify_password(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?
    }
}

/// Stores the resolved `Principal` in the request extensions
pub async fn auth_middleware(
    State(authenticator): State<Arc<Authenticator>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let principal = authenticator.authenticate(auth_header.as_deref()).await?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
