//! Authentication Service
//!
//! Registration, login, and bearer token resolution over a [`UserStore`].

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{NewUser, User};
use crate::error::{AppError, AppResult};
use crate::store::UserStore;

use super::{hash_password, verify_password, AccessToken, TokenError, TokenIssuer};

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.username.trim().is_empty() {
            return Err(AppError::InvalidRequest("username must not be empty".to_string()));
        }
        if !self.email.contains('@') {
            return Err(AppError::InvalidRequest("email is not valid".to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::InvalidRequest("password must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Credentials handling for the HTTP layer
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    /// Create a user and its zero-balance account
    pub async fn register(&self, command: RegisterCommand) -> AppResult<User> {
        command.validate()?;

        let new_user = NewUser {
            username: command.username,
            email: command.email,
            password_hash: hash_password(&command.password)?,
        };

        let user = self.users.register(&new_user).await.map_err(|e| {
            if e.is_conflict() {
                AppError::UserExists
            } else {
                AppError::Store(e)
            }
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Exchange username and password for an access token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AccessToken> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or_else(|| {
                tracing::debug!(username, "Login rejected");
                AppError::InvalidCredentials
            })?;

        let token = self.tokens.issue(&user.username)?;

        tracing::info!(user_id = user.id, "Access token issued");

        Ok(token)
    }

    /// Resolve a bearer token to the user it names
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.tokens.verify(token).map_err(|e| {
            match &e {
                TokenError::Expired => tracing::debug!("Expired bearer token"),
                _ => tracing::debug!("Rejected bearer token: {}", e),
            }
            AppError::Unauthenticated
        })?;

        self.users
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AppError::Unauthenticated)
    }
}
