//! Session state and account operations.
//!
//! [`SessionContext`] owns the token and current user identity, persisted
//! so a restart resumes the same session. Mutation happens at defined
//! points only: registration, login, profile update, logout, and the 401
//! reset in the HTTP layer.

use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User};
use crate::notify::Notifier;
use crate::storage::{self, Storage};

/// Persisted key for the raw token
pub const TOKEN_KEY: &str = "token";
/// Persisted key for the user record
pub const USER_KEY: &str = "user";

/// Authentication state. Token and user are present together or not at
/// all; an absent token means unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Shared session holder read by the HTTP layer and the route guard.
pub struct SessionContext {
    storage: Arc<dyn Storage>,
    inner: RwLock<Session>,
}

impl SessionContext {
    /// Restore the persisted session, if both halves are present.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let token = storage.get(TOKEN_KEY);
        let user: Option<User> = storage::load_json(storage.as_ref(), USER_KEY);

        // Half a session is no session.
        let session = match (token, user) {
            (Some(token), Some(user)) => {
                debug!(user_id = user.id, "Restored persisted session");
                Session {
                    token: Some(token),
                    user: Some(user),
                }
            }
            _ => Session::default(),
        };

        Self {
            storage,
            inner: RwLock::new(session),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated()
    }

    /// Install a fresh token and user, persisting both.
    pub fn establish(&self, token: String, user: User) {
        self.storage.set(TOKEN_KEY, &token);
        storage::store_json(self.storage.as_ref(), USER_KEY, &user);
        *self.inner.write() = Session {
            token: Some(token),
            user: Some(user),
        };
    }

    /// Drop token and user together, removing the persisted copies.
    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        *self.inner.write() = Session::default();
    }
}

/// Session operation failures that callers are expected to react to.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("profile update failed: {0}")]
    ProfileUpdateFailed(String),
}

/// Account operations: register, login, profile update, logout.
pub struct SessionStore {
    api: Arc<ApiClient>,
    session: Arc<SessionContext>,
    notifier: Arc<dyn Notifier>,
}

impl SessionStore {
    pub fn new(
        api: Arc<ApiClient>,
        session: Arc<SessionContext>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
        }
    }

    /// Register a new account and start a session.
    ///
    /// Error policy: swallow. Failures are reported to the notifier and
    /// `None` is returned, session state untouched.
    pub async fn register(&self, payload: &RegisterRequest) -> Option<User> {
        let result = self
            .api
            .post::<AuthResponse, _>("auth/register", payload)
            .await
            .and_then(|env| env.into_data("An error occurred during registration"));

        match result {
            Ok(auth) => {
                info!(user_id = auth.user.id, "Registered");
                let user = auth.user;
                self.session.establish(auth.token, user.clone());
                Some(user)
            }
            Err(e) => {
                self.notifier.error(&e.message());
                None
            }
        }
    }

    /// Log in with email/phone and password.
    ///
    /// Error policy: rethrow. Every failure notifies and surfaces as
    /// [`SessionError::InvalidCredentials`] so a login form stays put.
    pub async fn login(&self, payload: &LoginRequest) -> Result<(), SessionError> {
        let result = self
            .api
            .post::<AuthResponse, _>("auth/login", payload)
            .await
            .and_then(|env| env.into_data("Invalid credentials"));

        match result {
            Ok(auth) => {
                info!(user_id = auth.user.id, "Logged in");
                self.session.establish(auth.token, auth.user);
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Login failed");
                self.notifier.error("Invalid credentials");
                Err(SessionError::InvalidCredentials)
            }
        }
    }

    /// Update the current user's profile.
    ///
    /// On success the server reissues the token with fresh claims; token and
    /// user are replaced wholesale. Error policy: rethrow. A `success:false`
    /// response notifies with the server message (typically an email/phone
    /// conflict); transport failures propagate without a local notification.
    pub async fn update_profile(&self, payload: &UpdateProfileRequest) -> Result<(), SessionError> {
        let user_id = self
            .session
            .user()
            .map(|u| u.id)
            .ok_or_else(|| SessionError::ProfileUpdateFailed("Not logged in".to_string()))?;

        let envelope = self
            .api
            .put::<AuthResponse, _>(&format!("users/{}", user_id), payload)
            .await
            .map_err(|e| SessionError::ProfileUpdateFailed(e.message()))?;

        if !envelope.success {
            let message = envelope
                .error
                .map(|info| info.message)
                .unwrap_or_else(|| "This email or phone number is already in use".to_string());
            self.notifier.error(&message);
            return Err(SessionError::ProfileUpdateFailed(message));
        }

        let auth = envelope
            .data
            .ok_or_else(|| SessionError::ProfileUpdateFailed("Profile update failed".to_string()))?;
        self.session.establish(auth.token, auth.user);
        self.notifier.success("Profile updated successfully");
        Ok(())
    }

    /// End the session, dropping the persisted copies.
    pub fn logout(&self) {
        info!("Logged out");
        self.session.clear();
    }
}
