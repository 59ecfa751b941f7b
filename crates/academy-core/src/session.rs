//! Session controller.
//!
//! Owns the current session (token + user profile) and is the single
//! serialization point for session mutation. The gateway's unauthorized hook
//! lands here, and every change flows out through the navigation director.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::types::{UserProfile, VerifyOtpResponse};
use crate::api::{ApiError, Gateway};
use crate::auth::{TokenCell, TokenStore, mask_token};
use crate::nav::{Director, NavCommand, Route};
use crate::profile::{ProfileForm, ProfileFormError};

/// Why a session is being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidateReason {
    /// The user asked to log out.
    ExplicitLogout,
    /// The backend rejected the token (401/403).
    AuthFailure,
}

/// Session operation failure.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not logged in")]
    NotAuthenticated,

    #[error("{0}")]
    Invalid(#[from] ProfileFormError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to persist session: {0}")]
    Store(String),
}

/// Owns the session and decides which root screen the app shows.
pub struct SessionController {
    store: TokenStore,
    token: TokenCell,
    user: Mutex<Option<UserProfile>>,
    nav: Director,
}

impl SessionController {
    pub fn new(store: TokenStore) -> Self {
        Self {
            store,
            token: TokenCell::new(),
            user: Mutex::new(None),
            nav: Director::new(),
        }
    }

    /// Shared token handle for wiring up a gateway.
    pub fn token_cell(&self) -> TokenCell {
        self.token.clone()
    }

    /// Subscribes to navigation commands.
    pub fn routes(&self) -> tokio::sync::watch::Receiver<NavCommand> {
        self.nav.subscribe()
    }

    /// The most recently issued navigation command.
    pub fn current_nav(&self) -> NavCommand {
        self.nav.current()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_present()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.user.lock().expect("session lock poisoned").clone()
    }

    fn profile_complete(&self) -> bool {
        self.user().is_some_and(|u| u.profile_complete())
    }

    /// Installs this controller as the gateway's unauthorized hook.
    ///
    /// The hook only touches local state, so it cannot re-enter the gateway.
    pub fn bind(self: &Arc<Self>, gateway: &Gateway) {
        let controller = Arc::clone(self);
        gateway.set_unauthorized_hook(Arc::new(move || {
            controller.invalidate(InvalidateReason::AuthFailure);
        }));
    }

    /// Reads the token store at process start.
    ///
    /// A stored token makes the session provisionally authenticated; it is
    /// validated lazily by the first authenticated call (`refresh_user` or
    /// any screen fetch). Returns whether a token was found.
    ///
    /// # Errors
    /// Returns an error if the store exists but cannot be read.
    pub fn initialize(&self) -> anyhow::Result<bool> {
        let token = self.store.load()?;
        let present = token.is_some();
        if let Some(token) = &token {
            info!(token = %mask_token(token), "restored persisted session");
        }
        self.token.set(token);
        if !present {
            self.nav.reset(Route::Unauthenticated);
        }
        Ok(present)
    }

    /// Fetches `GET /me` to fill in the provisional user, then routes.
    ///
    /// # Errors
    /// `NotAuthenticated` without a token; otherwise the classified API
    /// failure (an `Unauthorized` means the session is already gone).
    pub async fn refresh_user(&self, gateway: &Gateway) -> Result<Route, SessionError> {
        if !self.has_token() {
            return Err(SessionError::NotAuthenticated);
        }

        let user: UserProfile = gateway.get_json("/me", None).await?;
        let route = self.adopt_user(user);
        Ok(route)
    }

    /// Folds a successful OTP verification into the session.
    ///
    /// Persists the token, stores the user and routes by profile
    /// completeness.
    ///
    /// # Errors
    /// `Store` if the token cannot be persisted; the in-memory session is
    /// left untouched in that case.
    pub fn complete_login(&self, verified: VerifyOtpResponse) -> Result<Route, SessionError> {
        self.store
            .save(&verified.token)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        self.token.set(Some(verified.token));

        info!(user = %verified.user.phone, "login complete");
        Ok(self.adopt_user(verified.user))
    }

    /// Submits the profile-completion form.
    ///
    /// On success the user's name/email are set (flipping completeness) and
    /// the app routes to the authenticated area. On failure the session is
    /// unchanged.
    ///
    /// # Errors
    /// Validation failures never reach the gateway; API failures are
    /// returned classified.
    pub async fn complete_profile(
        &self,
        gateway: &Gateway,
        form: &ProfileForm,
    ) -> Result<Route, SessionError> {
        if !self.has_token() {
            return Err(SessionError::NotAuthenticated);
        }
        form.validate()?;

        let _: serde_json::Value = gateway
            .post_json("/complete-profile", form, Some(Duration::from_secs(15)))
            .await?;

        let mut user = self.user.lock().expect("session lock poisoned");
        if let Some(user) = user.as_mut() {
            user.name = Some(form.name.clone());
            user.email = Some(form.email.clone());
        }
        drop(user);

        let route = crate::nav::resolve(true, true);
        self.nav.replace(route);
        Ok(route)
    }

    /// Tears the session down: clear store, clear memory, reset navigation.
    ///
    /// Idempotent; invoking it while already unauthenticated is a no-op.
    /// Performs no network calls, so the gateway hook cannot recurse.
    pub fn invalidate(&self, reason: InvalidateReason) {
        let had_session = self.has_token() || self.user().is_some();
        if !had_session {
            return;
        }

        if let Err(e) = self.store.clear() {
            // Memory is still cleared; a stale file only yields another 401.
            warn!(error = %e, "failed to clear token store");
        }
        self.token.set(None);
        *self.user.lock().expect("session lock poisoned") = None;

        info!(?reason, "session invalidated");
        self.nav.reset(Route::Unauthenticated);
    }

    /// Explicit logout: best-effort server notification, then local teardown.
    ///
    /// The `POST /logout` outcome is ignored; the local session is cleared
    /// either way. Returns whether a session existed to log out of.
    pub async fn logout(&self, gateway: &Gateway) -> bool {
        let had_session = self.has_token();
        if had_session {
            let result: Result<serde_json::Value, ApiError> =
                gateway.post_json("/logout", &serde_json::json!({}), None).await;
            if let Err(e) = result {
                warn!(error = %e, "server logout failed, clearing local session anyway");
            }
        }
        self.invalidate(InvalidateReason::ExplicitLogout);
        had_session
    }

    fn adopt_user(&self, user: UserProfile) -> Route {
        let route = crate::nav::resolve(true, user.profile_complete());
        *self.user.lock().expect("session lock poisoned") = Some(user);
        self.nav.replace(route);
        route
    }
}
