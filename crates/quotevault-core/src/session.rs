//! Session and profile manager.
//!
//! Tracks the auth state machine (`Unknown → Checking → Authenticated |
//! Unauthenticated`) and the signed-in user's profile, publishing both on
//! watch channels so dependent view-models can react to profile arrivals.

use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::{AuthBackend, AuthSession, AuthUser, SignUpOutcome};
use crate::gateway::{BearerToken, QuoteBackend};
use crate::models::{Appearance, ProfileUpdate, UserId, UserProfile};
use crate::observable::Published;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unknown,
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Published session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub user: Option<AuthUser>,
    pub is_loading: bool,
    /// Last user-facing auth error
    pub error: Option<String>,
}

impl SessionSnapshot {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.status, SessionStatus::Authenticated)
    }
}

/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    auth: Arc<dyn AuthBackend>,
    backend: Arc<dyn QuoteBackend>,
    token: BearerToken,
    state: Published<SessionSnapshot>,
    profile: Published<Option<UserProfile>>,
}

impl SessionManager {
    /// `token` must be the same handle the gateway reads from.
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        backend: Arc<dyn QuoteBackend>,
        token: BearerToken,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                auth,
                backend,
                token,
                state: Published::default(),
                profile: Published::default(),
            }),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.inner.profile.get()
    }

    /// Fires whenever a profile arrives or is cleared
    pub fn subscribe_profile(&self) -> watch::Receiver<Option<UserProfile>> {
        self.inner.profile.subscribe()
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.inner
            .state
            .with(|state| state.user.as_ref().map(|user| user.id))
    }

    pub fn appearance(&self) -> Appearance {
        self.inner
            .profile
            .with(|profile| profile.as_ref().map(Appearance::from).unwrap_or_default())
    }

    /// Appearance that follows profile arrivals.
    ///
    /// The forwarding task ends once every receiver is dropped.
    pub fn watch_appearance(&self) -> watch::Receiver<Appearance> {
        let (sender, receiver) = watch::channel(self.appearance());
        let mut profiles = self.subscribe_profile();
        tokio::spawn(async move {
            while profiles.changed().await.is_ok() {
                let appearance = profiles
                    .borrow_and_update()
                    .as_ref()
                    .map(Appearance::from)
                    .unwrap_or_default();
                if sender.send(appearance).is_err() {
                    break;
                }
            }
        });
        receiver
    }

    /// Restore a persisted session at startup.
    pub async fn check_session(&self) {
        self.inner.state.update(|state| {
            state.status = SessionStatus::Checking;
        });

        match self.inner.auth.restore_session().await {
            Ok(Some(session)) => self.apply_session(session).await,
            Ok(None) => self.mark_signed_out(),
            Err(error) => {
                tracing::warn!("Failed to restore session: {}", error);
                self.mark_signed_out();
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        self.begin_auth_call();
        match self.inner.auth.sign_in(email, password).await {
            Ok(session) => {
                self.apply_session(session).await;
                Ok(())
            }
            Err(error) => Err(self.fail_auth_call(error.into())),
        }
    }

    /// Create an account; signs in immediately unless email confirmation is required.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome> {
        self.begin_auth_call();
        match self
            .inner
            .auth
            .sign_up(email, password, display_name)
            .await
        {
            Ok(SignUpOutcome::SignedIn(session)) => {
                self.apply_session(session.clone()).await;
                Ok(SignUpOutcome::SignedIn(session))
            }
            Ok(SignUpOutcome::ConfirmationRequired) => {
                tracing::info!("Sign-up requires email confirmation");
                self.mark_signed_out();
                Ok(SignUpOutcome::ConfirmationRequired)
            }
            Err(error) => Err(self.fail_auth_call(error.into())),
        }
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.begin_auth_call();
        if let Some(access_token) = self.inner.token.get() {
            if let Err(error) = self.inner.auth.sign_out(&access_token).await {
                return Err(self.fail_auth_call(error.into()));
            }
        }
        self.mark_signed_out();
        Ok(())
    }

    pub async fn reset_password(&self, email: &str) -> Result<()> {
        self.begin_auth_call();
        match self.inner.auth.reset_password(email).await {
            Ok(()) => {
                self.inner.state.update(|state| state.is_loading = false);
                Ok(())
            }
            Err(error) => Err(self.fail_auth_call(error.into())),
        }
    }

    /// Send a partial profile update, then re-fetch the profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let user = self.current_user_id().ok_or(Error::Unauthorized)?;
        self.inner.backend.update_profile(user, update).await?;
        self.refresh_profile().await;
        Ok(())
    }

    /// Re-fetch the current profile; failures are logged only.
    pub async fn refresh_profile(&self) {
        let Some(user) = self.current_user_id() else {
            return;
        };
        match self.inner.backend.get_profile(user).await {
            Ok(profile) => self.inner.profile.update(|current| *current = Some(profile)),
            Err(error) => tracing::warn!("Failed to fetch profile for {}: {}", user, error),
        }
    }

    fn begin_auth_call(&self) {
        self.inner.state.update(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    fn fail_auth_call(&self, error: Error) -> Error {
        let message = error.to_string();
        tracing::warn!("Auth call failed: {}", message);
        self.inner.state.update(|state| {
            state.is_loading = false;
            state.error = Some(message);
        });
        error
    }

    async fn apply_session(&self, session: AuthSession) {
        self.inner.token.set(session.access_token);
        self.inner.state.update(|state| {
            state.status = SessionStatus::Authenticated;
            state.user = Some(session.user);
            state.is_loading = false;
        });
        self.refresh_profile().await;
    }

    fn mark_signed_out(&self) {
        self.inner.token.clear();
        self.inner.state.update(|state| {
            state.status = SessionStatus::Unauthenticated;
            state.user = None;
            state.is_loading = false;
        });
        self.inner.profile.update_if(|profile| profile.take().is_some());
    }
}
