//! Authentication state.
//!
//! [`SessionStore`] owns the current [`User`] and drives it through
//!
//! ```text
//! Anonymous ──login──▶ Authenticating ──ok──▶ Authenticated ──logout──▶ LoggingOut ──▶ Anonymous
//!                            │
//!                            └──err──▶ Anonymous (error set) / previous user kept
//! ```
//!
//! State is published through a `tokio::sync::watch` channel so any number of
//! views can observe it. Only explicit login and registration failures are
//! returned to the caller; the profile lookup and logout fail soft.

use crate::api::AuthApi;
use crate::domain::error::{CinemaError, Result};
use crate::domain::{Credentials, Registration, User};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

/// Message shown when the service rejects a login without saying why.
pub const GENERIC_AUTH_ERROR: &str = "Ошибка авторизации";

/// Message shown when the registration password confirmation differs.
pub const PASSWORD_MISMATCH: &str = "Пароли не совпадают";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    LoggingOut,
}

/// Snapshot of the session published to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    /// Message of the last failed login or registration.
    pub error: Option<String>,
    /// Set after a successful registration until acknowledged.
    pub registration_complete: bool,
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn settle_after_failure(&mut self, message: String) {
        self.phase = if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        };
        self.error = Some(message);
    }
}

/// Owner of the authenticated user.
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { api, state }
    }

    /// A copy of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user.is_some()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Asks the service who owns the current session.
    ///
    /// Any failure, "not logged in" included, leaves the session anonymous.
    pub async fn load_session(&self) -> Option<User> {
        async {
            match self.api.profile().await {
                Ok(user) => {
                    tracing::debug!(email = %user.email, "session restored");
                    self.state.send_modify(|s| {
                        s.phase = SessionPhase::Authenticated;
                        s.user = Some(user.clone());
                        s.authenticated_at = Some(Utc::now());
                    });
                    Some(user)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "profile lookup failed, session is anonymous");
                    self.state.send_modify(|s| {
                        s.phase = SessionPhase::Anonymous;
                        s.user = None;
                        s.authenticated_at = None;
                    });
                    None
                }
            }
        }
        .instrument(tracing::debug_span!("load_session"))
        .await
    }

    /// Logs in and loads the resulting profile.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::Auth`] with the service's message, or
    /// [`GENERIC_AUTH_ERROR`] when it gave none. A rejected login, or an
    /// accepted one whose profile cannot be loaded, keeps any user that was
    /// already signed in.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let span = tracing::debug_span!("login", email = %credentials.email);
        async {
            let (previous_user, previous_at) = {
                let current = self.state.borrow();
                (current.user.clone(), current.authenticated_at)
            };
            self.state.send_modify(|s| {
                s.phase = SessionPhase::Authenticating;
                s.error = None;
            });

            let outcome = match self.api.login(credentials).await {
                Ok(()) => match self.load_session().await {
                    Some(user) => Ok(user),
                    None => {
                        tracing::debug!("login accepted but no profile, keeping previous user");
                        self.state.send_modify(|s| {
                            s.user = previous_user;
                            s.authenticated_at = previous_at;
                        });
                        Err(CinemaError::Auth(GENERIC_AUTH_ERROR.to_string()))
                    }
                },
                Err(e) => {
                    tracing::debug!(error = %e, "login rejected");
                    Err(auth_error(&e))
                }
            };

            if let Err(e) = &outcome {
                let message = e.to_string();
                self.state.send_modify(|s| s.settle_after_failure(message));
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Creates an account without signing in.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::Auth`] with [`PASSWORD_MISMATCH`] before any
    /// request when the confirmation differs, or with the service's message
    /// when it rejects the registration.
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        let span = tracing::debug_span!("register", email = %registration.email);
        async {
            if !registration.passwords_match() {
                self.state
                    .send_modify(|s| s.error = Some(PASSWORD_MISMATCH.to_string()));
                return Err(CinemaError::Auth(PASSWORD_MISMATCH.to_string()));
            }

            self.state.send_modify(|s| s.error = None);
            match self.api.register(registration).await {
                Ok(()) => {
                    tracing::info!("registration complete");
                    self.state.send_modify(|s| s.registration_complete = true);
                    Ok(())
                }
                Err(e) => {
                    tracing::debug!(error = %e, "registration rejected");
                    let err = auth_error(&e);
                    let message = err.to_string();
                    self.state.send_modify(|s| s.error = Some(message));
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Leaves the "registration complete" state.
    pub fn acknowledge_registration(&self) {
        self.state.send_if_modified(|s| {
            let was_set = s.registration_complete;
            s.registration_complete = false;
            was_set
        });
    }

    /// Ends the session.
    ///
    /// The user is cleared once the remote call has resolved, whatever its
    /// outcome.
    pub async fn logout(&self) {
        async {
            self.state.send_modify(|s| s.phase = SessionPhase::LoggingOut);

            if let Err(e) = self.api.logout().await {
                tracing::warn!(error = %e, "remote logout failed, clearing local session anyway");
            }

            self.state.send_replace(SessionState::default());
            tracing::debug!("session cleared");
        }
        .instrument(tracing::debug_span!("logout"))
        .await;
    }
}

fn auth_error(err: &CinemaError) -> CinemaError {
    CinemaError::Auth(
        err.remote_message()
            .map_or_else(|| GENERIC_AUTH_ERROR.to_string(), str::to_string),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-process stand-in for the auth endpoints.
    #[derive(Default)]
    struct FakeAuth {
        session: Mutex<Option<User>>,
        profile_broken: AtomicBool,
        logout_fails: bool,
        register_calls: AtomicUsize,
    }

    fn anna() -> User {
        User::new("anna@example.com", "Anna", "Petrova")
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, credentials: &Credentials) -> Result<()> {
            match credentials.password.as_str() {
                "correct" => {
                    *self.session.lock().unwrap() = Some(User::new(
                        credentials.email.clone(),
                        "Anna",
                        "Petrova",
                    ));
                    Ok(())
                }
                "crash" => Err(CinemaError::Api {
                    status: 500,
                    message: None,
                }),
                _ => Err(CinemaError::Api {
                    status: 400,
                    message: Some("Неверный пароль".to_string()),
                }),
            }
        }

        async fn register(&self, registration: &Registration) -> Result<()> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            if registration.email == "taken@example.com" {
                return Err(CinemaError::Api {
                    status: 409,
                    message: Some("Пользователь уже существует".to_string()),
                });
            }
            Ok(())
        }

        async fn logout(&self) -> Result<()> {
            *self.session.lock().unwrap() = None;
            if self.logout_fails {
                return Err(CinemaError::Api {
                    status: 503,
                    message: None,
                });
            }
            Ok(())
        }

        async fn profile(&self) -> Result<User> {
            if self.profile_broken.load(Ordering::SeqCst) {
                return Err(CinemaError::Api {
                    status: 500,
                    message: None,
                });
            }
            self.session.lock().unwrap().clone().ok_or(CinemaError::Api {
                status: 401,
                message: None,
            })
        }
    }

    fn store(fake: FakeAuth) -> (SessionStore, Arc<FakeAuth>) {
        let fake = Arc::new(fake);
        (SessionStore::new(fake.clone()), fake)
    }

    fn registration(email: &str, repeat: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: "pw".to_string(),
            repeat_password: repeat.to_string(),
            name: "Anna".to_string(),
            surname: "Petrova".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_profile_leaves_session_anonymous() {
        let (session, _) = store(FakeAuth::default());

        assert_eq!(session.load_session().await, None);
        let state = session.state();
        assert_eq!(state.phase, SessionPhase::Anonymous);
        assert!(state.user.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn profile_restores_existing_session() {
        let (session, fake) = store(FakeAuth::default());
        *fake.session.lock().unwrap() = Some(anna());

        assert_eq!(session.load_session().await, Some(anna()));
        assert!(session.is_authenticated());
        assert!(session.state().authenticated_at.is_some());
    }

    #[tokio::test]
    async fn wrong_password_shows_exact_remote_message() {
        let (session, _) = store(FakeAuth::default());

        let err = session
            .login(&Credentials::new("anna@example.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Неверный пароль");

        let state = session.state();
        assert_eq!(state.phase, SessionPhase::Anonymous);
        assert_eq!(state.user, None);
        assert_eq!(state.error.as_deref(), Some("Неверный пароль"));
    }

    #[tokio::test]
    async fn login_without_remote_message_uses_generic_text() {
        let (session, _) = store(FakeAuth::default());

        let err = session
            .login(&Credentials::new("anna@example.com", "crash"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), GENERIC_AUTH_ERROR);
    }

    #[tokio::test]
    async fn login_then_missing_profile_fails() {
        let (session, _) = store(FakeAuth {
            profile_broken: AtomicBool::new(true),
            ..FakeAuth::default()
        });

        let err = session
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap_err();
        assert!(err.is_auth());
        assert_eq!(err.to_string(), GENERIC_AUTH_ERROR);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn successful_login_publishes_user() {
        let (session, _) = store(FakeAuth::default());
        let mut rx = session.subscribe();

        let user = session
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();
        assert_eq!(user.email, "anna@example.com");

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.phase, SessionPhase::Authenticated);
        assert_eq!(state.user, Some(user));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn failed_login_keeps_existing_user() {
        let (session, _) = store(FakeAuth::default());
        session
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();

        session
            .login(&Credentials::new("boris@example.com", "wrong"))
            .await
            .unwrap_err();

        let state = session.state();
        assert_eq!(state.phase, SessionPhase::Authenticated);
        assert_eq!(state.user.map(|u| u.email).as_deref(), Some("anna@example.com"));
    }

    #[tokio::test]
    async fn accepted_login_without_profile_keeps_existing_user() {
        let (session, fake) = store(FakeAuth::default());
        session
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();
        let signed_in_at = session.state().authenticated_at;

        fake.profile_broken.store(true, Ordering::SeqCst);
        let err = session
            .login(&Credentials::new("boris@example.com", "correct"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), GENERIC_AUTH_ERROR);

        let state = session.state();
        assert_eq!(state.phase, SessionPhase::Authenticated);
        assert_eq!(state.user.map(|u| u.email).as_deref(), Some("anna@example.com"));
        assert_eq!(state.authenticated_at, signed_in_at);
        assert_eq!(state.error.as_deref(), Some(GENERIC_AUTH_ERROR));
    }

    #[tokio::test]
    async fn register_checks_confirmation_locally() {
        let (session, fake) = store(FakeAuth::default());

        let err = session
            .register(&registration("new@example.com", "other"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), PASSWORD_MISMATCH);
        assert_eq!(fake.register_calls.load(Ordering::SeqCst), 0);
        assert!(!session.state().registration_complete);
    }

    #[tokio::test]
    async fn register_completes_without_login() {
        let (session, fake) = store(FakeAuth::default());

        session
            .register(&registration("new@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(fake.register_calls.load(Ordering::SeqCst), 1);

        let state = session.state();
        assert!(state.registration_complete);
        assert!(state.user.is_none());

        session.acknowledge_registration();
        assert!(!session.state().registration_complete);
    }

    #[tokio::test]
    async fn rejected_registration_surfaces_message() {
        let (session, _) = store(FakeAuth::default());

        let err = session
            .register(&registration("taken@example.com", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Пользователь уже существует");
        assert!(!session.state().registration_complete);
    }

    #[tokio::test]
    async fn logout_clears_user_even_if_remote_fails() {
        let (session, _) = store(FakeAuth {
            logout_fails: true,
            ..FakeAuth::default()
        });
        session
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();

        session.logout().await;
        assert_eq!(session.state(), SessionState::default());
    }
}
