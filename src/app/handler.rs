//! Event handling.
//!
//! The UI host turns user input into [`Event`]s and feeds them to
//! [`handle_event`], which drives the context and answers with the
//! [`Action`]s the host should carry out:
//!
//! ```text
//! UI input → Event → handle_event → AppContext (search / favorites / session) → Vec<Action> → UI
//! ```
//!
//! Search results do not come back as actions; they arrive asynchronously
//! through [`SearchController::subscribe`](crate::app::SearchController::subscribe).
//!
//! Authentication failures are answered with [`Action::ShowAuthError`]
//! rather than an error. `Err` is reserved for failures the host cannot
//! recover from by itself, such as favorites that could not be written.

use crate::app::context::{AppContext, FavoriteToggle};
use crate::app::Action;
use crate::domain::error::Result;
use crate::domain::{Credentials, Movie, Registration};
use tracing::Instrument;

/// Things the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The search box text changed.
    QueryChanged(String),
    /// The search box regained focus.
    SearchFocused,
    /// The search box lost focus.
    SearchBlurred,
    /// A movie was picked from the search dropdown.
    SearchResultChosen {
        movie_id: i64,
    },
    /// The favorite button of a movie was pressed.
    ToggleFavorite(Movie),
    /// A movie was removed from the account page's favorites list.
    RemoveFavorite {
        movie_id: i64,
    },
    Login(Credentials),
    Register(Registration),
    /// The "sign in" button after a completed registration.
    AcknowledgeRegistration,
    Logout,
}

impl Event {
    /// Variant name, safe to log. The payloads of some events carry passwords.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::QueryChanged(_) => "query_changed",
            Self::SearchFocused => "search_focused",
            Self::SearchBlurred => "search_blurred",
            Self::SearchResultChosen { .. } => "search_result_chosen",
            Self::ToggleFavorite(_) => "toggle_favorite",
            Self::RemoveFavorite { .. } => "remove_favorite",
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::AcknowledgeRegistration => "acknowledge_registration",
            Self::Logout => "logout",
        }
    }
}

fn favorites_action(outcome: FavoriteToggle) -> Action {
    match outcome {
        FavoriteToggle::Updated(favorites) => Action::FavoritesChanged(favorites),
        FavoriteToggle::AuthenticationRequired => Action::PromptAuthentication,
    }
}

/// Processes `event` against `ctx` and returns the actions for the host.
///
/// # Errors
///
/// Returns an error if a favorites mutation cannot be persisted.
///
/// # Example
///
/// ```no_run
/// use cinemaguide::app::{handle_event, Event};
///
/// # async fn run(ctx: &cinemaguide::app::AppContext) -> cinemaguide::Result<()> {
/// let actions = handle_event(ctx, Event::QueryChanged("batman".into())).await?;
/// assert!(actions.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn handle_event(ctx: &AppContext, event: Event) -> Result<Vec<Action>> {
    let span = tracing::debug_span!("handle_event", event_type = event.name());

    async move {
        match event {
            Event::QueryChanged(text) => {
                ctx.search().update(text);
                Ok(vec![])
            }
            Event::SearchFocused => {
                ctx.search().reveal();
                Ok(vec![])
            }
            Event::SearchBlurred => {
                ctx.search().dismiss();
                Ok(vec![])
            }
            Event::SearchResultChosen { movie_id } => {
                ctx.search().clear();
                Ok(vec![Action::OpenMovie { id: movie_id }])
            }
            Event::ToggleFavorite(movie) => {
                let outcome = ctx.toggle_favorite(&movie)?;
                Ok(vec![favorites_action(outcome)])
            }
            Event::RemoveFavorite { movie_id } => {
                let outcome = ctx.remove_favorite(movie_id)?;
                Ok(vec![favorites_action(outcome)])
            }
            Event::Login(credentials) => match ctx.session().login(&credentials).await {
                Ok(user) => {
                    tracing::info!(email = %user.email, "signed in");
                    Ok(vec![
                        Action::SessionChanged(Some(user)),
                        Action::CloseAuthPrompt,
                        Action::FavoritesChanged(ctx.favorites()),
                    ])
                }
                Err(e) if e.is_auth() => Ok(vec![Action::ShowAuthError {
                    message: e.to_string(),
                }]),
                Err(e) => Err(e),
            },
            Event::Register(registration) => match ctx.session().register(&registration).await {
                Ok(()) => Ok(vec![Action::RegistrationComplete]),
                Err(e) if e.is_auth() => Ok(vec![Action::ShowAuthError {
                    message: e.to_string(),
                }]),
                Err(e) => Err(e),
            },
            Event::AcknowledgeRegistration => {
                ctx.session().acknowledge_registration();
                Ok(vec![])
            }
            Event::Logout => {
                ctx.teardown().await;
                tracing::info!("signed out");
                Ok(vec![
                    Action::SessionChanged(None),
                    Action::FavoritesChanged(Vec::new()),
                ])
            }
        }
    }
    .instrument(span)
    .await
}
