//! Commands for the UI host.
//!
//! [`handle_event`](crate::app::handle_event) returns a `Vec<Action>` after
//! each event. Actions describe what the host should show or do next; they
//! carry the data needed to do it so the host does not have to query the
//! context again.
//!
//! # Example
//!
//! ```
//! use cinemaguide::app::Action;
//!
//! let actions = vec![Action::CloseAuthPrompt, Action::FavoritesChanged(Vec::new())];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::domain::{Movie, User};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Open the login form; the user tried something that needs a session.
    PromptAuthentication,

    /// Show a login or registration failure in the auth form.
    ShowAuthError {
        /// Exactly the text to display.
        message: String,
    },

    /// Close the auth form after a successful login.
    CloseAuthPrompt,

    /// Switch the auth form to its "registration complete" state.
    RegistrationComplete,

    /// The signed-in user's favorites changed; every view showing them should
    /// re-render from this list.
    FavoritesChanged(Vec<Movie>),

    /// The signed-in user changed. `None` after logout.
    SessionChanged(Option<User>),

    /// Navigate to a movie page.
    OpenMovie {
        id: i64,
    },
}
