//! Application layer: the client state shared by every view.
//!
//! This module sits between the UI host and the api/storage layers. It owns
//! the session, the per-user favorites and the search pipeline, and exposes
//! them through one [`AppContext`] plus an event/action interface.
//!
//! # Architecture
//!
//! ```text
//! UI input → Event → handle_event → AppContext → Vec<Action> → UI
//!                                      │
//!                     ┌────────────────┼─────────────────┐
//!               SessionStore     FavoritesStore    SearchController
//!                     │                │                 │
//!                  AuthApi       KeyValueStore       CatalogApi
//! ```
//!
//! Session and search state are also published through `tokio::sync::watch`
//! channels, so views can re-render on change without polling.
//!
//! # Modules
//!
//! - [`actions`]: commands returned to the UI host
//! - [`context`]: the explicit application context
//! - [`handler`]: event processing
//! - [`listing`]: rating-sorted genre listings with incremental paging
//! - [`search`]: debounced, generation-fenced search-as-you-type
//! - [`session`]: authentication state machine

pub mod actions;
pub mod context;
pub mod handler;
pub mod listing;
pub mod search;
pub mod session;

#[cfg(test)]
mod testing;

pub use actions::Action;
pub use context::{AppContext, FavoriteToggle, HomeFeed};
pub use handler::{handle_event, Event};
pub use listing::{sort_by_rating, GenreListing};
pub use search::{SearchConfig, SearchController, SearchSnapshot};
pub use session::{SessionPhase, SessionState, SessionStore};
