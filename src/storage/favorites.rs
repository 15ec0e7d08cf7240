//! Per-user favorites persisted in the durable key-value store.
//!
//! Each user's favorites live under the key `favorites_<email>` as a JSON
//! array of [`Movie`] records in insertion order. The store keeps no cache of
//! its own: reads always go to the backend and every mutation overwrites the
//! whole record before returning, so whatever a view reads is what is on disk.
//!
//! Keys are built from the raw email string. Two accounts whose emails differ
//! only by letter case therefore get separate records.

use crate::domain::error::Result;
use crate::domain::Movie;
use crate::storage::backend::KeyValueStore;

/// Prefix of every favorites key.
const KEY_PREFIX: &str = "favorites_";

/// Builds the storage key holding `email`'s favorites.
///
/// # Examples
///
/// ```
/// assert_eq!(cinemaguide::storage::favorites_key("anna@example.com"), "favorites_anna@example.com");
/// ```
#[must_use]
pub fn favorites_key(email: &str) -> String {
    format!("{KEY_PREFIX}{email}")
}

/// Favorites collections of every user sharing one storage partition.
///
/// Callers must only pass the email of the currently authenticated user;
/// see [`AppContext`](crate::app::AppContext) for the session check.
#[derive(Debug)]
pub struct FavoritesStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads `email`'s favorites.
    ///
    /// An absent record, a record that is not a JSON array of movies, and a
    /// backend read failure all yield an empty list.
    #[must_use]
    pub fn load(&self, email: &str) -> Vec<Movie> {
        let key = favorites_key(email);

        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to read favorites, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Movie>>(&raw) {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding malformed favorites record");
                Vec::new()
            }
        }
    }

    /// Returns `true` if `movie_id` is among `email`'s favorites.
    #[must_use]
    pub fn contains(&self, email: &str, movie_id: i64) -> bool {
        self.load(email).iter().any(|m| m.id == movie_id)
    }

    /// Adds `movie` to `email`'s favorites, or removes it if a movie with the
    /// same id is already there. Returns the updated list.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated record cannot be written; the durable
    /// record is then unchanged.
    pub fn toggle(&mut self, email: &str, movie: &Movie) -> Result<Vec<Movie>> {
        let _span = tracing::debug_span!("favorites_toggle", email = %email, movie_id = movie.id).entered();

        let mut favorites = self.load(email);
        if let Some(pos) = favorites.iter().position(|m| m.id == movie.id) {
            favorites.remove(pos);
            tracing::debug!("removed from favorites");
        } else {
            favorites.push(movie.clone());
            tracing::debug!("added to favorites");
        }

        self.write(email, &favorites)?;
        Ok(favorites)
    }

    /// Removes `movie_id` from `email`'s favorites. Returns the updated list.
    ///
    /// Removing an id that is not present writes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated record cannot be written.
    pub fn remove(&mut self, email: &str, movie_id: i64) -> Result<Vec<Movie>> {
        let _span = tracing::debug_span!("favorites_remove", email = %email, movie_id = movie_id).entered();

        let mut favorites = self.load(email);
        let before = favorites.len();
        favorites.retain(|m| m.id != movie_id);

        if favorites.len() == before {
            tracing::debug!("movie not in favorites, nothing to remove");
            return Ok(favorites);
        }

        self.write(email, &favorites)?;
        Ok(favorites)
    }

    fn write(&mut self, email: &str, favorites: &[Movie]) -> Result<()> {
        let json = serde_json::to_string(favorites)?;
        self.store.set(&favorites_key(email), &json)?;
        tracing::debug!(count = favorites.len(), "favorites written");
        Ok(())
    }

    /// Gives access to the underlying backend.
    pub fn store(&self) -> &S {
        &self.store
    }
}
