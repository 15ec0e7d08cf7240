//! Remote service abstraction.
//!
//! The catalog and the authentication endpoints are reached through two
//! async traits. [`RemoteCatalogClient`](crate::api::RemoteCatalogClient)
//! implements both over HTTP; the search controller and session store only
//! depend on the traits, which keeps them testable with in-process fakes.

use crate::domain::error::Result;
use crate::domain::{Credentials, Movie, Registration, User};
use async_trait::async_trait;

/// Read-only access to the movie catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// The service's top ten, in the service's order.
    async fn top_movies(&self) -> Result<Vec<Movie>>;

    /// A new random pick on every call.
    async fn random_movie(&self) -> Result<Movie>;

    /// All genre names.
    async fn genres(&self) -> Result<Vec<String>>;

    /// One page of a genre. Results are not sorted by the service.
    async fn movies_by_genre(&self, genre: &str, page: u32, limit: u32) -> Result<Vec<Movie>>;

    /// A single movie.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::NotFound`](crate::CinemaError::NotFound) when the id is unknown.
    async fn movie_by_id(&self, id: i64) -> Result<Movie>;

    /// Movies whose title matches a partial title. Backs search-as-you-type.
    async fn search_by_title(&self, title: &str) -> Result<Vec<Movie>>;

    /// Full-text search over the catalog.
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>>;
}

/// Session-cookie authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Starts a server session for `credentials`.
    async fn login(&self, credentials: &Credentials) -> Result<()>;

    /// Creates an account. Does not log in.
    async fn register(&self, registration: &Registration) -> Result<()>;

    /// Ends the server session.
    async fn logout(&self) -> Result<()>;

    /// The user owning the current session.
    async fn profile(&self) -> Result<User>;
}
