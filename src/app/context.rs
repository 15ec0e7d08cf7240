//! Application context.
//!
//! [`AppContext`] composes the remote catalog, the session, the favorites
//! store and the search controller into one explicitly constructed value
//! that the UI host creates at startup and passes to whoever needs it.
//! [`init`](AppContext::init) restores the session and
//! [`teardown`](AppContext::teardown) ends it.
//!
//! Favorites are always addressed through the session: reads for an
//! anonymous user are empty and mutations ask for authentication instead of
//! touching storage.

use crate::api::{AuthApi, CatalogApi, RemoteCatalogClient};
use crate::app::listing::GenreListing;
use crate::app::search::{SearchConfig, SearchController};
use crate::app::session::SessionStore;
use crate::domain::error::{CinemaError, Result};
use crate::domain::{Movie, User};
use crate::storage::{FavoritesStore, KeyValueStore};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default page size requested from the genre endpoint.
pub const DEFAULT_GENRE_PAGE_SIZE: u32 = 10;

/// Outcome of a favorites mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteToggle {
    /// The mutation was persisted; carries the new favorites list.
    Updated(Vec<Movie>),
    /// Nobody is signed in; nothing was stored.
    AuthenticationRequired,
}

/// Data shown on the home page.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeFeed {
    pub top: Vec<Movie>,
    pub random: Movie,
}

pub struct AppContext {
    catalog: Arc<dyn CatalogApi>,
    session: SessionStore,
    favorites: Mutex<FavoritesStore<Box<dyn KeyValueStore>>>,
    search: SearchController,
    genre_page_size: u32,
}

impl AppContext {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        auth: Arc<dyn AuthApi>,
        store: Box<dyn KeyValueStore>,
        search: SearchConfig,
    ) -> Self {
        Self {
            search: SearchController::new(Arc::clone(&catalog), search),
            catalog,
            session: SessionStore::new(auth),
            favorites: Mutex::new(FavoritesStore::new(store)),
            genre_page_size: DEFAULT_GENRE_PAGE_SIZE,
        }
    }

    /// Builds a context whose catalog and auth calls share one HTTP client.
    pub fn with_client(
        client: RemoteCatalogClient,
        store: Box<dyn KeyValueStore>,
        search: SearchConfig,
    ) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, store, search)
    }

    #[must_use]
    pub fn with_genre_page_size(mut self, page_size: u32) -> Self {
        self.genre_page_size = page_size;
        self
    }

    /// Restores the server session, if any. Call once at startup.
    pub async fn init(&self) -> Option<User> {
        tracing::debug!("initializing application context");
        self.session.load_session().await
    }

    /// Ends the session. Call on logout and at shutdown.
    pub async fn teardown(&self) {
        self.search.clear();
        self.session.logout().await;
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub const fn search(&self) -> &SearchController {
        &self.search
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn CatalogApi> {
        &self.catalog
    }

    fn favorites_store(&self) -> Result<MutexGuard<'_, FavoritesStore<Box<dyn KeyValueStore>>>> {
        self.favorites
            .lock()
            .map_err(|_| CinemaError::Storage("favorites store lock poisoned".to_string()))
    }

    /// Favorites of the signed-in user; empty when nobody is signed in.
    #[must_use]
    pub fn favorites(&self) -> Vec<Movie> {
        let Some(user) = self.session.current_user() else {
            return Vec::new();
        };
        match self.favorites_store() {
            Ok(store) => store.load(&user.email),
            Err(e) => {
                tracing::warn!(error = %e, "favorites unavailable");
                Vec::new()
            }
        }
    }

    #[must_use]
    pub fn is_favorite(&self, movie_id: i64) -> bool {
        self.favorites().iter().any(|m| m.id == movie_id)
    }

    /// Adds or removes `movie` from the signed-in user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated favorites cannot be persisted.
    pub fn toggle_favorite(&self, movie: &Movie) -> Result<FavoriteToggle> {
        let Some(user) = self.session.current_user() else {
            tracing::info!(movie_id = movie.id, "favorite toggle requires authentication");
            return Ok(FavoriteToggle::AuthenticationRequired);
        };
        let updated = self.favorites_store()?.toggle(&user.email, movie)?;
        Ok(FavoriteToggle::Updated(updated))
    }

    /// Removes `movie_id` from the signed-in user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated favorites cannot be persisted.
    pub fn remove_favorite(&self, movie_id: i64) -> Result<FavoriteToggle> {
        let Some(user) = self.session.current_user() else {
            return Ok(FavoriteToggle::AuthenticationRequired);
        };
        let updated = self.favorites_store()?.remove(&user.email, movie_id)?;
        Ok(FavoriteToggle::Updated(updated))
    }

    /// Fetches the top ten and a random pick concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first failure of either call.
    pub async fn load_home(&self) -> Result<HomeFeed> {
        let (top, random) = tokio::try_join!(self.catalog.top_movies(), self.catalog.random_movie())?;
        tracing::debug!(top = top.len(), random_id = random.id, "home feed loaded");
        Ok(HomeFeed { top, random })
    }

    /// Fetches another random pick.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reroll_random(&self) -> Result<Movie> {
        self.catalog.random_movie().await
    }

    /// Fetches the first page of `genre` as a rating-sorted listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn genre_listing(&self, genre: &str) -> Result<GenreListing> {
        let movies = self
            .catalog
            .movies_by_genre(genre, 1, self.genre_page_size)
            .await?;
        Ok(GenreListing::new(genre, movies))
    }

    /// Fetches a movie page, with its favorite flag for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::NotFound`] for an unknown id.
    pub async fn movie_details(&self, id: i64) -> Result<(Movie, bool)> {
        let movie = self.catalog.movie_by_id(id).await?;
        let favorite = self.is_favorite(movie.id);
        Ok((movie, favorite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{context, FakeService};
    use crate::domain::Credentials;

    #[tokio::test]
    async fn anonymous_toggle_requests_authentication() {
        let fake = Arc::new(FakeService::default());
        let ctx = context(&fake);
        ctx.init().await;

        let outcome = ctx.toggle_favorite(&Movie::new(42, "Batman")).unwrap();
        assert_eq!(outcome, FavoriteToggle::AuthenticationRequired);
        assert!(ctx.favorites().is_empty());

        ctx.session()
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();
        assert!(ctx.favorites().is_empty());
        assert!(!ctx.is_favorite(42));
    }

    #[tokio::test]
    async fn signed_in_toggle_persists() {
        let fake = Arc::new(FakeService::default());
        let ctx = context(&fake);
        ctx.session()
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();

        let outcome = ctx.toggle_favorite(&Movie::new(42, "Batman")).unwrap();
        assert_eq!(outcome, FavoriteToggle::Updated(ctx.favorites()));
        assert!(ctx.is_favorite(42));

        let outcome = ctx.remove_favorite(42).unwrap();
        assert_eq!(outcome, FavoriteToggle::Updated(Vec::new()));
        assert!(!ctx.is_favorite(42));
    }

    #[tokio::test]
    async fn next_user_never_sees_previous_favorites() {
        let fake = Arc::new(FakeService::default());
        let ctx = context(&fake);

        ctx.session()
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();
        ctx.toggle_favorite(&Movie::new(42, "Batman")).unwrap();
        ctx.teardown().await;
        assert!(ctx.favorites().is_empty());

        ctx.session()
            .login(&Credentials::new("boris@example.com", "correct"))
            .await
            .unwrap();
        assert!(ctx.favorites().is_empty());
        assert!(!ctx.is_favorite(42));

        ctx.teardown().await;
        ctx.session()
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();
        assert!(ctx.is_favorite(42));
    }

    #[tokio::test]
    async fn init_restores_existing_session() {
        let fake = Arc::new(FakeService::default());
        fake.sign_in("anna@example.com");
        let ctx = context(&fake);

        let user = ctx.init().await.unwrap();
        assert_eq!(user.email, "anna@example.com");
        assert!(ctx.session().is_authenticated());
    }

    #[tokio::test]
    async fn home_feed_and_reroll() {
        let fake = Arc::new(FakeService::default());
        let ctx = context(&fake);

        let feed = ctx.load_home().await.unwrap();
        assert_eq!(feed.top.len(), 10);
        let next = ctx.reroll_random().await.unwrap();
        assert_ne!(next.id, feed.random.id);
    }

    #[tokio::test]
    async fn genre_listing_is_sorted_by_rating() {
        let fake = Arc::new(FakeService::default());
        let ctx = context(&fake).with_genre_page_size(20);

        let listing = ctx.genre_listing("drama").await.unwrap();
        assert_eq!(listing.total(), 20);
        let ratings: Vec<f64> = listing.visible().iter().map(Movie::rating_or_zero).collect();
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn movie_details_flags_favorites() {
        let fake = Arc::new(FakeService::default());
        let ctx = context(&fake);
        ctx.session()
            .login(&Credentials::new("anna@example.com", "correct"))
            .await
            .unwrap();
        ctx.toggle_favorite(&Movie::new(42, "Batman")).unwrap();

        let (movie, favorite) = ctx.movie_details(42).await.unwrap();
        assert_eq!(movie.title, "Batman");
        assert!(favorite);

        let err = ctx.movie_details(7).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
