//! In-process stand-in for the remote service, shared by the app tests.

use crate::api::{AuthApi, CatalogApi};
use crate::app::context::AppContext;
use crate::app::search::SearchConfig;
use crate::domain::error::{CinemaError, Result};
use crate::domain::{Credentials, Movie, Registration, User};
use crate::storage::MemoryStore;
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct FakeService {
    session: Mutex<Option<User>>,
    random_picks: AtomicI64,
}

impl FakeService {
    /// Starts a server session for `email` as if a cookie were already set.
    pub fn sign_in(&self, email: &str) {
        *self.session.lock().unwrap() = Some(User::new(email, "Test", "User"));
    }
}

pub fn context(fake: &Arc<FakeService>) -> AppContext {
    AppContext::new(
        fake.clone(),
        fake.clone(),
        Box::new(MemoryStore::default()),
        SearchConfig::default(),
    )
}

#[async_trait]
impl CatalogApi for FakeService {
    async fn top_movies(&self) -> Result<Vec<Movie>> {
        Ok((1..=10).map(|i| Movie::new(i, format!("Top {i}"))).collect())
    }

    async fn random_movie(&self) -> Result<Movie> {
        let id = 1000 + self.random_picks.fetch_add(1, Ordering::SeqCst);
        Ok(Movie::new(id, "Random"))
    }

    async fn genres(&self) -> Result<Vec<String>> {
        Ok(vec!["drama".to_string(), "comedy".to_string()])
    }

    async fn movies_by_genre(&self, genre: &str, _page: u32, limit: u32) -> Result<Vec<Movie>> {
        Ok((0..i64::from(limit))
            .map(|i| {
                let mut movie = Movie::new(i, format!("{genre} {i}"));
                movie.tmdb_rating = (i % 3 != 0).then(|| (i % 7) as f64);
                movie
            })
            .collect())
    }

    async fn movie_by_id(&self, id: i64) -> Result<Movie> {
        if id == 42 {
            Ok(Movie::new(42, "Batman"))
        } else {
            Err(CinemaError::NotFound(id.to_string()))
        }
    }

    async fn search_by_title(&self, title: &str) -> Result<Vec<Movie>> {
        Ok(vec![Movie::new(42, format!("{title} result"))])
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        self.search_by_title(query).await
    }
}

#[async_trait]
impl AuthApi for FakeService {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        if credentials.password != "correct" {
            return Err(CinemaError::Api {
                status: 400,
                message: Some("Неверный пароль".to_string()),
            });
        }
        self.sign_in(&credentials.email);
        Ok(())
    }

    async fn register(&self, _registration: &Registration) -> Result<()> {
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn profile(&self) -> Result<User> {
        self.session.lock().unwrap().clone().ok_or(CinemaError::Api {
            status: 401,
            message: None,
        })
    }
}
