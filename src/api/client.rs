//! HTTP client for the CinemaGuide REST service.
//!
//! [`RemoteCatalogClient`] is a thin, stateless façade: it builds requests,
//! maps non-success statuses into [`CinemaError`] and decodes JSON. The only
//! state it carries is the cookie jar holding the server session, which
//! reqwest attaches to every request.

use crate::api::backend::{AuthApi, CatalogApi};
use crate::api::models::{ApiResult, ErrorPayload, LoginRequest, RegisterRequest};
use crate::domain::error::{CinemaError, Result};
use crate::domain::{Credentials, Movie, Registration, User};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

/// Catalog and authentication client over HTTP.
///
/// Cloning is cheap and clones share the cookie jar, so a login through one
/// clone authenticates all of them.
#[derive(Debug, Clone)]
pub struct RemoteCatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RemoteCatalogClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// A path prefix in `base_url`, such as `https://host/api`, is kept in
    /// front of every endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::Config`] if `base_url` is not an absolute URL and
    /// [`CinemaError::Http`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinemaguide::api::RemoteCatalogClient;
    ///
    /// let client = RemoteCatalogClient::new("https://cinemaguide.skillbox.cc")?;
    /// assert_eq!(client.base_url().host_str(), Some("cinemaguide.skillbox.cc"));
    /// assert!(RemoteCatalogClient::new("not a url").is_err());
    ///
    /// let prefixed = RemoteCatalogClient::new("https://example.com/api")?;
    /// assert_eq!(prefixed.base_url().path(), "/api/");
    /// # Ok::<(), cinemaguide::CinemaError>(())
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| CinemaError::Config(format!("invalid base url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CinemaError::Config(format!("base url {base_url} cannot hold paths")));
        }
        // endpoints are joined relative to the base, which needs a trailing slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        tracing::debug!(base_url = %base_url, "remote catalog client created");
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CinemaError::Config(format!("invalid endpoint {path:?}: {e}")))
    }

    /// Sends `request` and turns a non-success status into [`CinemaError::Api`].
    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = ErrorPayload::message_from(&body);
        tracing::debug!(status = status.as_u16(), message = ?message, "request rejected");
        Err(CinemaError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::send(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends an auth request whose success body is `{"result": bool}`.
    async fn send_auth(request: RequestBuilder) -> Result<()> {
        let response = Self::send(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if ApiResult::is_rejected(&body) {
            return Err(CinemaError::Api {
                status,
                message: ErrorPayload::message_from(&body),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for RemoteCatalogClient {
    async fn top_movies(&self) -> Result<Vec<Movie>> {
        let url = self.endpoint("movie/top10")?;
        self.get_json(self.http.get(url)).await
    }

    async fn random_movie(&self) -> Result<Movie> {
        let url = self.endpoint("movie/random")?;
        self.get_json(self.http.get(url)).await
    }

    async fn genres(&self) -> Result<Vec<String>> {
        let url = self.endpoint("movie/genres")?;
        self.get_json(self.http.get(url)).await
    }

    async fn movies_by_genre(&self, genre: &str, page: u32, limit: u32) -> Result<Vec<Movie>> {
        let url = self.endpoint("movie")?;
        let request = self
            .http
            .get(url)
            .query(&[("genre", genre)])
            .query(&[("page", page), ("limit", limit)]);
        self.get_json(request).await
    }

    async fn movie_by_id(&self, id: i64) -> Result<Movie> {
        let url = self.endpoint(&format!("movie/{id}"))?;
        match self.get_json(self.http.get(url)).await {
            Err(CinemaError::Api { status: 404, .. }) => Err(CinemaError::NotFound(id.to_string())),
            other => other,
        }
    }

    async fn search_by_title(&self, title: &str) -> Result<Vec<Movie>> {
        let url = self.endpoint("movie")?;
        self.get_json(self.http.get(url).query(&[("title", title)])).await
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        let url = self.endpoint("movie")?;
        self.get_json(self.http.get(url).query(&[("search", query)])).await
    }
}

#[async_trait]
impl AuthApi for RemoteCatalogClient {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        let url = self.endpoint("auth/login")?;
        Self::send_auth(self.http.post(url).json(&LoginRequest::from(credentials))).await
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        let url = self.endpoint("user")?;
        Self::send_auth(self.http.post(url).json(&RegisterRequest::from(registration))).await
    }

    async fn logout(&self) -> Result<()> {
        let url = self.endpoint("auth/logout")?;
        Self::send(self.http.get(url)).await?;
        Ok(())
    }

    async fn profile(&self) -> Result<User> {
        let url = self.endpoint("profile")?;
        self.get_json(self.http.get(url)).await
    }
}
