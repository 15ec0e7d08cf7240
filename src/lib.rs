//! CinemaGuide: client-side state layer for a remote movie catalog.
//!
//! The crate keeps the state a catalog UI needs in sync with the remote
//! service and with durable local storage:
//! - Session and authentication state backed by a server session cookie
//! - Per-user favorites persisted under `favorites_<email>`
//! - Debounced search-as-you-type with stale-response fencing
//! - Catalog browsing: top ten, random pick, rating-sorted genre listings
//!
//! Rendering and routing belong to the embedding UI host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  UI host                                            │  ← Embeds the crate
//! └─────────────────────────────────────────────────────┘
//!              │ Event                ▲ Action / watch
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - AppContext, handle_event                         │
//! │  - SessionStore, SearchController, GenreListing     │
//! └─────────────────────────────────────────────────────┘
//!              │                           │
//! ┌───────────────────────┐   ┌─────────────────────────┐
//! │ Api Layer (api/)      │   │ Storage Layer (storage/)│
//! │ - CatalogApi, AuthApi │   │ - KeyValueStore         │
//! │ - RemoteCatalogClient │   │ - JsonFileStore         │
//! │                       │   │ - FavoritesStore        │
//! └───────────────────────┘   └─────────────────────────┘
//!              │                           │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory (infrastructure/)                 │
//! │  - Movie, User, CinemaError (domain/)               │
//! └─────────────────────────────────────────────────────┘
//!                            │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! [`Config`] can be built in code, from a string map, or from TOML:
//!
//! ```toml
//! base_url = "https://cinemaguide.skillbox.cc"
//! data_dir = "~/.local/share/cinemaguide"
//! search_debounce_ms = 400
//! trace_level = "cinemaguide=debug"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cinemaguide::{handle_event, initialize, Action, Config, Event, Movie};
//!
//! # async fn run() -> cinemaguide::Result<()> {
//! let config = Config::from_file("cinemaguide.toml")?;
//! cinemaguide::observability::init_tracing(&config);
//!
//! let ctx = initialize(&config).await?;
//! let actions = handle_event(&ctx, Event::ToggleFavorite(Movie::new(42, "Batman"))).await?;
//! if actions.contains(&Action::PromptAuthentication) {
//!     // show the login form
//! }
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;

pub use app::{handle_event, Action, AppContext, Event, FavoriteToggle, SearchConfig};
pub use domain::{CinemaError, Credentials, Movie, Registration, Result, User};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default catalog service.
pub const DEFAULT_BASE_URL: &str = "https://cinemaguide.skillbox.cc";

/// Client configuration.
///
/// Every field has a default, so a partial TOML file or map is enough.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the catalog service. Default: [`DEFAULT_BASE_URL`]
    pub base_url: String,

    /// Directory for local storage and traces.
    ///
    /// `None` uses the platform data directory; see
    /// [`infrastructure::data_dir`].
    pub data_dir: Option<PathBuf>,

    /// Quiet period before a search is sent, in milliseconds. Default: 400
    pub search_debounce_ms: u64,

    /// Minimum trimmed query length that triggers a search. Default: 2
    pub search_min_chars: usize,

    /// Maximum number of search results shown. Default: 5
    pub search_max_results: usize,

    /// Page size requested from the genre endpoint. Default: 10
    pub genre_page_size: u32,

    /// Tracing filter directive, e.g. `debug` or `cinemaguide=trace`.
    ///
    /// `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: None,
            search_debounce_ms: u64::try_from(search.debounce.as_millis()).unwrap_or(400),
            search_min_chars: search.min_chars,
            search_max_results: search.max_results,
            genre_page_size: app::context::DEFAULT_GENRE_PAGE_SIZE,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map, such as host settings.
    ///
    /// Missing keys, empty values and values that do not parse fall back to
    /// their defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use cinemaguide::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("search_debounce_ms".to_string(), "250".to_string());
    /// map.insert("search_max_results".to_string(), "many".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.search_debounce_ms, 250);
    /// assert_eq!(config.search_max_results, 5);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Self {
            base_url: text("base_url").unwrap_or(defaults.base_url),
            data_dir: text("data_dir").map(PathBuf::from),
            search_debounce_ms: text("search_debounce_ms")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_debounce_ms),
            search_min_chars: text("search_min_chars")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_min_chars),
            search_max_results: text("search_max_results")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_max_results),
            genre_page_size: text("genre_page_size")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.genre_page_size),
            trace_level: text("trace_level"),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::Config`] if the document is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CinemaError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CinemaError::Io`] if the file cannot be read and
    /// [`CinemaError::Config`] if it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Search pipeline settings.
    #[must_use]
    pub fn search(&self) -> SearchConfig {
        SearchConfig {
            debounce: Duration::from_millis(self.search_debounce_ms),
            min_chars: self.search_min_chars,
            max_results: self.search_max_results,
        }
    }
}

/// Builds the application context and restores the server session.
///
/// Favorites are stored in `local-storage.json` inside the data directory.
/// Tracing is not set up here; call
/// [`observability::init_tracing`] first if it is wanted.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the local storage file
/// cannot be opened. An unreachable service is not an error: the session
/// simply starts anonymous.
pub async fn initialize(config: &Config) -> Result<AppContext> {
    tracing::debug!(base_url = %config.base_url, "initializing cinemaguide client");

    let client = api::RemoteCatalogClient::new(&config.base_url)?;
    let data_dir = infrastructure::data_dir(config.data_dir.as_deref());
    let store = storage::JsonFileStore::open(infrastructure::storage_file(&data_dir))?;

    let ctx = AppContext::with_client(client, Box::new(store), config.search())
        .with_genre_page_size(config.genre_page_size);
    ctx.init().await;
    Ok(ctx)
}
