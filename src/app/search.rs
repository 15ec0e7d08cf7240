//! Search-as-you-type.
//!
//! Every keystroke goes through [`SearchController::update`], which bumps a
//! generation counter and schedules a debounced lookup tagged with the new
//! generation. A lookup only runs if its generation is still current when the
//! debounce window elapses, and its results are only published if the
//! generation is still current when the call resolves. Superseded work is never
//! aborted; it simply finds itself stale and drops its output.
//!
//! # Example
//!
//! ```no_run
//! use cinemaguide::api::RemoteCatalogClient;
//! use cinemaguide::app::{SearchConfig, SearchController};
//! use std::sync::Arc;
//!
//! # async fn run() -> cinemaguide::Result<()> {
//! let api = Arc::new(RemoteCatalogClient::new("https://cinemaguide.skillbox.cc")?);
//! let search = SearchController::new(api, SearchConfig::default());
//! let mut updates = search.subscribe();
//!
//! search.update("batman");
//! updates.changed().await.ok();
//! println!("{:?}", updates.borrow().results);
//! # Ok(())
//! # }
//! ```

use crate::api::CatalogApi;
use crate::domain::Movie;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;

/// Timing and size limits of the search pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a lookup is sent.
    pub debounce: Duration,
    /// Minimum trimmed query length, in characters, that triggers a lookup.
    pub min_chars: usize,
    /// Maximum number of results shown.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
            min_chars: 2,
            max_results: 5,
        }
    }
}

/// What the search box and its dropdown should display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Raw text of the last update.
    pub query: String,
    /// Incremented by every update and by [`SearchController::clear`].
    pub generation: u64,
    pub results: Vec<Movie>,
    pub dropdown_visible: bool,
}

/// Debounced, generation-fenced search over [`CatalogApi::search_by_title`].
///
/// [`update`](Self::update) spawns onto the current Tokio runtime and must be
/// called from within one.
pub struct SearchController {
    api: Arc<dyn CatalogApi>,
    config: SearchConfig,
    state: Arc<watch::Sender<SearchSnapshot>>,
}

impl SearchController {
    pub fn new(api: Arc<dyn CatalogApi>, config: SearchConfig) -> Self {
        let (state, _) = watch::channel(SearchSnapshot::default());
        Self {
            api,
            config,
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.subscribe()
    }

    /// Accepts the current text of the search box.
    ///
    /// A query shorter than the minimum (after trimming) clears the results
    /// and hides the dropdown at once. Anything longer is looked up once the
    /// debounce window passes without another update.
    pub fn update(&self, text: impl Into<String>) {
        let query = text.into();
        let term = query.trim().to_string();
        let too_short = term.chars().count() < self.config.min_chars;

        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.query = query;
            if too_short {
                s.results.clear();
                s.dropdown_visible = false;
            }
        });

        if too_short {
            tracing::trace!(generation, "query below minimum length, results cleared");
            return;
        }

        let span = tracing::debug_span!("search", generation, term = %term);
        tokio::spawn(
            run_lookup(
                Arc::clone(&self.api),
                Arc::clone(&self.state),
                self.config,
                generation,
                term,
            )
            .instrument(span),
        );
    }

    /// Resets the search after a result was chosen.
    ///
    /// Pending and in-flight lookups become stale.
    pub fn clear(&self) {
        self.state.send_modify(|s| {
            s.generation += 1;
            s.query.clear();
            s.results.clear();
            s.dropdown_visible = false;
        });
    }

    /// Shows the dropdown again when the box regains focus with a query in it.
    pub fn reveal(&self) {
        let min_chars = self.config.min_chars;
        self.state.send_if_modified(|s| {
            let show = !s.dropdown_visible && s.query.trim().chars().count() >= min_chars;
            if show {
                s.dropdown_visible = true;
            }
            show
        });
    }

    /// Hides the dropdown without touching the query or results.
    pub fn dismiss(&self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.dropdown_visible, false));
    }
}

fn is_current(state: &watch::Sender<SearchSnapshot>, generation: u64) -> bool {
    state.borrow().generation == generation
}

async fn run_lookup(
    api: Arc<dyn CatalogApi>,
    state: Arc<watch::Sender<SearchSnapshot>>,
    config: SearchConfig,
    generation: u64,
    term: String,
) {
    tokio::time::sleep(config.debounce).await;

    if !is_current(&state, generation) {
        tracing::trace!("superseded during debounce");
        return;
    }

    match api.search_by_title(&term).await {
        Ok(mut movies) => {
            movies.truncate(config.max_results);
            let count = movies.len();
            let published = state.send_if_modified(|s| {
                if s.generation != generation {
                    return false;
                }
                s.results = movies;
                s.dropdown_visible = true;
                true
            });
            if published {
                tracing::debug!(count, "search results published");
            } else {
                tracing::debug!("discarding stale search results");
            }
        }
        Err(e) if is_current(&state, generation) => {
            tracing::warn!(error = %e, "search failed, keeping previous results");
        }
        Err(e) => {
            tracing::debug!(error = %e, "stale search failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{CinemaError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Catalog whose title search answers after a per-term delay.
    #[derive(Default)]
    struct FakeCatalog {
        calls: Mutex<Vec<String>>,
        delays: HashMap<String, Duration>,
        failing: AtomicBool,
    }

    impl FakeCatalog {
        fn with_delays(delays: &[(&str, u64)]) -> Self {
            Self {
                delays: delays
                    .iter()
                    .map(|(term, ms)| ((*term).to_string(), Duration::from_millis(*ms)))
                    .collect(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn top_movies(&self) -> Result<Vec<Movie>> {
            Ok(Vec::new())
        }

        async fn random_movie(&self) -> Result<Movie> {
            Ok(Movie::new(1, "Random"))
        }

        async fn genres(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn movies_by_genre(&self, _: &str, _: u32, _: u32) -> Result<Vec<Movie>> {
            Ok(Vec::new())
        }

        async fn movie_by_id(&self, id: i64) -> Result<Movie> {
            Err(CinemaError::NotFound(id.to_string()))
        }

        async fn search_by_title(&self, title: &str) -> Result<Vec<Movie>> {
            self.calls.lock().unwrap().push(title.to_string());
            let delay = self
                .delays
                .get(title)
                .copied()
                .unwrap_or(Duration::from_millis(50));
            tokio::time::sleep(delay).await;

            if self.failing.load(Ordering::SeqCst) {
                return Err(CinemaError::Api {
                    status: 502,
                    message: None,
                });
            }
            Ok((0..7).map(|i| Movie::new(i, format!("{title} {i}"))).collect())
        }

        async fn search_movies(&self, _: &str) -> Result<Vec<Movie>> {
            Ok(Vec::new())
        }
    }

    fn controller(fake: FakeCatalog) -> (SearchController, Arc<FakeCatalog>) {
        let fake = Arc::new(fake);
        (SearchController::new(fake.clone(), SearchConfig::default()), fake)
    }

    fn titles(snapshot: &SearchSnapshot) -> Vec<String> {
        snapshot.results.iter().map(|m| m.title.clone()).collect()
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_sends_one_request() {
        let (search, fake) = controller(FakeCatalog::default());

        search.update("b");
        sleep_ms(50).await;
        search.update("ba");
        sleep_ms(50).await;
        search.update("bat");
        sleep_ms(100).await;
        search.update("batman");
        sleep_ms(1000).await;

        assert_eq!(fake.calls(), vec!["batman"]);
        let snapshot = search.snapshot();
        assert!(snapshot.dropdown_visible);
        assert!(titles(&snapshot).iter().all(|t| t.starts_with("batman")));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_resolving_last_is_discarded() {
        let (search, fake) = controller(FakeCatalog::with_delays(&[("bat", 1000), ("batman", 10)]));
        let mut rx = search.subscribe();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = {
            let seen = Arc::clone(&seen);
            tokio::spawn(async move {
                while rx.changed().await.is_ok() {
                    let snapshot = rx.borrow_and_update().clone();
                    seen.lock().unwrap().extend(titles(&snapshot));
                }
            })
        };

        search.update("bat");
        sleep_ms(450).await;
        assert_eq!(fake.calls(), vec!["bat"]);

        search.update("batman");
        sleep_ms(2000).await;

        assert_eq!(fake.calls(), vec!["bat", "batman"]);
        assert!(titles(&search.snapshot()).iter().all(|t| t.starts_with("batman ")));
        assert!(seen.lock().unwrap().iter().all(|t| t.starts_with("batman ")));
        recorder.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_clears_without_request() {
        let (search, fake) = controller(FakeCatalog::default());

        search.update("batman");
        sleep_ms(500).await;
        assert_eq!(search.snapshot().results.len(), 5);

        search.update(" b ");
        let snapshot = search.snapshot();
        assert!(snapshot.results.is_empty());
        assert!(!snapshot.dropdown_visible);

        sleep_ms(1000).await;
        assert_eq!(fake.calls(), vec!["batman"]);
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_is_trimmed_before_lookup() {
        let (search, fake) = controller(FakeCatalog::default());

        search.update("   ");
        search.update("  up  ");
        sleep_ms(500).await;

        assert_eq!(fake.calls(), vec!["up"]);
        assert_eq!(search.snapshot().query, "  up  ");
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_capped_in_received_order() {
        let (search, _) = controller(FakeCatalog::default());

        search.update("alien");
        sleep_ms(500).await;

        let ids: Vec<i64> = search.snapshot().results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_previous_results() {
        let (search, fake) = controller(FakeCatalog::default());

        search.update("batman");
        sleep_ms(500).await;
        let before = search.snapshot();

        fake.failing.store(true, Ordering::SeqCst);
        search.update("batmanx");
        sleep_ms(500).await;

        let after = search.snapshot();
        assert_eq!(after.results, before.results);
        assert!(after.dropdown_visible);
        assert_eq!(fake.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_invalidates_in_flight_lookup() {
        let (search, _) = controller(FakeCatalog::with_delays(&[("batman", 300)]));

        search.update("batman");
        sleep_ms(450).await;
        search.clear();
        sleep_ms(1000).await;

        let snapshot = search.snapshot();
        assert!(snapshot.query.is_empty());
        assert!(snapshot.results.is_empty());
        assert!(!snapshot.dropdown_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_reveals_dropdown_for_present_query() {
        let (search, _) = controller(FakeCatalog::default());

        search.reveal();
        assert!(!search.snapshot().dropdown_visible);

        search.update("batman");
        sleep_ms(500).await;
        search.dismiss();
        assert!(!search.snapshot().dropdown_visible);

        search.reveal();
        let snapshot = search.snapshot();
        assert!(snapshot.dropdown_visible);
        assert_eq!(snapshot.results.len(), 5);
    }
}
