//! Genre listing with incremental "show more" paging.

use crate::domain::Movie;
use std::cmp::Ordering;

/// Number of movies visible when a genre listing opens.
pub const INITIAL_VISIBLE: usize = 15;

/// Number of movies each "show more" adds.
pub const LOAD_MORE_STEP: usize = 10;

/// Sorts `movies` by rating, highest first.
///
/// A missing rating counts as zero. Movies with equal ratings keep their
/// relative order.
///
/// # Examples
///
/// ```
/// use cinemaguide::app::sort_by_rating;
/// use cinemaguide::Movie;
///
/// let mut a = Movie::new(1, "A");
/// a.tmdb_rating = Some(6.1);
/// let b = Movie::new(2, "B");
/// let mut c = Movie::new(3, "C");
/// c.tmdb_rating = Some(8.4);
///
/// let mut movies = vec![a, b, c];
/// sort_by_rating(&mut movies);
/// assert_eq!(movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![3, 1, 2]);
/// ```
pub fn sort_by_rating(movies: &mut [Movie]) {
    movies.sort_by(|a, b| {
        b.rating_or_zero()
            .partial_cmp(&a.rating_or_zero())
            .unwrap_or(Ordering::Equal)
    });
}

/// Movies of one genre, sorted by rating, revealed a window at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreListing {
    genre: String,
    movies: Vec<Movie>,
    visible: usize,
}

impl GenreListing {
    /// Sorts `movies` and shows the first [`INITIAL_VISIBLE`].
    pub fn new(genre: impl Into<String>, mut movies: Vec<Movie>) -> Self {
        sort_by_rating(&mut movies);
        Self {
            genre: genre.into(),
            movies,
            visible: INITIAL_VISIBLE,
        }
    }

    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// The movies currently shown.
    #[must_use]
    pub fn visible(&self) -> &[Movie] {
        &self.movies[..self.visible.min(self.movies.len())]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.movies.len()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.visible < self.movies.len()
    }

    /// Reveals up to [`LOAD_MORE_STEP`] more movies and returns the newly shown ones.
    pub fn load_more(&mut self) -> &[Movie] {
        let start = self.visible.min(self.movies.len());
        let end = (start + LOAD_MORE_STEP).min(self.movies.len());
        self.visible = end;
        &self.movies[start..end]
    }
}
