//! Movie domain model.
//!
//! A [`Movie`] is the catalog record returned by the remote service. It is
//! immutable once fetched and is shared by value between search results,
//! listings and the favorites store, which persists it verbatim.

use serde::{Deserialize, Serialize};

/// Length of a YouTube video id.
const YOUTUBE_ID_LEN: usize = 11;

/// A movie record as served by the catalog.
///
/// Field names follow the service's camelCase JSON. Descriptive fields the
/// service is known to send as `null` are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub tmdb_rating: Option<f64>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Running time in minutes.
    #[serde(default)]
    pub runtime: u32,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub revenue: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub production: Option<String>,
    #[serde(default)]
    pub awards_summary: Option<String>,
}

impl Movie {
    /// Creates a movie with only an id and title set.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinemaguide::Movie;
    ///
    /// let movie = Movie::new(42, "Batman");
    /// assert_eq!(movie.id, 42);
    /// assert_eq!(movie.rating_or_zero(), 0.0);
    /// ```
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_url: None,
            tmdb_rating: None,
            release_year: None,
            genres: Vec::new(),
            runtime: 0,
            plot: None,
            trailer_url: None,
            language: None,
            budget: None,
            revenue: None,
            director: None,
            production: None,
            awards_summary: None,
        }
    }

    /// Returns the TMDB rating, treating a missing rating as `0.0`.
    #[must_use]
    pub fn rating_or_zero(&self) -> f64 {
        self.tmdb_rating.unwrap_or(0.0)
    }

    /// Extracts the YouTube video id from the trailer URL.
    ///
    /// Recognizes `...watch?v=<id>` and `youtu.be/<id>` forms. Returns `None`
    /// when there is no trailer or the id is not 11 URL-safe characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinemaguide::Movie;
    ///
    /// let mut movie = Movie::new(1, "Heat");
    /// movie.trailer_url = Some("https://www.youtube.com/watch?v=14oNcFxiVaQ".into());
    /// assert_eq!(movie.youtube_id(), Some("14oNcFxiVaQ"));
    ///
    /// movie.trailer_url = Some("https://youtu.be/14oNcFxiVaQ?t=3".into());
    /// assert_eq!(movie.youtube_id(), Some("14oNcFxiVaQ"));
    /// ```
    #[must_use]
    pub fn youtube_id(&self) -> Option<&str> {
        let url = self.trailer_url.as_deref()?;

        ["v=", ".be/"].iter().find_map(|marker| {
            let start = url.find(marker)? + marker.len();
            let candidate = url.get(start..start + YOUTUBE_ID_LEN)?;
            candidate
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
                .then_some(candidate)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_service_payload_with_nulls() {
        let json = r#"{
            "id": 7,
            "title": "Alien",
            "posterUrl": "https://img/alien.jpg",
            "tmdbRating": null,
            "releaseYear": 1979,
            "genres": ["horror", "scifi"],
            "runtime": 117,
            "plot": null,
            "trailerUrl": null,
            "language": "en",
            "budget": "11000000",
            "revenue": null,
            "director": "Ridley Scott",
            "production": null,
            "awardsSummary": null
        }"#;

        let movie: Movie = serde_json::from_str(json).expect("movie payload");
        assert_eq!(movie.id, 7);
        assert_eq!(movie.tmdb_rating, None);
        assert_eq!(movie.rating_or_zero(), 0.0);
        assert_eq!(movie.genres, vec!["horror", "scifi"]);
        assert_eq!(movie.director.as_deref(), Some("Ridley Scott"));
    }

    #[test]
    fn serializes_in_camel_case() {
        let mut movie = Movie::new(3, "Up");
        movie.tmdb_rating = Some(8.3);
        let value = serde_json::to_value(&movie).expect("serialize");
        assert_eq!(value["tmdbRating"], 8.3);
        assert!(value.get("tmdb_rating").is_none());
    }

    #[test]
    fn youtube_id_rejects_short_or_missing_ids() {
        let mut movie = Movie::new(1, "X");
        assert_eq!(movie.youtube_id(), None);

        movie.trailer_url = Some("https://www.youtube.com/watch?v=short".into());
        assert_eq!(movie.youtube_id(), None);

        movie.trailer_url = Some("https://vimeo.com/12345".into());
        assert_eq!(movie.youtube_id(), None);
    }
}
