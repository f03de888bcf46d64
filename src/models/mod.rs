use serde::{Deserialize, Serialize};

/// Returned when the metadata API has no poster for a title
pub const NO_POSTER_URL: &str = "https://via.placeholder.com/300x450?text=No+Poster";

/// Returned when the poster lookup itself failed
pub const API_ERROR_POSTER_URL: &str = "https://via.placeholder.com/300x450?text=API+Error";

/// A row of the movie table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(alias = "movie_id")]
    pub id: i64,
    pub title: String,
    /// Free-text bag of words (genres, cast, keywords, overview)
    #[serde(default)]
    pub tags: String,
}

impl Movie {
    pub fn new(id: i64, title: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tags: tags.into(),
        }
    }
}

/// A recommended title paired with its poster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub poster_url: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /search/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// A single search hit
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbSearchResponse {
    /// Poster path of the first result that has one, in API order
    pub fn first_poster_path(&self) -> Option<&str> {
        self.results
            .iter()
            .filter_map(|result| result.poster_path.as_deref())
            .find(|path| !path.trim().is_empty())
    }
}
