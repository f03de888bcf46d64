//! Poster metadata provider abstraction
//!
//! A provider answers one question: which image path does the metadata
//! service hold for a title. Turning that into a URL, placeholder fallbacks
//! and memoization live in `PosterService`.
use crate::error::AppResult;

#[cfg(test)]
use mockall::automock;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Searches for `title` and returns the poster path of the first result
    /// that has one, in the order the provider ranks results.
    ///
    /// `Ok(None)` means the search succeeded but no result carries a poster.
    async fn search_poster_path(&self, title: &str) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
