use crate::{
    error::AppResult,
    models::Recommendation,
    services::{PosterService, Recommender},
};

/// Shared application state
///
/// The recommender is immutable after startup; the poster service owns the
/// only mutable state (its memo table).
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub posters: PosterService,
}

impl AppState {
    pub fn new(recommender: Recommender, posters: PosterService) -> Self {
        Self {
            recommender,
            posters,
        }
    }

    /// Recommended titles for `title`, each paired with its poster
    pub async fn recommendations_for(&self, title: &str) -> AppResult<Vec<Recommendation>> {
        let titles: Vec<String> = self
            .recommender
            .recommend(title)?
            .into_iter()
            .map(|movie| movie.title.clone())
            .collect();

        let posters = self.posters.fetch_posters(&titles).await;

        Ok(titles
            .into_iter()
            .zip(posters)
            .map(|(title, poster_url)| Recommendation { title, poster_url })
            .collect())
    }
}
