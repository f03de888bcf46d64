use std::{path::Path, sync::Arc};

use crate::{
    config::Config,
    db,
    error::{AppError, AppResult},
    models::Movie,
    services::similarity::{self, SimilarityMatrix},
};

/// Content-based recommender over an immutable movie table
///
/// Row `i` of the similarity matrix belongs to the movie at position `i`.
/// Both are shared read-only, so clones are cheap.
#[derive(Clone, Debug)]
pub struct Recommender {
    movies: Arc<Vec<Movie>>,
    similarity: Arc<SimilarityMatrix>,
    count: usize,
}

impl Recommender {
    pub fn new(movies: Vec<Movie>, similarity: SimilarityMatrix, count: usize) -> AppResult<Self> {
        if similarity.len() != movies.len() {
            return Err(AppError::DataLoad(format!(
                "Similarity matrix is {0}x{0} but the movie table has {1} rows",
                similarity.len(),
                movies.len()
            )));
        }

        Ok(Self {
            movies: Arc::new(movies),
            similarity: Arc::new(similarity),
            count,
        })
    }

    /// Builds a recommender whose matrix is computed from the movies' tags
    pub fn from_tags(movies: Vec<Movie>, max_features: usize, count: usize) -> AppResult<Self> {
        let matrix = compute_for(&movies, max_features)?;
        Self::new(movies, matrix, count)
    }

    /// Loads the movie table and the similarity matrix described by `config`
    ///
    /// With `similarity_path` set, an existing file is loaded; a missing one is
    /// computed from tags and written there for the next start.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let movies = db::load_movies(&config.movies_path)?;

        let matrix = match config.similarity_path.as_deref() {
            Some(path) if Path::new(path).exists() => db::load_similarity(path)?,
            Some(path) => {
                let matrix = compute_for(&movies, config.max_features)?;
                db::save_similarity(path, &matrix)?;
                matrix
            }
            None => compute_for(&movies, config.max_features)?,
        };

        Self::new(movies, matrix, config.recommendation_count)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Maximum number of recommendations per query
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Every title in table order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    /// Position of the first movie with exactly this title
    pub fn find_index(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    /// The most similar movies to `title`, best first
    ///
    /// Returns at most `count` movies, fewer when the table is small. The
    /// query movie never appears in its own result.
    pub fn recommend(&self, title: &str) -> AppResult<Vec<&Movie>> {
        let index = self
            .find_index(title)
            .ok_or_else(|| AppError::NotFound(format!("No movie titled '{}'", title)))?;

        let mut ranked: Vec<(usize, f32)> = self
            .similarity
            .row(index)
            .iter()
            .copied()
            .enumerate()
            .collect();

        // Stable: equal scores keep table order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let recommendations: Vec<&Movie> = ranked
            .into_iter()
            .map(|(i, _)| &self.movies[i])
            .filter(|movie| movie.title != title)
            .take(self.count)
            .collect();

        tracing::debug!(
            title = %title,
            index = index,
            results = recommendations.len(),
            "Ranked similar movies"
        );

        Ok(recommendations)
    }
}

fn compute_for(movies: &[Movie], max_features: usize) -> AppResult<SimilarityMatrix> {
    let tags: Vec<&str> = movies.iter().map(|m| m.tags.as_str()).collect();
    similarity::compute_from_tags(&tags, max_features)
}
