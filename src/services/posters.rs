use std::{collections::HashMap, sync::Arc};

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{API_ERROR_POSTER_URL, NO_POSTER_URL},
    services::providers::PosterProvider,
};

/// Resolves poster URLs for titles, memoized for the life of the process
///
/// Lookups never fail: a title without a poster resolves to
/// [`NO_POSTER_URL`] and any provider failure to [`API_ERROR_POSTER_URL`].
/// Failures are not memoized.
#[derive(Clone)]
pub struct PosterService {
    provider: Arc<dyn PosterProvider>,
    cache: Cache,
    image_base_url: String,
}

impl PosterService {
    pub fn new(provider: Arc<dyn PosterProvider>, cache: Cache, image_base_url: String) -> Self {
        Self {
            provider,
            cache,
            image_base_url,
        }
    }

    /// Joins a poster path onto the image base with exactly one slash
    pub fn image_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base_url.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }

    async fn resolve(&self, title: &str) -> AppResult<String> {
        let url = match self.provider.search_poster_path(title).await? {
            Some(path) => self.image_url(&path),
            None => NO_POSTER_URL.to_string(),
        };
        Ok(url)
    }

    async fn lookup(&self, title: &str) -> AppResult<String> {
        cached!(
            self.cache,
            CacheKey::Poster(title.to_string()),
            self.resolve(title)
        )
    }

    /// Poster URL for `title`
    pub async fn fetch_poster(&self, title: &str) -> String {
        match self.lookup(title).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    provider = self.provider.name(),
                    error = %e,
                    "Poster lookup failed, using placeholder"
                );
                API_ERROR_POSTER_URL.to_string()
            }
        }
    }

    /// Poster URLs for several titles, fetched in parallel
    ///
    /// The result is aligned with `titles`. Each distinct title is looked up
    /// once, even when it appears more than once.
    pub async fn fetch_posters(&self, titles: &[String]) -> Vec<String> {
        let mut distinct: Vec<&String> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for title in titles {
            slots.entry(title.as_str()).or_insert_with(|| {
                distinct.push(title);
                distinct.len() - 1
            });
        }

        let tasks: Vec<_> = distinct
            .into_iter()
            .cloned()
            .map(|title| {
                let service = self.clone();
                tokio::spawn(async move { service.fetch_poster(&title).await })
            })
            .collect();

        let mut fetched = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(url) => fetched.push(url),
                Err(e) => {
                    tracing::error!(error = %e, "Poster task join error");
                    fetched.push(API_ERROR_POSTER_URL.to_string());
                }
            }
        }

        titles
            .iter()
            .map(|title| fetched[slots[title.as_str()]].clone())
            .collect()
    }
}
