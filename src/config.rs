use serde::Deserialize;

/// Log output format
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Movie table (JSON)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Precomputed similarity matrix (JSON). Computed from tags when unset.
    #[serde(default)]
    pub similarity_path: Option<String>,

    /// Vocabulary cap used when the matrix is computed from tags
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Number of recommendations shown per selection
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are joined onto
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Timeout for a single poster lookup, in seconds
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_movies_path() -> String {
    "data/movies.json".to_string()
}

fn default_max_features() -> usize {
    5000
}

fn default_recommendation_count() -> usize {
    5
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500/".to_string()
}

fn default_poster_timeout_secs() -> u64 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("Failed to load config: TMDB_API_KEY must not be empty");
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_vars(vars(&[("TMDB_API_KEY", "secret")])).unwrap();

        assert_eq!(config.movies_path, "data/movies.json");
        assert_eq!(config.similarity_path, None);
        assert_eq!(config.max_features, 5000);
        assert_eq!(config.recommendation_count, 5);
        assert_eq!(config.poster_timeout_secs, 5);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("SIMILARITY_PATH", "data/similarity.json"),
            ("MAX_FEATURES", "100"),
            ("PORT", "8080"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(
            config.similarity_path.as_deref(),
            Some("data/similarity.json")
        );
        assert_eq!(config.max_features, 100);
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_api_key_fails() {
        assert!(Config::from_vars(vars(&[("PORT", "8080")])).is_err());
        assert!(Config::from_vars(vars(&[("TMDB_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_invalid_number_fails() {
        let result = Config::from_vars(vars(&[("TMDB_API_KEY", "k"), ("PORT", "abc")]));
        assert!(result.is_err());
    }
}
