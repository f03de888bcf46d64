pub mod cache;
pub mod catalog;

mod macros;

pub use cache::Cache;
pub use cache::CacheKey;
pub use catalog::{load_movies, load_similarity, save_similarity};
