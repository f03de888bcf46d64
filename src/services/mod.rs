pub mod posters;
pub mod providers;
pub mod recommender;
pub mod similarity;

pub use posters::PosterService;
pub use recommender::Recommender;
