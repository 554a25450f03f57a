mod movie_detail;
mod quiz;
mod search;
mod trending;

pub use movie_detail::MovieDetailView;
pub use quiz::QuizView;
pub use search::SearchView;
pub use trending::TrendingView;
