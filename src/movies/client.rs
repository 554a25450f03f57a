//! Typed client for the movie service endpoints.

use super::transport::{Transport, TransportError};
use super::types::{Movie, QuizCriteria, SearchResponse};

/// Movie service API client. Thin typed wrappers over [`Transport`];
/// one method per remote endpoint, no caching at this layer.
#[derive(Debug, Clone)]
pub struct MoviesClient {
  transport: Transport,
}

impl MoviesClient {
  pub fn new(transport: Transport) -> Self {
    Self { transport }
  }

  /// Trending titles for a 1-based page.
  pub async fn trending(&self, page: u32) -> Result<Vec<Movie>, TransportError> {
    self
      .transport
      .get_json("/api/movies/trending", &[("page", page.to_string())])
      .await
  }

  /// A single movie by id.
  pub async fn movie_by_id(&self, id: &str) -> Result<Movie, TransportError> {
    self
      .transport
      .get_json(&format!("/api/movies/{}", id), &[])
      .await
  }

  /// Titles related to the given movie.
  pub async fn recommend_for_movie(&self, movie_id: &str) -> Result<Vec<Movie>, TransportError> {
    self
      .transport
      .get_json("/api/recommend", &[("movie_id", movie_id.to_string())])
      .await
  }

  /// Titles tailored to a known user.
  pub async fn recommend_for_user(&self, user_id: &str) -> Result<Vec<Movie>, TransportError> {
    self
      .transport
      .get_json("/api/recommend/user", &[("user_id", user_id.to_string())])
      .await
  }

  /// Free-text search, 1-based page.
  pub async fn search(&self, query: &str, page: u32) -> Result<SearchResponse, TransportError> {
    self
      .transport
      .get_json(
        "/api/search",
        &[("q", query.to_string()), ("page", page.to_string())],
      )
      .await
  }

  /// One-shot taste-quiz recommendation. Never cached; identical
  /// criteria still hit the service again.
  pub async fn recommend_by_quiz(
    &self,
    criteria: &QuizCriteria,
  ) -> Result<Vec<Movie>, TransportError> {
    self
      .transport
      .post_json("/api/recommend/by-quiz", criteria)
      .await
  }
}
