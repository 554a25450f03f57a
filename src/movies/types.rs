use serde::{Deserialize, Serialize};

/// A single movie as the service reports it.
///
/// Everything beyond id and title is optional; the service omits fields
/// it has no data for. Instances are never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Movie {
  pub id: String,
  pub title: String,
  pub year: Option<i32>,
  pub genres: Option<Vec<String>>,
  pub overview: Option<String>,
  #[serde(rename = "posterUrl")]
  pub poster_url: Option<String>,
  /// 0-10 scale
  pub rating: Option<f64>,
}

/// One page of search results. `page` and `pages` are 1-based and
/// `pages` is the server's authoritative page count.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchResponse {
  pub results: Vec<Movie>,
  pub total: u32,
  pub page: u32,
  pub pages: u32,
}

/// Taste-quiz payload for /api/recommend/by-quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCriteria {
  pub genres: Vec<String>,
  pub mood: Option<String>,
  pub pace: Option<String>,
  pub era: Option<String>,
  /// Must be non-empty; callers fall back to the configured default language.
  pub languages: Vec<String>,
  pub min_rating: Option<f64>,
}

impl Movie {
  /// Short one-line label for list rows, e.g. "Dune (2021)".
  pub fn display_title(&self) -> String {
    match self.year {
      Some(year) => format!("{} ({})", self.title, year),
      None => self.title.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_movie_decodes_with_sparse_fields() {
    let json = r#"{"id":"42","title":"Stalker"}"#;
    let movie: Movie = serde_json::from_str(json).unwrap();
    assert_eq!(movie.id, "42");
    assert_eq!(movie.title, "Stalker");
    assert_eq!(movie.year, None);
    assert_eq!(movie.rating, None);
  }

  #[test]
  fn test_movie_decodes_full_payload() {
    let json = r#"{
      "id": "603",
      "title": "The Matrix",
      "year": 1999,
      "genres": ["Action", "Sci-Fi"],
      "overview": "A hacker learns the truth.",
      "posterUrl": "https://img.example/matrix.jpg",
      "rating": 8.2
    }"#;
    let movie: Movie = serde_json::from_str(json).unwrap();
    assert_eq!(movie.year, Some(1999));
    assert_eq!(movie.poster_url.as_deref(), Some("https://img.example/matrix.jpg"));
    assert_eq!(movie.rating, Some(8.2));
  }

  #[test]
  fn test_search_response_decodes() {
    let json = r#"{"results":[{"id":"1","title":"Dune"}],"total":37,"page":2,"pages":4}"#;
    let resp: SearchResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.page, 2);
    assert_eq!(resp.pages, 4);
  }

  #[test]
  fn test_quiz_criteria_serializes_nulls() {
    let criteria = QuizCriteria {
      genres: vec![],
      mood: None,
      pace: None,
      era: Some("nineties".to_string()),
      languages: vec!["en".to_string()],
      min_rating: Some(7.0),
    };
    let json = serde_json::to_value(&criteria).unwrap();
    // The service expects explicit nulls for unset criteria, not absent keys.
    assert!(json.get("mood").unwrap().is_null());
    assert_eq!(json["era"], "nineties");
    assert_eq!(json["min_rating"], 7.0);
  }

  #[test]
  fn test_display_title() {
    let mut movie: Movie = serde_json::from_str(r#"{"id":"1","title":"Heat"}"#).unwrap();
    assert_eq!(movie.display_title(), "Heat");
    movie.year = Some(1995);
    assert_eq!(movie.display_title(), "Heat (1995)");
  }
}
