//! Taste-quiz submission controller and the quiz option catalogs.
//!
//! Quiz recommendations are a one-shot request/response cycle: nothing
//! is cached, and resubmitting identical criteria always issues a new
//! call. A new submission abandons whatever was in flight - the old
//! response still completes on the wire but is dropped on arrival.

use tokio::sync::mpsc;
use tracing::debug;

use crate::movies::client::MoviesClient;
use crate::movies::transport::TransportError;
use crate::movies::types::{Movie, QuizCriteria};

/// Genres offered by the quiz form.
pub const GENRES: &[&str] = &[
  "Action",
  "Adventure",
  "Animation",
  "Comedy",
  "Crime",
  "Documentary",
  "Drama",
  "Family",
  "Fantasy",
  "History",
  "Horror",
  "Music",
  "Mystery",
  "Romance",
  "Sci-Fi",
  "Thriller",
  "War",
  "Western",
];

pub const MOODS: &[&str] = &[
  "uplifting",
  "dark",
  "romantic",
  "thrilling",
  "funny",
  "mind-bending",
];

pub const PACES: &[&str] = &["slow", "moderate", "fast"];

/// Release-era buckets: wire key + display label.
pub const ERAS: &[(&str, &str)] = &[
  ("classic", "< 1990"),
  ("nineties", "1990s"),
  ("two_thousands", "2000s"),
  ("tens", "2010-2017"),
  ("recent", "2018+"),
];

pub const LANGUAGES: &[&str] = &["en", "hi", "es", "fr", "ko", "ja", "de", "it"];

pub const DEFAULT_MIN_RATING: f64 = 7.0;
pub const MIN_RATING_STEP: f64 = 0.5;

/// Where the submission cycle currently stands.
///
/// `Succeeded` with an empty list is a valid outcome (nothing matched
/// the filters), distinct from `Failed`.
#[derive(Debug, Clone)]
pub enum QuizState {
  Idle,
  Submitting,
  Succeeded(Vec<Movie>),
  Failed(TransportError),
}

impl QuizState {
  pub fn is_submitting(&self) -> bool {
    matches!(self, QuizState::Submitting)
  }

  pub fn results(&self) -> Option<&[Movie]> {
    match self {
      QuizState::Succeeded(results) => Some(results),
      _ => None,
    }
  }
}

type QuizResult = Result<Vec<Movie>, TransportError>;

/// One-shot POST cycle for quiz criteria.
pub struct QuizController {
  client: MoviesClient,
  /// Monotonic submission counter; only the newest submission's
  /// response is applied.
  seq: u64,
  state: QuizState,
  tx: mpsc::UnboundedSender<(u64, QuizResult)>,
  rx: mpsc::UnboundedReceiver<(u64, QuizResult)>,
}

impl QuizController {
  pub fn new(client: MoviesClient) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      client,
      seq: 0,
      state: QuizState::Idle,
      tx,
      rx,
    }
  }

  pub fn state(&self) -> &QuizState {
    &self.state
  }

  /// Submit criteria. Valid from any state; an in-flight submission is
  /// abandoned and its eventual result ignored.
  pub fn submit(&mut self, criteria: QuizCriteria) {
    self.seq += 1;
    self.state = QuizState::Submitting;

    let client = self.client.clone();
    let seq = self.seq;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client.recommend_by_quiz(&criteria).await;
      let _ = tx.send((seq, result));
    });
  }

  /// Apply a finished submission. Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok((seq, result)) = self.rx.try_recv() {
      if seq != self.seq {
        debug!("discarding abandoned quiz response");
        continue;
      }
      self.state = match result {
        Ok(results) => QuizState::Succeeded(results),
        Err(error) => QuizState::Failed(error),
      };
      changed = true;
    }
    changed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::movies::transport::Transport;
  use std::time::Duration;

  fn controller() -> QuizController {
    let transport = Transport::new("http://192.0.2.1:9", Duration::from_millis(100)).unwrap();
    QuizController::new(MoviesClient::new(transport))
  }

  fn criteria() -> QuizCriteria {
    QuizCriteria {
      genres: Vec::new(),
      mood: None,
      pace: None,
      era: None,
      languages: vec!["en".to_string()],
      min_rating: Some(7.0),
    }
  }

  #[tokio::test]
  async fn test_empty_results_are_success_not_error() {
    let mut ctl = controller();
    ctl.submit(criteria());
    assert!(ctl.state().is_submitting());

    let seq = ctl.seq;
    ctl.tx.send((seq, Ok(Vec::new()))).unwrap();
    assert!(ctl.poll());

    match ctl.state() {
      QuizState::Succeeded(results) => assert!(results.is_empty()),
      other => panic!("expected Succeeded, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_resubmit_abandons_in_flight_call() {
    let mut ctl = controller();
    ctl.submit(criteria());
    let first_seq = ctl.seq;

    ctl.submit(criteria());
    let second_seq = ctl.seq;
    assert!(ctl.state().is_submitting());

    // First response arrives after the second submission started.
    let stale = Movie {
      id: "stale".to_string(),
      title: "Stale".to_string(),
      year: None,
      genres: None,
      overview: None,
      poster_url: None,
      rating: None,
    };
    ctl.tx.send((first_seq, Ok(vec![stale]))).unwrap();
    assert!(!ctl.poll());
    assert!(ctl.state().is_submitting());

    ctl.tx.send((second_seq, Ok(Vec::new()))).unwrap();
    assert!(ctl.poll());
    assert!(matches!(ctl.state(), QuizState::Succeeded(_)));
  }

  #[tokio::test]
  async fn test_failure_is_reported_as_state() {
    let mut ctl = controller();
    ctl.submit(criteria());
    let seq = ctl.seq;
    ctl
      .tx
      .send((seq, Err(TransportError::NetworkFailure("timeout".into()))))
      .unwrap();
    assert!(ctl.poll());
    assert!(matches!(ctl.state(), QuizState::Failed(_)));
  }

  #[test]
  fn test_catalogs_match_the_service_vocabulary() {
    assert_eq!(GENRES.len(), 18);
    assert_eq!(MOODS.len(), 6);
    assert_eq!(PACES.len(), 3);
    assert_eq!(ERAS.len(), 5);
    assert_eq!(LANGUAGES.len(), 8);
    assert!(ERAS.iter().any(|(key, _)| *key == "two_thousands"));
  }
}
