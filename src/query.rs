//! Keyed async query cache for data fetching.
//!
//! Inspired by TanStack Query: a [`QueryCache`] holds one entry per
//! logical request key, guarantees a single outstanding fetch per key,
//! and exposes loading/success/error state to the views. Results are
//! delivered through a channel and applied on [`QueryCache::poll`],
//! which the app calls on every event-loop tick.
//!
//! Each fetch is tagged with the entry's epoch at start time. A result
//! whose epoch no longer matches the entry has been superseded by a
//! newer fetch for the same key and is dropped on arrival; the wire
//! request itself is never aborted.
//!
//! # Example
//!
//! ```ignore
//! let key = MovieQueryKey::Trending { page: 1 };
//! let client = movies_client.clone();
//! let state = cache.get(&key, move || async move {
//!     client.trending(1).await.map(QueryData::Movies)
//! });
//!
//! // In event loop tick
//! if cache.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::debug;

use crate::movies::transport::TransportError;
use crate::movies::types::{Movie, SearchResponse};

/// The state of a query.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed; the error is data, never propagated as a panic
  Error(TransportError),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&TransportError> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// Identity of a logical request. Two keys are equal iff every element
/// matches; the cache does exact-match lookup only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieQueryKey {
  /// Trending titles, 1-based page
  Trending { page: u32 },
  /// A single movie by id
  Movie { id: String },
  /// Titles related to a movie
  RecommendationsForMovie { id: String },
  /// Titles tailored to a user
  RecommendationsForUser { user_id: String },
  /// Free-text search, 1-based page
  Search { query: String, page: u32 },
}

impl MovieQueryKey {
  /// Whether the key identifies anything fetchable. A key with an empty
  /// identity element (blank movie id, blank search text) stays gated:
  /// no fetch starts and observers see a pending state until a usable
  /// key arrives.
  pub fn is_ready(&self) -> bool {
    match self {
      Self::Trending { .. } => true,
      Self::Movie { id } => !id.is_empty(),
      Self::RecommendationsForMovie { id } => !id.is_empty(),
      Self::RecommendationsForUser { user_id } => !user_id.is_empty(),
      Self::Search { query, .. } => !query.is_empty(),
    }
  }

  /// Human-readable label for logs.
  pub fn description(&self) -> String {
    match self {
      Self::Trending { page } => format!("trending p{}", page),
      Self::Movie { id } => format!("movie {}", id),
      Self::RecommendationsForMovie { id } => format!("recs for movie {}", id),
      Self::RecommendationsForUser { user_id } => format!("recs for user {}", user_id),
      Self::Search { query, page } => format!("search \"{}\" p{}", query, page),
    }
  }
}

/// Tagged payload, one variant per key category. Keeps the cache free
/// of untyped JSON values.
#[derive(Debug, Clone)]
pub enum QueryData {
  Movie(Movie),
  Movies(Vec<Movie>),
  Search(SearchResponse),
}

impl QueryData {
  pub fn as_movie(&self) -> Option<&Movie> {
    match self {
      Self::Movie(m) => Some(m),
      _ => None,
    }
  }

  pub fn as_movies(&self) -> Option<&[Movie]> {
    match self {
      Self::Movies(list) => Some(list),
      _ => None,
    }
  }

  pub fn as_search(&self) -> Option<&SearchResponse> {
    match self {
      Self::Search(resp) => Some(resp),
      _ => None,
    }
  }
}

/// Per-key cache record. `epoch` counts fetch starts; only the fetch
/// carrying the current epoch may write the state.
#[derive(Debug)]
struct Entry {
  epoch: u64,
  /// Marked by `invalidate`; the next `get` starts a fresh fetch.
  stale: bool,
  state: QueryState<QueryData>,
}

/// A finished fetch waiting to be applied on the next `poll`.
struct Completion {
  key: MovieQueryKey,
  epoch: u64,
  result: Result<QueryData, TransportError>,
}

/// Read-through cache of movie service queries.
///
/// Cheap to clone (Arc-backed); the app creates one and hands clones to
/// every view, so all observers of a key share one entry and one
/// outstanding fetch. Entries never expire within a session; the only
/// way to refetch is [`QueryCache::invalidate`].
#[derive(Clone)]
pub struct QueryCache {
  entries: Arc<Mutex<HashMap<MovieQueryKey, Entry>>>,
  tx: mpsc::UnboundedSender<Completion>,
  rx: Arc<Mutex<mpsc::UnboundedReceiver<Completion>>>,
}

impl Default for QueryCache {
  fn default() -> Self {
    Self::new()
  }
}

impl QueryCache {
  pub fn new() -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      entries: Arc::new(Mutex::new(HashMap::new())),
      tx,
      rx: Arc::new(Mutex::new(rx)),
    }
  }

  fn entries(&self) -> MutexGuard<'_, HashMap<MovieQueryKey, Entry>> {
    // Lock is only held for map bookkeeping, never across an await.
    self.entries.lock().expect("query cache lock poisoned")
  }

  /// Read-through lookup. Returns the current state for `key` and, if
  /// the key has never been fetched (or was invalidated), starts exactly
  /// one fetch via `fetcher`. Concurrent callers for the same key while
  /// a fetch is in flight all observe `Loading` and no second network
  /// call is made.
  pub fn get<F, Fut>(&self, key: &MovieQueryKey, fetcher: F) -> QueryState<QueryData>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<QueryData, TransportError>> + Send + 'static,
  {
    if !key.is_ready() {
      // Gated key: report pending without fetching.
      return QueryState::Loading;
    }

    let mut entries = self.entries();
    let entry = entries.entry(key.clone()).or_insert_with(|| Entry {
      epoch: 0,
      stale: true,
      state: QueryState::Idle,
    });

    if entry.stale {
      entry.epoch += 1;
      entry.stale = false;
      entry.state = QueryState::Loading;

      debug!(key = %key.description(), epoch = entry.epoch, "starting fetch");
      let tx = self.tx.clone();
      let key = key.clone();
      let epoch = entry.epoch;
      let future = fetcher();
      tokio::spawn(async move {
        let result = future.await;
        // Ignore send errors - the cache may have been dropped
        let _ = tx.send(Completion { key, epoch, result });
      });
    }

    entry.state.clone()
  }

  /// Mark a key for recomputation. The entry keeps its epoch counter so
  /// that any still-in-flight fetch is superseded once a new one starts.
  pub fn invalidate(&self, key: &MovieQueryKey) {
    if let Some(entry) = self.entries().get_mut(key) {
      entry.stale = true;
    }
  }

  /// Apply completed fetches. Returns `true` if any entry changed
  /// (data arrived or an error landed). Call this on every tick.
  pub fn poll(&self) -> bool {
    let mut rx = self.rx.lock().expect("query cache receiver lock poisoned");
    let mut changed = false;

    while let Ok(completion) = rx.try_recv() {
      let mut entries = self.entries();
      let Some(entry) = entries.get_mut(&completion.key) else {
        continue;
      };

      if entry.epoch != completion.epoch {
        // A newer fetch for this key started after this one; drop it.
        debug!(key = %completion.key.description(), "discarding superseded result");
        continue;
      }

      entry.state = match completion.result {
        Ok(data) => QueryState::Success(data),
        Err(error) => QueryState::Error(error),
      };
      changed = true;
    }

    changed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::time::Duration;

  fn movie(id: &str) -> Movie {
    Movie {
      id: id.to_string(),
      title: format!("Movie {}", id),
      year: None,
      genres: None,
      overview: None,
      poster_url: None,
      rating: None,
    }
  }

  #[tokio::test]
  async fn test_concurrent_observers_share_one_fetch() {
    let cache = QueryCache::new();
    let key = MovieQueryKey::Movie {
      id: "42".to_string(),
    };
    let calls = Arc::new(AtomicU32::new(0));

    for _ in 0..3 {
      let calls = calls.clone();
      let state = cache.get(&key, move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(QueryData::Movie(movie("42")))
      });
      assert!(state.is_loading());
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(cache.poll());

    // All observers converge on the same entry, one network call total.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let state = cache.get(&key, || async { panic!("must not refetch") });
    assert!(state.is_success());
    assert_eq!(state.data().unwrap().as_movie().unwrap().id, "42");
  }

  #[tokio::test]
  async fn test_disabled_key_never_fetches() {
    let cache = QueryCache::new();
    let key = MovieQueryKey::Movie { id: String::new() };
    let calls = Arc::new(AtomicU32::new(0));

    let calls_in_fetch = calls.clone();
    let state = cache.get(&key, move || async move {
      calls_in_fetch.fetch_add(1, Ordering::SeqCst);
      Ok(QueryData::Movie(movie("x")))
    });

    assert!(state.is_loading());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!cache.poll());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_error_lands_in_entry_and_is_not_retried() {
    let cache = QueryCache::new();
    let key = MovieQueryKey::Trending { page: 1 };

    cache.get(&key, || async {
      Err(TransportError::NetworkFailure("unreachable".to_string()))
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(cache.poll());

    // Observing the entry again must not start a new fetch.
    let calls = Arc::new(AtomicU32::new(0));
    let calls_in_fetch = calls.clone();
    let state = cache.get(&key, move || async move {
      calls_in_fetch.fetch_add(1, Ordering::SeqCst);
      Ok(QueryData::Movies(Vec::new()))
    });

    assert!(state.is_error());
    assert!(matches!(
      state.error(),
      Some(TransportError::NetworkFailure(_))
    ));
    tokio::time::sleep(Duration::from_millis(20)).await;
    cache.poll();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_superseded_result_is_discarded() {
    let cache = QueryCache::new();
    let key = MovieQueryKey::Trending { page: 1 };

    // Slow first fetch.
    cache.get(&key, || async {
      tokio::time::sleep(Duration::from_millis(60)).await;
      Ok(QueryData::Movies(vec![movie("old")]))
    });

    // Invalidate and start a fast second fetch before the first lands.
    cache.invalidate(&key);
    cache.get(&key, || async { Ok(QueryData::Movies(vec![movie("new")])) });

    tokio::time::sleep(Duration::from_millis(30)).await;
    cache.poll();
    let state = cache.get(&key, || async { panic!("must not refetch") });
    assert_eq!(state.data().unwrap().as_movies().unwrap()[0].id, "new");

    // The slow first result arrives later; its epoch is stale, so the
    // committed state must not change.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!cache.poll());
    let state = cache.get(&key, || async { panic!("must not refetch") });
    assert_eq!(state.data().unwrap().as_movies().unwrap()[0].id, "new");
  }

  #[tokio::test]
  async fn test_invalidate_triggers_refetch() {
    let cache = QueryCache::new();
    let key = MovieQueryKey::Search {
      query: "dune".to_string(),
      page: 1,
    };
    let calls = Arc::new(AtomicU32::new(0));

    let fetch = |calls: Arc<AtomicU32>| {
      move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(QueryData::Search(SearchResponse {
          results: Vec::new(),
          total: 0,
          page: 1,
          pages: 1,
        }))
      }
    };

    cache.get(&key, fetch(calls.clone()));
    tokio::time::sleep(Duration::from_millis(20)).await;
    cache.poll();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    cache.invalidate(&key);
    let state = cache.get(&key, fetch(calls.clone()));
    assert!(state.is_loading());
    tokio::time::sleep(Duration::from_millis(20)).await;
    cache.poll();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn test_key_equality_is_by_value() {
    let a = MovieQueryKey::Search {
      query: "dune".to_string(),
      page: 1,
    };
    let b = MovieQueryKey::Search {
      query: "dune".to_string(),
      page: 1,
    };
    let c = MovieQueryKey::Search {
      query: "dune".to_string(),
      page: 2,
    };
    assert_eq!(a, b);
    assert_ne!(a, c);
  }
}
