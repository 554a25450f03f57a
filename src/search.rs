//! Search pagination controller.
//!
//! Sequences free-text query + page number into search requests. Every
//! state change that needs a fetch bumps a monotonic sequence number;
//! when a response arrives, it is applied only if no newer fetch has
//! started since. A slow page-1 response can therefore never clobber a
//! fast page-2 response, regardless of wire completion order. Changing
//! the query text resets the page to 1 before anything is fetched.

use tokio::sync::mpsc;
use tracing::debug;

use crate::movies::client::MoviesClient;
use crate::movies::transport::TransportError;
use crate::movies::types::SearchResponse;
use crate::query::QueryState;

type SearchResult = Result<SearchResponse, TransportError>;

/// Drives paginated free-text search against the movie service.
///
/// One controller per search screen. Call [`SearchController::poll`] on
/// every tick to apply finished requests.
pub struct SearchController {
  client: MoviesClient,
  query_text: String,
  page: u32,
  /// Monotonic fetch counter; responses tagged with an older value are
  /// superseded and dropped.
  seq: u64,
  state: QueryState<SearchResponse>,
  tx: mpsc::UnboundedSender<(u64, SearchResult)>,
  rx: mpsc::UnboundedReceiver<(u64, SearchResult)>,
}

impl SearchController {
  pub fn new(client: MoviesClient) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      client,
      query_text: String::new(),
      page: 1,
      seq: 0,
      state: QueryState::Idle,
      tx,
      rx,
    }
  }

  pub fn query_text(&self) -> &str {
    &self.query_text
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn state(&self) -> &QueryState<SearchResponse> {
    &self.state
  }

  /// Page count from the latest successful response, if any.
  pub fn total_pages(&self) -> Option<u32> {
    self.state.data().map(|resp| resp.pages)
  }

  pub fn can_prev(&self) -> bool {
    self.page > 1
  }

  pub fn can_next(&self) -> bool {
    matches!(self.total_pages(), Some(pages) if self.page < pages)
  }

  /// Set the query text. The page resets to 1 before any fetch starts.
  /// Clearing the text cancels (logically) whatever is in flight and
  /// returns the controller to idle - no stale results linger.
  pub fn set_query(&mut self, text: &str) {
    if text == self.query_text {
      return;
    }
    self.query_text = text.to_string();
    self.page = 1;
    self.restart();
  }

  /// Move to the next page if the server reported one.
  pub fn next_page(&mut self) {
    if self.can_next() {
      self.page += 1;
      self.restart();
    }
  }

  /// Move to the previous page; disabled at page 1.
  pub fn prev_page(&mut self) {
    if self.can_prev() {
      self.page -= 1;
      self.restart();
    }
  }

  /// Start a fetch for the current text/page, superseding any in-flight
  /// request for this controller.
  fn restart(&mut self) {
    self.seq += 1;

    if self.query_text.is_empty() {
      self.state = QueryState::Idle;
      return;
    }

    self.state = QueryState::Loading;
    let client = self.client.clone();
    let query = self.query_text.clone();
    let page = self.page;
    let seq = self.seq;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client.search(&query, page).await;
      let _ = tx.send((seq, result));
    });
  }

  /// Apply finished requests. Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok((seq, result)) = self.rx.try_recv() {
      if seq != self.seq {
        debug!(query = %self.query_text, "discarding superseded search response");
        continue;
      }
      self.state = match result {
        Ok(resp) => QueryState::Success(resp),
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
  use crate::movies::transport::Transport;
  use crate::movies::types::Movie;
  use std::time::Duration;

  fn controller() -> SearchController {
    // Points at a reserved TEST-NET-1 address; requests fail fast and
    // the tests below inject results through the channel directly.
    let transport = Transport::new("http://192.0.2.1:9", Duration::from_millis(100)).unwrap();
    SearchController::new(MoviesClient::new(transport))
  }

  fn response(page: u32, pages: u32, ids: &[&str]) -> SearchResponse {
    SearchResponse {
      results: ids
        .iter()
        .map(|id| Movie {
          id: id.to_string(),
          title: id.to_string(),
          year: None,
          genres: None,
          overview: None,
          poster_url: None,
          rating: None,
        })
        .collect(),
      total: ids.len() as u32,
      page,
      pages,
    }
  }

  #[tokio::test]
  async fn test_query_change_resets_page() {
    let mut ctl = controller();
    ctl.set_query("dune");
    // Simulate a successful multi-page response and move forward.
    let seq = ctl.seq;
    ctl.tx.send((seq, Ok(response(1, 5, &["a"])))).unwrap();
    ctl.poll();
    ctl.next_page();
    assert_eq!(ctl.page(), 2);

    // New text must put us back on page 1 before any fetch.
    ctl.set_query("blade runner");
    assert_eq!(ctl.page(), 1);
    assert!(ctl.state().is_loading());
  }

  #[tokio::test]
  async fn test_empty_query_clears_state_and_fetches_nothing() {
    let mut ctl = controller();
    ctl.set_query("dune");
    let seq_for_dune = ctl.seq;

    ctl.set_query("");
    assert!(matches!(ctl.state(), QueryState::Idle));

    // The in-flight "dune" response arrives late; it was superseded by
    // the clear and must not resurface.
    ctl.tx.send((seq_for_dune, Ok(response(1, 1, &["a"])))).unwrap();
    assert!(!ctl.poll());
    assert!(matches!(ctl.state(), QueryState::Idle));
  }

  #[tokio::test]
  async fn test_slow_page1_cannot_clobber_page2() {
    let mut ctl = controller();
    ctl.set_query("dune");

    // Land page 1 so paging forward is allowed.
    let seq_p1 = ctl.seq;
    ctl.tx.send((seq_p1, Ok(response(1, 3, &["p1"])))).unwrap();
    ctl.poll();

    // User pages to 2; a second (stale) page-1 response then arrives
    // after the page-2 request started, followed by page 2 itself.
    ctl.next_page();
    let seq_p2 = ctl.seq;
    ctl.tx.send((seq_p1, Ok(response(1, 3, &["p1-late"])))).unwrap();
    ctl.tx.send((seq_p2, Ok(response(2, 3, &["p2"])))).unwrap();
    ctl.poll();

    let data = ctl.state().data().unwrap();
    assert_eq!(data.page, 2);
    assert_eq!(data.results[0].id, "p2");
  }

  #[tokio::test]
  async fn test_prev_next_gating() {
    let mut ctl = controller();
    ctl.set_query("heat");
    assert!(!ctl.can_prev());
    assert!(!ctl.can_next()); // No response yet, so no known page count.

    let seq = ctl.seq;
    ctl.tx.send((seq, Ok(response(1, 2, &["a"])))).unwrap();
    ctl.poll();
    assert!(!ctl.can_prev());
    assert!(ctl.can_next());

    ctl.next_page();
    assert_eq!(ctl.page(), 2);
    assert!(ctl.can_prev());

    let seq = ctl.seq;
    ctl.tx.send((seq, Ok(response(2, 2, &["b"])))).unwrap();
    ctl.poll();
    assert!(!ctl.can_next()); // page >= pages

    // next_page at the boundary is a no-op: no new fetch, same page.
    let seq_before = ctl.seq;
    ctl.next_page();
    assert_eq!(ctl.page(), 2);
    assert_eq!(ctl.seq, seq_before);
  }

  #[tokio::test]
  async fn test_failure_becomes_error_state() {
    let mut ctl = controller();
    ctl.set_query("dune");
    let seq = ctl.seq;
    ctl
      .tx
      .send((
        seq,
        Err(TransportError::HttpError {
          status: 502,
          body: None,
        }),
      ))
      .unwrap();
    assert!(ctl.poll());
    assert!(ctl.state().is_error());
  }

  #[tokio::test]
  async fn test_identical_query_is_noop() {
    let mut ctl = controller();
    ctl.set_query("dune");
    let seq = ctl.seq;
    ctl.set_query("dune");
    assert_eq!(ctl.seq, seq);
  }
}
