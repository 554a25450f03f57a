use crate::movies::client::MoviesClient;
use crate::query::{MovieQueryKey, QueryCache, QueryData, QueryState};
use crate::ui::views::MovieDetailView;
use crate::ui::{ensure_valid_selection, movie_rows};
use crate::ui::view::{View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph};

/// Root view: trending titles for the current page.
pub struct TrendingView {
  client: MoviesClient,
  cache: QueryCache,
  page: u32,
  list_state: ListState,
}

impl TrendingView {
  pub fn new(client: MoviesClient, cache: QueryCache) -> Self {
    Self {
      client,
      cache,
      page: 1,
      list_state: ListState::default(),
    }
  }

  fn key(&self) -> MovieQueryKey {
    MovieQueryKey::Trending { page: self.page }
  }

  /// Read-through: returns cached state, starting the fetch on a miss.
  fn query_state(&self) -> QueryState<QueryData> {
    let client = self.client.clone();
    let page = self.page;
    self.cache.get(&self.key(), move || async move {
      client.trending(page).await.map(QueryData::Movies)
    })
  }

  fn set_page(&mut self, page: u32) {
    self.page = page;
    self.list_state.select(None);
    // The new key is observed (and fetched if needed) on next render.
  }
}

impl View for TrendingView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => {
        self.cache.invalidate(&self.key());
      }
      KeyCode::Char('n') | KeyCode::Right => self.set_page(self.page + 1),
      KeyCode::Char('p') | KeyCode::Left => {
        if self.page > 1 {
          self.set_page(self.page - 1);
        }
      }
      KeyCode::Enter => {
        let state = self.query_state();
        if let (Some(idx), Some(data)) = (self.list_state.selected(), state.data()) {
          if let Some(movie) = data.as_movies().and_then(|list| list.get(idx)) {
            return ViewAction::Push(Box::new(MovieDetailView::new(
              movie.id.clone(),
              movie.title.clone(),
              self.client.clone(),
              self.cache.clone(),
            )));
          }
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let state = self.query_state();

    let title = match &state {
      QueryState::Loading | QueryState::Idle => format!(" Trending p{} (loading...) ", self.page),
      QueryState::Error(e) => format!(" Trending p{} (error: {}) ", self.page, e),
      QueryState::Success(data) => format!(
        " Trending p{} ({}) ",
        self.page,
        data.as_movies().map(|m| m.len()).unwrap_or(0)
      ),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let movies = state
      .data()
      .and_then(QueryData::as_movies)
      .unwrap_or_default();

    if movies.is_empty() {
      let content = match &state {
        QueryState::Error(_) => "Failed to load. Press 'r' to retry.",
        QueryState::Success(_) => "Nothing trending on this page.",
        _ => "Loading trending titles...",
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    ensure_valid_selection(&mut self.list_state, movies.len());
    let list = List::new(movie_rows(movies))
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn breadcrumb_label(&self) -> String {
    if self.page == 1 {
      "Trending".to_string()
    } else {
      format!("Trending p{}", self.page)
    }
  }

  fn hint(&self) -> &'static str {
    ":command  j/k:nav  n/p:page  Enter:open  r:refresh  q:quit"
  }
}
