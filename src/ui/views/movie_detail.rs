use crate::movies::client::MoviesClient;
use crate::movies::types::Movie;
use crate::query::{MovieQueryKey, QueryCache, QueryData, QueryState};
use crate::ui::renderfns::{rating_color, rating_stars};
use crate::ui::view::{View, ViewAction};
use crate::ui::{ensure_valid_selection, movie_rows};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph, Wrap};

/// Detail view for one movie plus "because you watched" recommendations.
pub struct MovieDetailView {
  id: String,
  /// Title carried over from the list row, shown until the detail loads.
  title_hint: String,
  client: MoviesClient,
  cache: QueryCache,
  recs_state: ListState,
}

impl MovieDetailView {
  pub fn new(id: String, title_hint: String, client: MoviesClient, cache: QueryCache) -> Self {
    Self {
      id,
      title_hint,
      client,
      cache,
      recs_state: ListState::default(),
    }
  }

  fn movie_key(&self) -> MovieQueryKey {
    MovieQueryKey::Movie {
      id: self.id.clone(),
    }
  }

  fn recs_key(&self) -> MovieQueryKey {
    MovieQueryKey::RecommendationsForMovie {
      id: self.id.clone(),
    }
  }

  fn movie_query(&self) -> QueryState<QueryData> {
    let client = self.client.clone();
    let id = self.id.clone();
    self.cache.get(&self.movie_key(), move || async move {
      client.movie_by_id(&id).await.map(QueryData::Movie)
    })
  }

  fn recs_query(&self) -> QueryState<QueryData> {
    let client = self.client.clone();
    let id = self.id.clone();
    self.cache.get(&self.recs_key(), move || async move {
      client.recommend_for_movie(&id).await.map(QueryData::Movies)
    })
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect, state: &QueryState<QueryData>) {
    let block = Block::default()
      .title(format!(" {} ", self.title_hint))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let text: Vec<Line> = match state {
      QueryState::Success(data) => match data.as_movie() {
        Some(movie) => movie_lines(movie),
        None => vec![Line::from("Not found.")],
      },
      QueryState::Error(e) => vec![Line::styled(
        format!("Failed to load: {}", e),
        Style::default().fg(Color::Red),
      )],
      _ => vec![Line::styled(
        "Loading...",
        Style::default().fg(Color::DarkGray),
      )],
    };

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
  }

  fn render_recs(&mut self, frame: &mut Frame, area: Rect) {
    let state = self.recs_query();
    let recs = state
      .data()
      .and_then(QueryData::as_movies)
      .unwrap_or_default();

    let block = Block::default()
      .title(" Because you watched ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if recs.is_empty() {
      let content = match &state {
        QueryState::Error(_) => "Recommendations unavailable.",
        QueryState::Success(_) => "No related titles.",
        _ => "Loading...",
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    ensure_valid_selection(&mut self.recs_state, recs.len());
    let list = List::new(movie_rows(recs))
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut self.recs_state);
  }
}

fn movie_lines(movie: &Movie) -> Vec<Line<'static>> {
  let mut lines = vec![Line::styled(
    movie.display_title(),
    Style::default().add_modifier(Modifier::BOLD),
  )];

  if let Some(rating) = movie.rating {
    lines.push(Line::from(vec![
      Span::styled(rating_stars(rating), Style::default().fg(rating_color(rating))),
      Span::styled(format!(" {:.1}/10", rating), Style::default().fg(Color::DarkGray)),
    ]));
  }

  if let Some(genres) = &movie.genres {
    if !genres.is_empty() {
      lines.push(Line::styled(
        genres.join(" / "),
        Style::default().fg(Color::Cyan),
      ));
    }
  }

  if let Some(overview) = &movie.overview {
    lines.push(Line::from(""));
    lines.push(Line::from(overview.clone()));
  }

  lines
}

impl View for MovieDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.recs_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.recs_state.select_previous(),
      KeyCode::Char('r') => {
        self.cache.invalidate(&self.movie_key());
        self.cache.invalidate(&self.recs_key());
      }
      KeyCode::Enter => {
        let state = self.recs_query();
        if let (Some(idx), Some(data)) = (self.recs_state.selected(), state.data()) {
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
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
      .split(area);

    let state = self.movie_query();
    // Once the full record is in, prefer its title for the frame.
    if let Some(movie) = state.data().and_then(QueryData::as_movie) {
      self.title_hint = movie.display_title();
    }

    self.render_detail(frame, chunks[0], &state);
    self.render_recs(frame, chunks[1]);
  }

  fn breadcrumb_label(&self) -> String {
    self.title_hint.clone()
  }

  fn hint(&self) -> &'static str {
    ":command  j/k:recs  Enter:open  r:refresh  q:back"
  }
}
