use crate::movies::client::MoviesClient;
use crate::query::QueryState;
use crate::search::SearchController;
use crate::ui::components::{InputResult, TextInput};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::MovieDetailView;
use crate::ui::{ensure_valid_selection, movie_rows};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph};

/// Free-text search with Prev/Next pagination.
///
/// The ordering rules (page reset on text change, discard of superseded
/// responses) all live in [`SearchController`]; this view only feeds it
/// key events and renders its state.
pub struct SearchView {
  client: MoviesClient,
  cache: crate::query::QueryCache,
  controller: SearchController,
  input: TextInput,
  input_active: bool,
  list_state: ListState,
}

impl SearchView {
  pub fn new(client: MoviesClient, cache: crate::query::QueryCache) -> Self {
    let controller = SearchController::new(client.clone());
    Self {
      client,
      cache,
      controller,
      input: TextInput::new(),
      input_active: true,
      list_state: ListState::default(),
    }
  }

  fn handle_input_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.input.handle_key(key) {
      InputResult::Submitted(text) => {
        self.input_active = false;
        self.list_state.select(None);
        self.controller.set_query(text.trim());
      }
      InputResult::Cancelled => {
        self.input_active = false;
        // Keep whatever query was already submitted.
        self.input.set_value(self.controller.query_text());
      }
      InputResult::Consumed | InputResult::NotHandled => {}
    }
    ViewAction::None
  }

  fn render_input(&self, frame: &mut Frame, area: Rect) {
    let border_color = if self.input_active {
      Color::Yellow
    } else {
      Color::Blue
    };
    let block = Block::default()
      .title(" Search ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border_color));

    let mut spans = vec![
      Span::styled("/ ", Style::default().fg(Color::Yellow)),
      Span::raw(self.input.value().to_string()),
    ];
    if self.input_active {
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
  }

  fn render_pager(&self, frame: &mut Frame, area: Rect) {
    let Some(pages) = self.controller.total_pages() else {
      return;
    };

    let style_for = |enabled: bool| {
      if enabled {
        Style::default().fg(Color::White)
      } else {
        Style::default().fg(Color::DarkGray)
      }
    };

    let line = Line::from(vec![
      Span::styled("[p] Prev ", style_for(self.controller.can_prev())),
      Span::styled(
        format!(" {}/{} ", self.controller.page(), pages),
        Style::default().fg(Color::Cyan),
      ),
      Span::styled(" [n] Next", style_for(self.controller.can_next())),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(Paragraph::new(line), area);
  }

  fn render_results(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let placeholder = |text: &str, color: Color| {
      Paragraph::new(text.to_string()).style(Style::default().fg(color))
    };

    match self.controller.state() {
      QueryState::Idle => {
        frame.render_widget(
          placeholder("Type something to search.", Color::DarkGray).block(block),
          area,
        );
      }
      QueryState::Loading => {
        frame.render_widget(
          placeholder("Searching...", Color::DarkGray).block(block),
          area,
        );
      }
      QueryState::Error(e) => {
        frame.render_widget(
          placeholder(&format!("Search failed: {}", e), Color::Red).block(block),
          area,
        );
      }
      QueryState::Success(resp) => {
        if resp.results.is_empty() {
          frame.render_widget(
            placeholder("No results found.", Color::DarkGray).block(block),
            area,
          );
          return;
        }

        let block = block.title(format!(
          " Results for \"{}\" ({}) ",
          self.controller.query_text(),
          resp.total
        ));
        ensure_valid_selection(&mut self.list_state, resp.results.len());
        let list = List::new(movie_rows(&resp.results))
          .block(block)
          .highlight_style(
            Style::default()
              .bg(Color::DarkGray)
              .add_modifier(Modifier::BOLD),
          )
          .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.list_state);
      }
    }
  }
}

impl View for SearchView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.input_active {
      return self.handle_input_key(key);
    }

    match key.code {
      KeyCode::Char('/') => {
        self.input_active = true;
      }
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('n') | KeyCode::Right => {
        self.controller.next_page();
        self.list_state.select(None);
      }
      KeyCode::Char('p') | KeyCode::Left => {
        self.controller.prev_page();
        self.list_state.select(None);
      }
      KeyCode::Enter => {
        if let (Some(idx), Some(resp)) = (self.list_state.selected(), self.controller.state().data())
        {
          if let Some(movie) = resp.results.get(idx) {
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
      .constraints([
        Constraint::Length(3), // Input
        Constraint::Min(1),    // Results
        Constraint::Length(1), // Pager
      ])
      .split(area);

    self.render_input(frame, chunks[0]);
    self.render_results(frame, chunks[1]);
    self.render_pager(frame, chunks[2]);
  }

  fn breadcrumb_label(&self) -> String {
    if self.controller.query_text().is_empty() {
      "Search".to_string()
    } else {
      format!("Search \"{}\"", self.controller.query_text())
    }
  }

  fn hint(&self) -> &'static str {
    ":command  /:edit query  j/k:nav  n/p:page  Enter:open  q:back"
  }

  fn tick(&mut self) {
    self.controller.poll();
  }
}
