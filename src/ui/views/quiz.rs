use crate::movies::client::MoviesClient;
use crate::movies::types::QuizCriteria;
use crate::query::{MovieQueryKey, QueryData, QueryState};
use crate::quiz::{
  QuizController, QuizState, DEFAULT_MIN_RATING, ERAS, GENRES, LANGUAGES, MIN_RATING_STEP, MOODS,
  PACES,
};
use crate::ui::components::ChipRow;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::MovieDetailView;
use crate::ui::{ensure_valid_selection, movie_rows};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph};

/// Form sections, top to bottom.
const SECTION_GENRES: usize = 0;
const SECTION_MOOD: usize = 1;
const SECTION_PACE: usize = 2;
const SECTION_ERA: usize = 3;
const SECTION_LANGUAGES: usize = 4;
const SECTION_RATING: usize = 5;
const SECTION_COUNT: usize = 6;

/// Which half of the screen has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
  Form,
  Results,
}

/// Taste-quiz view: a chip form on top, tailored picks below.
pub struct QuizView {
  client: MoviesClient,
  cache: crate::query::QueryCache,
  controller: QuizController,
  default_language: String,
  /// Configured user id; when set, the results pane shows personalized
  /// picks until the first quiz submission.
  user_id: Option<String>,
  genres: ChipRow,
  moods: ChipRow,
  paces: ChipRow,
  eras: ChipRow,
  languages: ChipRow,
  min_rating: f64,
  section: usize,
  focus: Focus,
  results_state: ListState,
}

impl QuizView {
  pub fn new(
    client: MoviesClient,
    cache: crate::query::QueryCache,
    default_language: &str,
    user_id: Option<String>,
  ) -> Self {
    let controller = QuizController::new(client.clone());
    let mut languages = ChipRow::new(LANGUAGES.iter().map(|l| l.to_uppercase()), true);
    languages.select_label(&default_language.to_uppercase());

    Self {
      client,
      cache,
      controller,
      default_language: default_language.to_string(),
      user_id,
      genres: ChipRow::new(GENRES.iter().copied(), true),
      moods: ChipRow::new(MOODS.iter().copied(), false),
      paces: ChipRow::new(PACES.iter().copied(), false),
      eras: ChipRow::new(ERAS.iter().map(|(_, label)| *label), false),
      languages,
      min_rating: DEFAULT_MIN_RATING,
      section: SECTION_GENRES,
      focus: Focus::Form,
      results_state: ListState::default(),
    }
  }

  fn criteria(&self) -> QuizCriteria {
    let mut languages: Vec<String> = self
      .languages
      .selected_labels()
      .into_iter()
      .map(|l| l.to_lowercase())
      .collect();
    if languages.is_empty() {
      // The payload requires at least one language.
      languages.push(self.default_language.clone());
    }

    QuizCriteria {
      genres: self.genres.selected_labels(),
      mood: self.moods.selected_index().map(|i| MOODS[i].to_string()),
      pace: self.paces.selected_index().map(|i| PACES[i].to_string()),
      era: self.eras.selected_index().map(|i| ERAS[i].0.to_string()),
      languages,
      min_rating: Some(self.min_rating),
    }
  }

  /// Personalized picks for the configured user, read through the cache.
  /// `None` when no user id is configured.
  fn user_recs(&self) -> Option<QueryState<QueryData>> {
    let user_id = self.user_id.clone()?;
    let key = MovieQueryKey::RecommendationsForUser {
      user_id: user_id.clone(),
    };
    let client = self.client.clone();
    Some(self.cache.get(&key, move || async move {
      client.recommend_for_user(&user_id).await.map(QueryData::Movies)
    }))
  }

  fn active_row(&mut self) -> Option<&mut ChipRow> {
    match self.section {
      SECTION_GENRES => Some(&mut self.genres),
      SECTION_MOOD => Some(&mut self.moods),
      SECTION_PACE => Some(&mut self.paces),
      SECTION_ERA => Some(&mut self.eras),
      SECTION_LANGUAGES => Some(&mut self.languages),
      _ => None,
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
        self.section = (self.section + 1) % SECTION_COUNT;
      }
      KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
        self.section = self.section.checked_sub(1).unwrap_or(SECTION_COUNT - 1);
      }
      KeyCode::Char('h') | KeyCode::Left => {
        if self.section == SECTION_RATING {
          self.min_rating = (self.min_rating - MIN_RATING_STEP).max(0.0);
        } else if let Some(row) = self.active_row() {
          row.move_left();
        }
      }
      KeyCode::Char('l') | KeyCode::Right => {
        if self.section == SECTION_RATING {
          self.min_rating = (self.min_rating + MIN_RATING_STEP).min(10.0);
        } else if let Some(row) = self.active_row() {
          row.move_right();
        }
      }
      KeyCode::Char(' ') => {
        if let Some(row) = self.active_row() {
          row.toggle();
        }
      }
      KeyCode::Enter => {
        self.results_state.select(None);
        self.controller.submit(self.criteria());
        self.focus = Focus::Results;
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn handle_results_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.results_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.results_state.select_previous(),
      KeyCode::Enter => {
        let selected = match self.results_state.selected() {
          Some(idx) => idx,
          None => return ViewAction::None,
        };
        // Quiz results when present, otherwise the personalized picks
        // shown before the first submission.
        let movie = match self.controller.state().results() {
          Some(results) => results.get(selected).cloned(),
          None => self.user_recs().and_then(|state| {
            state
              .data()
              .and_then(QueryData::as_movies)
              .and_then(|list| list.get(selected))
              .cloned()
          }),
        };
        if let Some(movie) = movie {
          return ViewAction::Push(Box::new(MovieDetailView::new(
            movie.id,
            movie.title,
            self.client.clone(),
            self.cache.clone(),
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc | KeyCode::Tab => self.focus = Focus::Form,
      _ => {}
    }
    ViewAction::None
  }

  fn render_form(&mut self, frame: &mut Frame, area: Rect) {
    let focused = self.focus == Focus::Form;
    let block = Block::default()
      .title(" Taste quiz ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::Blue }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Genres get two rows of chips, everything else one.
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // genres label
        Constraint::Length(2), // genres chips (wrapped)
        Constraint::Length(1), // mood
        Constraint::Length(1), // pace
        Constraint::Length(1), // era
        Constraint::Length(1), // languages
        Constraint::Length(1), // rating
        Constraint::Min(0),
      ])
      .split(inner);

    let label = |text: String, active: bool| {
      let style = if active && focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::DarkGray)
      };
      Paragraph::new(text).style(style)
    };

    let selected_count = self.genres.selected_labels().len();
    frame.render_widget(
      label(
        format!("Genres ({} selected)", selected_count),
        self.section == SECTION_GENRES,
      ),
      chunks[0],
    );
    self
      .genres
      .render(frame, chunks[1], focused && self.section == SECTION_GENRES);

    let rows: [(&str, usize); 4] = [
      ("Mood: ", SECTION_MOOD),
      ("Pace: ", SECTION_PACE),
      ("Era: ", SECTION_ERA),
      ("Lang: ", SECTION_LANGUAGES),
    ];
    for (idx, (name, section)) in rows.iter().enumerate() {
      let row_area = chunks[2 + idx];
      let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(6), Constraint::Min(1)])
        .split(row_area);
      frame.render_widget(label(name.to_string(), self.section == *section), cols[0]);
      let row = match *section {
        SECTION_MOOD => &self.moods,
        SECTION_PACE => &self.paces,
        SECTION_ERA => &self.eras,
        _ => &self.languages,
      };
      row.render(frame, cols[1], focused && self.section == *section);
    }

    frame.render_widget(
      label(
        format!("Min rating: {:.1}  (h/l to adjust, Enter to submit)", self.min_rating),
        self.section == SECTION_RATING,
      ),
      chunks[6],
    );
  }

  fn render_user_recs(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    block: Block,
    state: &QueryState<QueryData>,
  ) {
    let picks = state
      .data()
      .and_then(QueryData::as_movies)
      .unwrap_or_default();

    if picks.is_empty() {
      let (text, color) = match state {
        QueryState::Error(e) => (format!("Personal picks unavailable: {}", e), Color::Red),
        QueryState::Success(_) => ("No personal picks yet. Take the quiz above.".to_string(), Color::DarkGray),
        _ => ("Loading your picks...".to_string(), Color::DarkGray),
      };
      frame.render_widget(
        Paragraph::new(text)
          .style(Style::default().fg(color))
          .block(block),
        area,
      );
      return;
    }

    ensure_valid_selection(&mut self.results_state, picks.len());
    let list = List::new(movie_rows(picks))
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut self.results_state);
  }

  fn render_results(&mut self, frame: &mut Frame, area: Rect) {
    let focused = self.focus == Focus::Results;
    let block = Block::default()
      .title(" Your picks ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::Blue }));

    let placeholder = |text: &str, color: Color| {
      Paragraph::new(text.to_string()).style(Style::default().fg(color))
    };

    if matches!(self.controller.state(), QuizState::Idle) {
      match self.user_recs() {
        Some(state) => self.render_user_recs(frame, area, block, &state),
        None => frame.render_widget(
          placeholder(
            "Take the quick taste quiz above. Picks are tailored immediately.",
            Color::DarkGray,
          )
          .block(block),
          area,
        ),
      }
      return;
    }

    match self.controller.state() {
      QuizState::Idle => {}
      QuizState::Submitting => {
        frame.render_widget(
          placeholder("Finding your picks...", Color::DarkGray).block(block),
          area,
        );
      }
      QuizState::Failed(e) => {
        frame.render_widget(
          placeholder(&format!("Failed to fetch recommendations: {}", e), Color::Red).block(block),
          area,
        );
      }
      QuizState::Succeeded(results) => {
        if results.is_empty() {
          // Valid outcome, not an error: nothing matched the filters.
          frame.render_widget(
            placeholder(
              "No results. Try relaxing filters (rating/era/language).",
              Color::DarkGray,
            )
            .block(block),
            area,
          );
          return;
        }

        ensure_valid_selection(&mut self.results_state, results.len());
        let list = List::new(movie_rows(results))
          .block(block)
          .highlight_style(
            Style::default()
              .bg(Color::DarkGray)
              .add_modifier(Modifier::BOLD),
          )
          .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.results_state);
      }
    }
  }
}

impl View for QuizView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.focus {
      Focus::Form => self.handle_form_key(key),
      Focus::Results => self.handle_results_key(key),
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(11), Constraint::Min(3)])
      .split(area);

    self.render_form(frame, chunks[0]);
    self.render_results(frame, chunks[1]);
  }

  fn breadcrumb_label(&self) -> String {
    "For You".to_string()
  }

  fn hint(&self) -> &'static str {
    ":command  j/k:section  h/l:move  Space:toggle  Enter:submit  q:back"
  }

  fn tick(&mut self) {
    self.controller.poll();
  }
}
