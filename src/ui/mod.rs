pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::{App, Mode};
use crate::movies::types::Movie;
use ratatui::prelude::*;
use ratatui::widgets::{Clear, ListItem, ListState, Paragraph};
use renderfns::{rating_color, rating_stars, truncate};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app);

  if let Some(view) = app.current_view_mut() {
    view.render(frame, chunks[1]);
  }

  draw_status_bar(frame, chunks[2], app);

  if *app.mode() == Mode::Command {
    draw_command_overlay(frame, chunks[1], app);
  }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
  let breadcrumb = app.view_breadcrumb().join(" > ");
  let line = Line::from(vec![
    Span::styled(
      format!(" {} ", app.title()),
      Style::default().fg(Color::Black).bg(Color::Cyan),
    ),
    Span::raw(" "),
    Span::styled(breadcrumb, Style::default().fg(Color::Cyan)),
  ]);
  frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.mode() {
    Mode::Normal => {
      let hint = app
        .current_view()
        .map(|v| v.hint())
        .unwrap_or(":command  q:quit");
      (format!(" {}", hint), Style::default().fg(Color::DarkGray))
    }
    Mode::Command => (
      format!(":{}", app.command_input()),
      Style::default().fg(Color::Yellow),
    ),
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}

/// Autocomplete suggestions rendered above the status bar while in
/// command mode.
fn draw_command_overlay(frame: &mut Frame, content_area: Rect, app: &App) {
  let suggestions = app.autocomplete_suggestions();
  if suggestions.is_empty() {
    return;
  }

  let height = (suggestions.len() as u16).min(6);
  let width = content_area.width.min(44);
  let y = content_area.bottom().saturating_sub(height);
  let overlay = Rect::new(content_area.x, y, width, height);
  frame.render_widget(Clear, overlay);

  let lines: Vec<Line> = suggestions
    .iter()
    .take(height as usize)
    .enumerate()
    .map(|(idx, cmd)| {
      let style = if idx == app.selected_suggestion() {
        Style::default().fg(Color::Black).bg(Color::Yellow)
      } else {
        Style::default().fg(Color::Gray).bg(Color::DarkGray)
      };
      Line::styled(format!(" {:<10} {}", cmd.name, cmd.description), style)
    })
    .collect();

  frame.render_widget(Paragraph::new(lines), overlay);
}

/// Clamp a list selection after the underlying data changed
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  match state.selected() {
    Some(selected) if selected >= len => {
      state.select(if len == 0 { None } else { Some(len - 1) });
    }
    None if len > 0 => state.select(Some(0)),
    _ => {}
  }
}

/// Uniform movie list rows: title, year, rating stars, genres.
pub fn movie_rows(movies: &[Movie]) -> Vec<ListItem<'static>> {
  movies
    .iter()
    .map(|movie| {
      let mut spans = vec![Span::styled(
        format!("{:<40}", truncate(&movie.display_title(), 40)),
        Style::default().fg(Color::White),
      )];

      match movie.rating {
        Some(rating) => spans.push(Span::styled(
          format!(" {} ", rating_stars(rating)),
          Style::default().fg(rating_color(rating)),
        )),
        None => spans.push(Span::raw("       ")),
      }

      if let Some(genres) = &movie.genres {
        spans.push(Span::styled(
          truncate(&genres.join("/"), 30),
          Style::default().fg(Color::Cyan),
        ));
      }

      ListItem::new(Line::from(spans))
    })
    .collect()
}
