//! Chip row selector, the terminal rendition of the quiz form's
//! clickable chip groups.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// A horizontal row of toggleable chips.
///
/// `multi` rows accumulate selections (genres, languages); single rows
/// hold at most one, and toggling the selected chip clears it again,
/// matching the quiz form's mood/pace/era behavior.
#[derive(Debug, Clone)]
pub struct ChipRow {
  labels: Vec<String>,
  selected: Vec<bool>,
  multi: bool,
  cursor: usize,
}

impl ChipRow {
  pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>, multi: bool) -> Self {
    let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    let selected = vec![false; labels.len()];
    Self {
      labels,
      selected,
      multi,
      cursor: 0,
    }
  }

  pub fn move_left(&mut self) {
    self.cursor = self.cursor.saturating_sub(1);
  }

  pub fn move_right(&mut self) {
    if self.cursor + 1 < self.labels.len() {
      self.cursor += 1;
    }
  }

  /// Toggle the chip under the cursor.
  pub fn toggle(&mut self) {
    if self.labels.is_empty() {
      return;
    }
    if self.multi {
      self.selected[self.cursor] = !self.selected[self.cursor];
    } else {
      let was_selected = self.selected[self.cursor];
      self.selected.fill(false);
      // Re-toggling the active chip clears the selection entirely.
      self.selected[self.cursor] = !was_selected;
    }
  }

  /// Pre-select a chip by its label, if present.
  pub fn select_label(&mut self, label: &str) {
    if let Some(idx) = self.labels.iter().position(|l| l == label) {
      if !self.multi {
        self.selected.fill(false);
      }
      self.selected[idx] = true;
    }
  }

  /// All selected labels, in row order.
  pub fn selected_labels(&self) -> Vec<String> {
    self
      .labels
      .iter()
      .zip(&self.selected)
      .filter(|(_, sel)| **sel)
      .map(|(label, _)| label.clone())
      .collect()
  }

  /// Index of the single selection, for rows where `multi` is false.
  pub fn selected_index(&self) -> Option<usize> {
    self.selected.iter().position(|sel| *sel)
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
    let mut spans: Vec<Span> = Vec::with_capacity(self.labels.len() * 2);
    for (idx, label) in self.labels.iter().enumerate() {
      let mut style = if self.selected[idx] {
        Style::default().fg(Color::Black).bg(Color::Cyan)
      } else {
        Style::default().fg(Color::Gray)
      };
      if focused && idx == self.cursor {
        style = style.add_modifier(Modifier::BOLD).add_modifier(Modifier::UNDERLINED);
      }
      spans.push(Span::styled(format!(" {} ", label), style));
      spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).wrap(ratatui::widgets::Wrap { trim: true });
    frame.render_widget(paragraph, area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_multi_row_accumulates() {
    let mut row = ChipRow::new(["Action", "Drama", "Horror"], true);
    row.toggle();
    row.move_right();
    row.move_right();
    row.toggle();
    assert_eq!(row.selected_labels(), vec!["Action", "Horror"]);
  }

  #[test]
  fn test_single_row_replaces_selection() {
    let mut row = ChipRow::new(["slow", "moderate", "fast"], false);
    row.toggle();
    row.move_right();
    row.toggle();
    assert_eq!(row.selected_labels(), vec!["moderate"]);
    assert_eq!(row.selected_index(), Some(1));
  }

  #[test]
  fn test_single_row_retoggle_clears() {
    let mut row = ChipRow::new(["uplifting", "dark"], false);
    row.toggle();
    assert_eq!(row.selected_index(), Some(0));
    row.toggle();
    assert_eq!(row.selected_index(), None);
  }

  #[test]
  fn test_cursor_stays_in_bounds() {
    let mut row = ChipRow::new(["a", "b"], true);
    row.move_left();
    row.move_right();
    row.move_right();
    row.move_right();
    row.toggle();
    assert_eq!(row.selected_labels(), vec!["b"]);
  }

  #[test]
  fn test_select_label() {
    let mut row = ChipRow::new(["en", "fr", "ko"], true);
    row.select_label("en");
    assert_eq!(row.selected_labels(), vec!["en"]);
    row.select_label("nope");
    assert_eq!(row.selected_labels(), vec!["en"]);
  }
}
