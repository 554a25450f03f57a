use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Reusable single-line text input
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get the current input value
  pub fn value(&self) -> &str {
    &self.buffer
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  /// Clear the input
  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  /// Replace the content, putting the cursor at the end
  pub fn set_value(&mut self, value: &str) {
    self.buffer = value.to_string();
    self.cursor = self.buffer.len();
  }

  /// Handle a key event, returning the result
  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
          self.cursor -= c.len_utf8();
          self.buffer.remove(self.cursor);
        }
        InputResult::Consumed
      }
      KeyCode::Delete => {
        if self.cursor < self.buffer.len() {
          self.buffer.remove(self.cursor);
        }
        InputResult::Consumed
      }
      KeyCode::Left => {
        if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
          self.cursor -= c.len_utf8();
        }
        InputResult::Consumed
      }
      KeyCode::Right => {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
          self.cursor += c.len_utf8();
        }
        InputResult::Consumed
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::End => {
        self.cursor = self.buffer.len();
        InputResult::Consumed
      }
      KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        // Clear line before cursor
        self.buffer = self.buffer[self.cursor..].to_string();
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        InputResult::Consumed
      }
      _ => InputResult::NotHandled,
    }
  }

  /// Get cursor position for rendering
  pub fn cursor_position(&self) -> usize {
    self.cursor
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_basic_input() {
    let mut input = TextInput::new();
    assert!(input.is_empty());

    input.handle_key(key(KeyCode::Char('d')));
    input.handle_key(key(KeyCode::Char('u')));
    input.handle_key(key(KeyCode::Char('n')));
    input.handle_key(key(KeyCode::Char('e')));
    assert_eq!(input.value(), "dune");
  }

  #[test]
  fn test_submit_returns_value() {
    let mut input = TextInput::new();
    input.set_value("heat");
    let result = input.handle_key(key(KeyCode::Enter));
    assert_eq!(result, InputResult::Submitted("heat".to_string()));
  }

  #[test]
  fn test_cancel() {
    let mut input = TextInput::new();
    input.handle_key(key(KeyCode::Char('x')));
    assert_eq!(input.handle_key(key(KeyCode::Esc)), InputResult::Cancelled);
  }

  #[test]
  fn test_cursor_editing_mid_string() {
    let mut input = TextInput::new();
    input.set_value("ac");
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Char('b')));
    assert_eq!(input.value(), "abc");
  }

  #[test]
  fn test_ctrl_u_clears_before_cursor() {
    let mut input = TextInput::new();
    input.set_value("dune part two");
    input.handle_key(key(KeyCode::Home));
    for _ in 0..5 {
      input.handle_key(key(KeyCode::Right));
    }
    input.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    assert_eq!(input.value(), "part two");
  }
}
