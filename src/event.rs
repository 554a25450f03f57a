use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for query polling and UI refresh
  Tick,
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          match event::read() {
            // Windows terminals report key release too; only react to presses.
            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
              if tx.send(Event::Key(key)).is_err() {
                break;
              }
            }
            // Redraw on resize, ignore everything else.
            Ok(CrosstermEvent::Resize(_, _)) => {
              if tx.send(Event::Tick).is_err() {
                break;
              }
            }
            _ => {}
          }
        } else {
          // Tick
          if tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
