use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back; popping the root quits)
  Pop,
}

/// Trait for view behavior
///
/// Views handle their own input and return actions for the App to
/// execute: App → View → Components.
///
/// Views that load data asynchronously read it through the shared
/// `QueryCache` or own a controller, and poll in `tick()`.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Key hints for the status bar
  fn hint(&self) -> &'static str {
    ":command  j/k:nav  Enter:open  q:back  Ctrl-C:quit"
  }

  /// Called on each tick to allow views to poll async work
  fn tick(&mut self) {}
}
