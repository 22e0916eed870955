//! Module trait for the widgets composed by the root view

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use super::{Action, Context};

/// A widget that owns its own key handling and rendering
///
/// Widgets never mutate session state; they read it from the [`Context`]
/// and report intent through the returned [`Action`].
pub trait Module {
    /// Stable identifier for key-handling logs
    fn id(&self) -> &'static str;

    /// Handle keyboard input
    /// Returns an Action describing what should happen
    fn handle_key(&mut self, key: KeyEvent, ctx: &Context) -> Action;

    /// Draw the widget into `area`
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context);
}
