use ratatui::Frame;
use ratatui::layout::Rect;

/// A renderable pane.
///
/// Components receive data via props (struct fields) and may borrow
/// persistent state mutably, so `render` can record measurements such as
/// page size or content height for the next event.
///
/// This aligns with Ratatui's `StatefulWidget` pattern.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
