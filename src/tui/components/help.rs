//! # Help Component
//!
//! Two-column key/description reference inside a scrollable frame.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `HelpState` lives in `TuiState`
//! - `Help` is created each frame with borrowed state and a `PaneStyle`
//!
//! The text itself comes from [`help_screen`], a pure function of its
//! arguments, so the same title, colors, entries and size always produce
//! the same lines.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;
use crate::tui::theme::PaneStyle;

/// Width of the key column.
pub const KEY_WIDTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub key: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleColor {
    pub background: Color,
    pub foreground: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpScroll {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Builds the help text.
///
/// A `width` of 0 disables description wrapping. Output is padded with
/// blank lines up to `height`.
pub fn help_screen(
    title: &str,
    title_color: TitleColor,
    entries: &[HelpEntry],
    width: u16,
    height: u16,
) -> Vec<Line<'static>> {
    let title_text = format!(" {title} ");
    let rule = "─".repeat(title_text.width());
    let mut lines = vec![
        Line::from(Span::styled(
            title_text,
            Style::default()
                .fg(title_color.foreground)
                .bg(title_color.background)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )),
        Line::from(rule),
    ];

    let key_style = Style::default().add_modifier(Modifier::BOLD);
    for entry in entries {
        let key_cell = if entry.key.width() < KEY_WIDTH {
            format!("{}{}", entry.key, " ".repeat(KEY_WIDTH - entry.key.width()))
        } else {
            format!("{} ", entry.key)
        };
        let indent = key_cell.width();
        let available = (width as usize).saturating_sub(indent);

        let description_lines: Vec<String> = if width == 0 || available == 0 {
            vec![entry.description.clone()]
        } else {
            textwrap::wrap(&entry.description, available)
                .into_iter()
                .map(|l| l.into_owned())
                .collect()
        };

        for (i, text) in description_lines.into_iter().enumerate() {
            let lead = if i == 0 {
                Span::styled(key_cell.clone(), key_style)
            } else {
                Span::raw(" ".repeat(indent))
            };
            lines.push(Line::from(vec![lead, Span::raw(text)]));
        }
    }

    while lines.len() < height as usize {
        lines.push(Line::default());
    }
    lines
}

/// Persistent state for the help pane.
pub struct HelpState {
    pub entries: Vec<HelpEntry>,
    pub title: String,
    pub title_color: TitleColor,
    pub active: bool,
    pub borderless: bool,
    pub scroll_state: ScrollViewState,
    /// Measurements from the last render, used to clamp scrolling.
    content_height: u16,
    viewport_height: u16,
}

impl HelpState {
    pub fn new(
        active: bool,
        borderless: bool,
        title: impl Into<String>,
        title_color: TitleColor,
        entries: Vec<HelpEntry>,
    ) -> Self {
        Self {
            entries,
            title: title.into(),
            title_color,
            active,
            borderless,
            scroll_state: ScrollViewState::default(),
            content_height: 0,
            viewport_height: 0,
        }
    }

    pub fn set_title_color(&mut self, color: TitleColor) {
        self.title_color = color;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_borderless(&mut self, borderless: bool) {
        self.borderless = borderless;
    }

    pub fn go_to_top(&mut self) {
        self.scroll_state.set_offset(Position::new(0, 0));
    }

    pub fn offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    /// Scrolls the view. Ignored while inactive; returns whether the
    /// offset changed.
    pub fn scroll(&mut self, scroll: HelpScroll) -> bool {
        if !self.active {
            return false;
        }
        let current = self.offset();
        let max = self.content_height.saturating_sub(self.viewport_height);
        let page = self.viewport_height.max(1);
        let target = match scroll {
            HelpScroll::Up => current.saturating_sub(1),
            HelpScroll::Down => current.saturating_add(1),
            HelpScroll::PageUp => current.saturating_sub(page),
            HelpScroll::PageDown => current.saturating_add(page),
            HelpScroll::Top => 0,
            HelpScroll::Bottom => max,
        }
        .min(max);
        self.scroll_state.set_offset(Position::new(0, target));
        target != current
    }
}

/// Transient render wrapper for the help pane.
pub struct Help<'a> {
    state: &'a mut HelpState,
    style: PaneStyle,
}

impl<'a> Help<'a> {
    pub fn new(state: &'a mut HelpState, style: PaneStyle) -> Self {
        Self { state, style }
    }
}

impl Component for Help<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_set = if self.style.borderless || self.state.borderless {
            border::EMPTY
        } else {
            border::PLAIN
        };
        let block = Block::bordered()
            .border_set(border_set)
            .border_style(Style::default().fg(self.style.border))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // One column is kept for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let lines = help_screen(
            &self.state.title,
            self.state.title_color,
            &self.state.entries,
            content_width,
            inner.height,
        );
        let content_height = lines.len() as u16;
        self.state.content_height = content_height;
        self.state.viewport_height = inner.height;

        let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(lines),
            Rect::new(0, 0, content_width, content_height),
        );
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn title_color() -> TitleColor {
        TitleColor {
            background: Color::Magenta,
            foreground: Color::White,
        }
    }

    fn entries() -> Vec<HelpEntry> {
        vec![
            HelpEntry {
                key: "ctrl+c".to_string(),
                description: "Exit".to_string(),
            },
            HelpEntry {
                key: "j/↓".to_string(),
                description: "Move down".to_string(),
            },
        ]
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_help_screen_layout() {
        let lines = help_screen("Help", title_color(), &entries(), 0, 0);
        assert_eq!(plain(&lines[0]), " Help ");
        assert_eq!(plain(&lines[1]), "──────");
        assert_eq!(plain(&lines[2]), "ctrl+c      Exit");
        assert_eq!(plain(&lines[3]), "j/↓         Move down");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_help_screen_is_pure() {
        let a = help_screen("Help", title_color(), &entries(), 40, 10);
        let b = help_screen("Help", title_color(), &entries(), 40, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_help_screen_pads_to_height() {
        let lines = help_screen("Help", title_color(), &entries(), 40, 10);
        assert_eq!(lines.len(), 10);
        assert!(lines[4..].iter().all(|l| l.spans.is_empty()));
    }

    #[test]
    fn test_long_key_keeps_a_gap() {
        let long = vec![HelpEntry {
            key: "ctrl+shift+x".to_string(),
            description: "Do it".to_string(),
        }];
        let lines = help_screen("Help", title_color(), &long, 0, 0);
        assert_eq!(plain(&lines[2]), "ctrl+shift+x Do it");
    }

    #[test]
    fn test_descriptions_wrap_under_their_column() {
        let wordy = vec![HelpEntry {
            key: "x".to_string(),
            description: "one two three four".to_string(),
        }];
        let lines = help_screen("Help", title_color(), &wordy, 22, 0);
        assert_eq!(plain(&lines[2]), "x           one two");
        assert_eq!(plain(&lines[3]), "            three four");
    }

    #[test]
    fn test_title_style() {
        let lines = help_screen("Help", title_color(), &[], 0, 0);
        let style = lines[0].spans[0].style;
        assert_eq!(style.bg, Some(Color::Magenta));
        assert_eq!(style.fg, Some(Color::White));
        assert!(style.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
    }

    #[test]
    fn test_inactive_help_ignores_scroll() {
        let mut state = HelpState::new(false, false, "Help", title_color(), entries());
        state.content_height = 50;
        state.viewport_height = 10;
        assert!(!state.scroll(HelpScroll::Down));
        assert_eq!(state.offset(), 0);

        state.set_active(true);
        assert!(state.scroll(HelpScroll::Down));
        assert_eq!(state.offset(), 1);
    }

    #[test]
    fn test_scroll_clamps_and_go_to_top() {
        let mut state = HelpState::new(true, false, "Help", title_color(), entries());
        state.content_height = 25;
        state.viewport_height = 10;

        state.scroll(HelpScroll::PageDown);
        assert_eq!(state.offset(), 10);
        state.scroll(HelpScroll::PageDown);
        assert_eq!(state.offset(), 15);
        assert!(!state.scroll(HelpScroll::Down));
        state.scroll(HelpScroll::Up);
        assert_eq!(state.offset(), 14);

        state.go_to_top();
        assert_eq!(state.offset(), 0);
        state.scroll(HelpScroll::Bottom);
        assert_eq!(state.offset(), 15);
    }

    #[test]
    fn test_render_shows_title_and_entries() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = HelpState::new(true, false, "Teacup Help", title_color(), entries());
        let style = PaneStyle {
            border: Color::Cyan,
            borderless: false,
        };

        terminal
            .draw(|f| Help::new(&mut state, style).render(f, f.area()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Teacup Help"));
        assert!(text.contains("ctrl+c"));
        assert!(text.contains("Move down"));
        assert!(text.contains('┌'));
    }

    #[test]
    fn test_setters_change_next_render() {
        let mut state = HelpState::new(true, false, "Help", title_color(), entries());
        let red = TitleColor {
            background: Color::Red,
            foreground: Color::Black,
        };
        state.set_title_color(red);
        state.set_borderless(true);
        assert_eq!(state.title_color, red);
        assert!(state.borderless);

        let lines = help_screen(&state.title, state.title_color, &state.entries, 0, 0);
        assert_eq!(lines[0].spans[0].style.bg, Some(Color::Red));
    }

    #[test]
    fn test_borderless_render_has_no_frame() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = HelpState::new(true, true, "Help", title_color(), entries());
        let style = PaneStyle {
            border: Color::Cyan,
            borderless: false,
        };

        terminal
            .draw(|f| Help::new(&mut state, style).render(f, f.area()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(!text.contains('┌'));
        assert!(text.contains("ctrl+c"));
    }
}
