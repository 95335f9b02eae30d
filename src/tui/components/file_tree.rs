//! # File Tree Component
//!
//! Renders a `FileTree` as a framed two-line-per-entry list with a prompt
//! line and a status line underneath.
//!
//! ```text
//! ┌/home/user/projects──────────┐
//! │ notes.txt                    │
//! │ 2024-05-01 09:12:00 -rw-r… 1.2K
//! │ src/                         │
//! │ ...                          │
//! │ > new_na▌                    │  prompt (only while one is open)
//! │ Successfully created file    │  status
//! └──────────────────────────────┘
//! ```
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `FileTree` and its `ListState` live in `TuiState`
//! - `FileTreeView` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::state::{FileTree, StatusLevel};
use crate::tui::component::Component;
use crate::tui::theme::{PaneStyle, Theme};

/// Rows each entry occupies: name, then description.
const ROWS_PER_ENTRY: u16 = 2;
const PROMPT_PREFIX: &str = "> ";

/// Transient render wrapper for the file tree pane.
pub struct FileTreeView<'a> {
    tree: &'a mut FileTree,
    list_state: &'a mut ListState,
    style: PaneStyle,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> FileTreeView<'a> {
    pub fn new(
        tree: &'a mut FileTree,
        list_state: &'a mut ListState,
        style: PaneStyle,
        theme: &'a Theme,
        focused: bool,
    ) -> Self {
        Self {
            tree,
            list_state,
            style,
            theme,
            focused,
        }
    }

    fn title(&self) -> String {
        self.tree
            .dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default()
    }

    fn items(&self, width: u16) -> Vec<ListItem<'static>> {
        let selected_style = Style::default()
            .fg(self.theme.selected)
            .add_modifier(Modifier::BOLD);
        let description_style = Style::default().fg(Color::DarkGray);

        self.tree
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let name_style = if i == self.tree.cursor {
                    selected_style
                } else {
                    Style::default()
                };
                let name = truncate_to_width(&entry.display_name(), width as usize);
                let description = truncate_to_width(&entry.description(), width as usize);
                ListItem::new(vec![
                    Line::from(Span::styled(name, name_style)),
                    Line::from(Span::styled(description, description_style)),
                ])
            })
            .collect()
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect) {
        let mode = self.tree.mode();
        let prompt = self.tree.prompt();
        let line = if prompt.is_empty() {
            Line::from(vec![
                Span::raw(PROMPT_PREFIX),
                Span::styled(
                    mode.placeholder().unwrap_or_default(),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(vec![Span::raw(PROMPT_PREFIX), Span::raw(prompt.value().to_string())])
        };
        frame.render_widget(Paragraph::new(line), area);

        if self.focused {
            let before_cursor = &prompt.value()[..prompt.cursor()];
            let x = area.x as usize + PROMPT_PREFIX.width() + before_cursor.width();
            let max_x = area.right().saturating_sub(1) as usize;
            frame.set_cursor_position(Position::new(x.min(max_x) as u16, area.y));
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let Some(status) = &self.tree.status else {
            return;
        };
        let color = match status.level {
            StatusLevel::Info => self.theme.info,
            StatusLevel::Error => self.theme.error,
        };
        let text = truncate_to_width(&status.text, area.width as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(color))),
            area,
        );
    }
}

impl Component for FileTreeView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_set = if self.style.borderless {
            border::EMPTY
        } else {
            border::PLAIN
        };
        let block = Block::bordered()
            .border_set(border_set)
            .border_style(Style::default().fg(self.style.border))
            .title(self.title())
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [list_area, prompt_area, status_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.tree
            .set_page_size((list_area.height / ROWS_PER_ENTRY) as usize);

        if self.tree.entries.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.tree.cursor));
        }
        let list = List::new(self.items(list_area.width));
        frame.render_stateful_widget(list, list_area, self.list_state);

        if self.tree.prompt_active() {
            self.render_prompt(frame, prompt_area);
        }
        self.render_status(frame, status_area);
    }
}

/// Cuts `text` to at most `width` columns, ending in `…` when shortened.
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
