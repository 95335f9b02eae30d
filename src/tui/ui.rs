use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::tui::component::Component;
use crate::tui::components::{FileTreeView, Help};
use crate::tui::{Focus, TuiState};

/// Draws the file tree, and the help pane beside it when shown.
pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState) {
    let area = frame.area();
    let tree_focused = tui.focus == Focus::FileTree;

    let (tree_area, help_area) = if tui.show_help {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);
        (left, Some(right))
    } else {
        (area, None)
    };

    let tree_style = tui.theme.pane(tree_focused, tui.borderless);
    FileTreeView::new(
        &mut tui.file_tree,
        &mut tui.list_state,
        tree_style,
        &tui.theme,
        tree_focused,
    )
    .render(frame, tree_area);

    if let Some(help_area) = help_area {
        let help_style = tui.theme.pane(!tree_focused, tui.borderless);
        Help::new(&mut tui.help, help_style).render(frame, help_area);
    }
}
