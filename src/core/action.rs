//! # Actions
//!
//! Everything that can happen to the file tree becomes an `Action`.
//! User presses the copy key? That's `Action::CopyItem`.
//! A listing finishes in the background? That's `Action::ListingReady`.
//!
//! `update()` applies an action to the `FileTree` and returns the commands
//! the host should run. No I/O happens here.
//!
//! ```text
//! FileTree + Action  →  update()  →  FileTree' + Vec<Command>
//! ```
//!
//! While a prompt is open only prompt actions (text editing, `Escape`,
//! `Submit`) have any effect; while idle the text editing actions are
//! ignored.

use log::{debug, warn};

use crate::core::command::{Command, FsOp};
use crate::core::state::{FileTree, Mode, StatusLevel};
use crate::fs::{DirTarget, Listing};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Listing navigation
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    OpenDirectory,
    ParentDirectory,
    GoHome,
    ToggleHidden,

    // File operations
    CopyItem,
    ZipItem,
    UnzipItem,
    CopyPath,
    BeginCreateFile,
    BeginCreateDirectory,
    BeginDelete,

    // Prompt editing
    InputChar(char),
    Paste(String),
    Backspace,
    DeleteChar,
    PromptLeft,
    PromptRight,
    PromptHome,
    PromptEnd,
    Escape,
    Submit,

    // Results from background commands
    ListingReady(Listing),
    ClipboardCopied(String),
    OperationFailed(String),
}

impl Action {
    fn is_prompt_edit(&self) -> bool {
        matches!(
            self,
            Action::InputChar(_)
                | Action::Paste(_)
                | Action::Backspace
                | Action::DeleteChar
                | Action::PromptLeft
                | Action::PromptRight
                | Action::PromptHome
                | Action::PromptEnd
        )
    }
}

pub fn update(tree: &mut FileTree, action: Action) -> Vec<Command> {
    match action {
        Action::ListingReady(listing) => {
            tree.apply_listing(listing);
            Vec::new()
        }
        Action::ClipboardCopied(text) => {
            tree.set_status(StatusLevel::Info, text);
            Vec::new()
        }
        Action::OperationFailed(message) => {
            tree.set_status(StatusLevel::Error, message);
            Vec::new()
        }
        Action::Escape => {
            if tree.prompt_active() {
                let mode = tree.close_prompt();
                debug!("Prompt {:?} dismissed", mode);
            }
            Vec::new()
        }
        Action::Submit => submit(tree),
        action if tree.prompt_active() => {
            if action.is_prompt_edit() {
                edit_prompt(tree, action);
            } else {
                debug!("Ignoring {:?} while prompt is open", action);
            }
            Vec::new()
        }
        action if action.is_prompt_edit() => Vec::new(),
        action => idle(tree, action),
    }
}

fn edit_prompt(tree: &mut FileTree, action: Action) {
    let prompt = tree.prompt_mut();
    match action {
        Action::InputChar(c) => prompt.insert_char(c),
        Action::Paste(text) => prompt.insert_str(&text),
        Action::Backspace => {
            prompt.backspace();
        }
        Action::DeleteChar => {
            prompt.delete();
        }
        Action::PromptLeft => prompt.move_left(),
        Action::PromptRight => prompt.move_right(),
        Action::PromptHome => prompt.move_home(),
        Action::PromptEnd => prompt.move_end(),
        _ => {}
    }
}

fn submit(tree: &mut FileTree) -> Vec<Command> {
    let raw = tree.prompt().value().to_string();
    let value = raw.trim().to_string();
    let show_hidden = tree.show_hidden;

    match tree.close_prompt() {
        Mode::Idle => Vec::new(),
        Mode::CreateFile | Mode::CreateDirectory if value.is_empty() => {
            debug!("Empty name submitted, nothing created");
            Vec::new()
        }
        Mode::CreateFile => {
            tree.set_status(StatusLevel::Info, "Successfully created file");
            vec![Command::mutate(FsOp::CreateFile(value), show_hidden)]
        }
        Mode::CreateDirectory => {
            tree.set_status(StatusLevel::Info, "Successfully created directory");
            vec![Command::mutate(FsOp::CreateDirectory(value), show_hidden)]
        }
        // The answer must be exactly `y` or `Y`; padding cancels.
        Mode::DeleteConfirm { target } => {
            if raw.eq_ignore_ascii_case("y") {
                tree.set_status(StatusLevel::Info, "Successfully deleted item");
                vec![Command::mutate(FsOp::Delete(target), show_hidden)]
            } else {
                debug!("Delete of {} cancelled", target.display());
                Vec::new()
            }
        }
    }
}

fn idle(tree: &mut FileTree, action: Action) -> Vec<Command> {
    let show_hidden = tree.show_hidden;
    let selected = tree.selected_entry().cloned();

    let commands = match action {
        Action::CursorUp => {
            tree.cursor_up(1);
            Vec::new()
        }
        Action::CursorDown => {
            tree.cursor_down(1);
            Vec::new()
        }
        Action::PageUp => {
            tree.cursor_up(tree.page_size);
            Vec::new()
        }
        Action::PageDown => {
            tree.cursor_down(tree.page_size);
            Vec::new()
        }
        Action::GoToTop => {
            tree.cursor_top();
            Vec::new()
        }
        Action::GoToBottom => {
            tree.cursor_bottom();
            Vec::new()
        }
        Action::OpenDirectory => match selected {
            Some(entry) if entry.is_dir => vec![Command::ListDirectory {
                target: DirTarget::Path(entry.path),
                show_hidden,
            }],
            _ => Vec::new(),
        },
        Action::ParentDirectory => vec![Command::ListDirectory {
            target: DirTarget::Parent,
            show_hidden,
        }],
        Action::GoHome => vec![Command::ListDirectory {
            target: DirTarget::Home,
            show_hidden,
        }],
        Action::ToggleHidden => {
            tree.show_hidden = !tree.show_hidden;
            vec![Command::refresh(tree.show_hidden)]
        }
        Action::CopyItem => mutate_selected(tree, selected, FsOp::Copy, "Successfully copied file"),
        Action::ZipItem => mutate_selected(tree, selected, FsOp::Zip, "Successfully zipped item"),
        Action::UnzipItem => {
            mutate_selected(tree, selected, FsOp::Unzip, "Successfully unzipped item")
        }
        Action::CopyPath => match selected {
            Some(entry) => vec![Command::CopyToClipboard(entry.path.display().to_string())],
            None => Vec::new(),
        },
        Action::BeginCreateFile => {
            tree.open_prompt(Mode::CreateFile);
            Vec::new()
        }
        Action::BeginCreateDirectory => {
            tree.open_prompt(Mode::CreateDirectory);
            Vec::new()
        }
        Action::BeginDelete => {
            match selected {
                Some(entry) => {
                    tree.open_prompt(Mode::DeleteConfirm { target: entry.path });
                }
                None => tree.set_status(StatusLevel::Error, "No item selected"),
            }
            Vec::new()
        }
        other => {
            warn!("Unhandled action while idle: {:?}", other);
            Vec::new()
        }
    };

    if !commands.is_empty() {
        debug!("Issuing commands: {:?}", commands);
    }
    commands
}

fn mutate_selected(
    tree: &mut FileTree,
    selected: Option<crate::fs::Entry>,
    op: fn(std::path::PathBuf) -> FsOp,
    success: &str,
) -> Vec<Command> {
    let Some(entry) = selected else {
        return Vec::new();
    };
    tree.set_status(StatusLevel::Info, success);
    vec![Command::mutate(op(entry.path), tree.show_hidden)]
}
