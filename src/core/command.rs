//! # Commands
//!
//! `update()` never touches the filesystem. It returns `Command` values and
//! the host runs them with [`run_command`], feeding the resulting actions
//! back into `update()`.
//!
//! ```text
//! update(tree, Action::CopyItem)
//!     → [Sequence([Run(Copy(path)), ListDirectory { Current }])]
//!
//! run_command(Sequence(..))
//!     → copy            (OperationFailed on error)
//!     → list current    (ListingReady or OperationFailed)
//! ```
//!
//! A `Sequence` always runs every member in order. A failed operation does
//! not skip the refresh behind it, so the listing always shows what is
//! actually on disk.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::core::action::Action;
use crate::fs::{Clipboard, DirTarget, FileSystem, FsError};

/// A filesystem mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    Copy(PathBuf),
    Zip(PathBuf),
    Unzip(PathBuf),
    CreateFile(String),
    CreateDirectory(String),
    Delete(PathBuf),
}

impl FsOp {
    fn apply(&self, fs: &dyn FileSystem) -> Result<(), FsError> {
        match self {
            FsOp::Copy(path) => fs.copy(path).map(drop),
            FsOp::Zip(path) => fs.zip(path).map(drop),
            FsOp::Unzip(path) => fs.unzip(path).map(drop),
            FsOp::CreateFile(name) => fs.create_file(name).map(drop),
            FsOp::CreateDirectory(name) => fs.create_directory(name).map(drop),
            FsOp::Delete(path) => fs.delete(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListDirectory { target: DirTarget, show_hidden: bool },
    Run(FsOp),
    CopyToClipboard(String),
    /// Members run one after another in a single task.
    Sequence(Vec<Command>),
}

impl Command {
    /// Re-list whatever the current directory is when this runs.
    pub fn refresh(show_hidden: bool) -> Self {
        Command::ListDirectory {
            target: DirTarget::Current,
            show_hidden,
        }
    }

    /// A mutation followed by a refresh of the current directory.
    pub fn mutate(op: FsOp, show_hidden: bool) -> Self {
        Command::Sequence(vec![Command::Run(op), Command::refresh(show_hidden)])
    }
}

/// Runs a command to completion, returning the actions it produced in order.
///
/// Blocking: the host calls this from a blocking task.
pub fn run_command(
    command: Command,
    fs: &dyn FileSystem,
    clipboard: &dyn Clipboard,
) -> Vec<Action> {
    let mut actions = Vec::new();
    run_into(command, fs, clipboard, &mut actions);
    actions
}

fn run_into(
    command: Command,
    fs: &dyn FileSystem,
    clipboard: &dyn Clipboard,
    actions: &mut Vec<Action>,
) {
    match command {
        Command::ListDirectory {
            target,
            show_hidden,
        } => match fs.list_directory(&target, show_hidden) {
            Ok(listing) => {
                debug!(
                    "Listing ready for {} ({} entries)",
                    listing.dir.display(),
                    listing.entries.len()
                );
                actions.push(Action::ListingReady(listing));
            }
            Err(e) => {
                warn!("Listing {:?} failed: {}", target, e);
                actions.push(Action::OperationFailed(e.to_string()));
            }
        },
        Command::Run(op) => match op.apply(fs) {
            Ok(()) => info!("Completed {:?}", op),
            Err(e) => {
                warn!("{:?} failed: {}", op, e);
                actions.push(Action::OperationFailed(e.to_string()));
            }
        },
        Command::CopyToClipboard(text) => match clipboard.set_text(&text) {
            Ok(()) => actions.push(Action::ClipboardCopied(format!(
                "Successfully copied {text} to clipboard"
            ))),
            Err(e) => {
                warn!("Clipboard copy failed: {}", e);
                actions.push(Action::OperationFailed(e.to_string()));
            }
        },
        Command::Sequence(commands) => {
            for command in commands {
                run_into(command, fs, clipboard, actions);
            }
        }
    }
}
