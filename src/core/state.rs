//! # File Tree State
//!
//! Everything the file-tree bubble remembers between events. No rendering
//! types live here; the TUI reads this struct and draws it.
//!
//! ```text
//! FileTree
//! ├── dir: Option<PathBuf>      // directory of the last listing
//! ├── entries: Vec<Entry>       // replaced wholesale on every listing
//! ├── cursor: usize             // index into entries
//! ├── mode: Mode                // idle or which prompt is open
//! ├── prompt: Prompt            // text typed into the open prompt
//! ├── show_hidden: bool         // dotfiles visible
//! ├── status: Option<Status>    // transient info/error line
//! └── page_size: usize          // rows per page, from the last render
//! ```
//!
//! `mode` and `prompt` are private so that the only way to open a prompt is
//! `open_prompt` and the only way to close one is `close_prompt`. At most one
//! prompt can be open because there is exactly one `Mode`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::core::prompt::Prompt;
use crate::fs::{Entry, Listing};

pub const DEFAULT_STATUS_LIFETIME: Duration = Duration::from_millis(3000);

/// Which input the file tree is waiting for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    CreateFile,
    CreateDirectory,
    /// The target is captured when the prompt opens, so a listing that
    /// arrives while the user is confirming cannot change what gets deleted.
    DeleteConfirm { target: PathBuf },
}

impl Mode {
    /// Text shown in an empty prompt.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Mode::Idle => None,
            Mode::CreateFile => Some("Enter name of new file"),
            Mode::CreateDirectory => Some("Enter name of new directory"),
            Mode::DeleteConfirm { .. } => Some("Are you sure you want to delete (y/n)?"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub level: StatusLevel,
    pub set_at: Instant,
}

pub struct FileTree {
    pub dir: Option<PathBuf>,
    pub entries: Vec<Entry>,
    pub cursor: usize,
    pub show_hidden: bool,
    pub status: Option<Status>,
    pub status_lifetime: Duration,
    pub page_size: usize,
    mode: Mode,
    prompt: Prompt,
}

impl FileTree {
    pub fn new(show_hidden: bool, status_lifetime: Duration) -> Self {
        Self {
            dir: None,
            entries: Vec::new(),
            cursor: 0,
            show_hidden,
            status: None,
            status_lifetime,
            page_size: 1,
            mode: Mode::Idle,
            prompt: Prompt::default(),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub(crate) fn prompt_mut(&mut self) -> &mut Prompt {
        &mut self.prompt
    }

    pub fn prompt_active(&self) -> bool {
        self.mode != Mode::Idle
    }

    /// The entry under the cursor, or `None` for an empty listing.
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    /// Opens a prompt with an empty buffer. Ignored unless idle.
    pub(crate) fn open_prompt(&mut self, mode: Mode) -> bool {
        if self.prompt_active() || mode == Mode::Idle {
            return false;
        }
        self.prompt.reset();
        self.mode = mode;
        true
    }

    /// Closes any open prompt, returning the mode it was in.
    pub(crate) fn close_prompt(&mut self) -> Mode {
        self.prompt.reset();
        std::mem::take(&mut self.mode)
    }

    pub fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            level,
            set_at: Instant::now(),
        });
    }

    /// Drops the status once it has been visible for `status_lifetime`.
    /// Returns true if something was cleared.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        let expired = self
            .status
            .as_ref()
            .is_some_and(|s| now.saturating_duration_since(s.set_at) >= self.status_lifetime);
        if expired {
            self.status = None;
        }
        expired
    }

    /// Replaces the entries. The cursor returns to the top for a new
    /// directory and is clamped for a refresh of the same one.
    pub fn apply_listing(&mut self, listing: Listing) {
        let same_dir = self.dir.as_ref() == Some(&listing.dir);
        self.dir = Some(listing.dir);
        self.entries = listing.entries;
        if !same_dir {
            self.cursor = 0;
        }
        self.clamp_cursor();
    }

    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
    }

    pub(crate) fn cursor_up(&mut self, by: usize) {
        self.cursor = self.cursor.saturating_sub(by);
    }

    pub(crate) fn cursor_down(&mut self, by: usize) {
        self.cursor = self.cursor.saturating_add(by);
        self.clamp_cursor();
    }

    pub(crate) fn cursor_top(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn cursor_bottom(&mut self) {
        self.cursor = self.entries.len().saturating_sub(1);
    }
}
