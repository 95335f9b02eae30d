//! # TUI Components
//!
//! The two panes of the interface.
//!
//! ## Component Architecture
//!
//! Both components follow the persistent state + transient wrapper pattern:
//! state lives in `TuiState` across frames, and a short-lived wrapper borrows
//! it for one render together with its props.
//!
//! - `FileTreeView`: directory listing, prompt and status line over a `FileTree`
//! - `Help`: scrollable key reference over a `HelpState`
//!
//! ### Props-Based Data Flow
//!
//! Border color and borderless mode arrive as a `PaneStyle` prop chosen by
//! the caller from focus; components never read global state.
//!
//! **Example:**
//! ```rust,ignore
//! let style = tui.theme.pane(focused, tui.borderless);
//! Help::new(&mut tui.help, style).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs        (this file)
//! ├── file_tree.rs  (Listing pane)
//! └── help.rs       (Help pane)
//! ```

pub mod file_tree;
pub mod help;

pub use file_tree::FileTreeView;
pub use help::{Help, HelpEntry, HelpScroll, HelpState, TitleColor};
