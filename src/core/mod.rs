//! # Core File Tree Logic
//!
//! The file-tree bubble's state machine. It knows nothing about any specific
//! UI technology and never touches the disk itself.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • FileTree (state)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Command (effects)    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │     fs     │
//!     │  Adapter   │  ── runs commands on ──▶ │  helper    │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `FileTree` struct and its input `Mode`
//! - [`action`]: The `Action` enum and `update()`
//! - [`command`]: The `Command` enum and `run_command()`
//! - [`prompt`]: Single-line text buffer for prompts
//! - [`config`]: `~/.teacup/config.toml` loading and resolution

pub mod action;
pub mod command;
pub mod config;
pub mod prompt;
pub mod state;
