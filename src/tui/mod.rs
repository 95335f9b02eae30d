//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the panes,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Data Flow
//!
//! ```text
//! crossterm event ─► keymap ─► Action ─► update(&mut FileTree) ─► Vec<Command>
//!                                                                    │
//!     mpsc::Receiver<Action> ◄── command worker (run_command, in order) ◄┘
//! ```
//!
//! ## Redraw Strategy
//!
//! The loop sleeps up to 100ms waiting for input and only redraws when an
//! event arrived, a background action was applied, or the status line
//! expired.

mod component;
pub mod components;
mod event;
pub mod keymap;
pub mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyModifiers};
use crossterm::execute;
use ratatui::widgets::ListState;

use crate::core::action::{Action, update};
use crate::core::command::{Command, run_command};
use crate::core::config::ResolvedConfig;
use crate::core::state::FileTree;
use crate::fs::{Clipboard, FileSystem, LocalFs, SystemClipboard};
use crate::tui::components::HelpState;
use crate::tui::event::{TuiEvent, file_tree_action, help_scroll, poll_event_immediate, poll_event_timeout};
use crate::tui::keymap::{KeyAction, KeyMap};
use crate::tui::theme::Theme;

const HELP_TITLE: &str = "Teacup Help";
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Which pane receives key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    FileTree,
    Help,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub file_tree: FileTree,
    pub list_state: ListState,
    pub help: HelpState,
    // Layout
    pub focus: Focus,
    pub show_help: bool,
    pub borderless: bool,
    pub keymap: KeyMap,
    pub theme: Theme,
}

impl TuiState {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let keymap = KeyMap::from_config(&config.keys);
        let theme = Theme::from_config(&config.theme);
        let help = HelpState::new(
            false,
            config.borderless,
            HELP_TITLE,
            theme.title,
            keymap.help_entries(),
        );
        Self {
            file_tree: FileTree::new(config.show_hidden, config.status_lifetime),
            list_state: ListState::default(),
            help,
            focus: Focus::FileTree,
            show_help: false,
            borderless: config.borderless,
            keymap,
            theme,
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help.go_to_top();
        } else {
            self.set_focus(Focus::FileTree);
        }
    }

    /// Moves focus to the other pane. Only possible while help is shown.
    pub fn switch_pane(&mut self) {
        if !self.show_help {
            return;
        }
        let next = match self.focus {
            Focus::FileTree => Focus::Help,
            Focus::Help => Focus::FileTree,
        };
        self.set_focus(next);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.help.set_active(focus == Focus::Help);
    }
}

/// What the loop should do after one terminal event.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Continue,
    Quit,
}

/// Routes one terminal event, returning the commands to spawn.
fn handle_event(tui: &mut TuiState, event: &TuiEvent) -> (Outcome, Vec<Command>) {
    let prompt_active = tui.file_tree.prompt_active();
    // While typing into the file tree prompt, plain keys are text
    let typing = prompt_active && tui.focus == Focus::FileTree;

    if let TuiEvent::Key(key) = event {
        if tui.keymap.matches(KeyAction::Quit, key)
            && (!typing || key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return (Outcome::Quit, Vec::new());
        }
        if tui.keymap.matches(KeyAction::SwitchPane, key) {
            tui.switch_pane();
            return (Outcome::Continue, Vec::new());
        }
        if !typing && tui.keymap.matches(KeyAction::ToggleHelp, key) {
            tui.toggle_help();
            return (Outcome::Continue, Vec::new());
        }
    }

    match tui.focus {
        Focus::Help => {
            if let Some(scroll) = help_scroll(event, &tui.keymap) {
                tui.help.scroll(scroll);
            }
            (Outcome::Continue, Vec::new())
        }
        Focus::FileTree => {
            let commands = file_tree_action(event, &tui.keymap, prompt_active)
                .map(|action| {
                    debug!("File tree action: {:?}", action);
                    update(&mut tui.file_tree, action)
                })
                .unwrap_or_default();
            (Outcome::Continue, commands)
        }
    }
}

/// Builds the filesystem helper, starting in `start_dir` when it is a
/// usable directory and in the process directory otherwise.
fn build_fs(start_dir: Option<&std::path::Path>) -> std::io::Result<LocalFs> {
    match start_dir {
        Some(dir) if dir.is_dir() => Ok(LocalFs::new(dir.to_path_buf())),
        Some(dir) => {
            warn!(
                "Start directory {} is not a directory, using working directory",
                dir.display()
            );
            LocalFs::from_process_dir()
        }
        None => LocalFs::from_process_dir(),
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableBracketedPaste)?;
        info!("Terminal modes enabled (bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(build_fs(config.start_dir.as_deref())?);
    let clipboard: Arc<dyn Clipboard> = Arc::new(SystemClipboard);
    let mut tui = TuiState::from_config(&config);
    info!("Starting in {}", fs.current_dir().display());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let (commands, _worker) = spawn_worker(fs, clipboard, tx);

    submit(&commands, Command::refresh(tui.file_tree.show_hidden));

    let mut needs_redraw = true; // Force first frame

    let result = loop {
        if tui.file_tree.expire_status(Instant::now()) {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let first_event = match poll_event_timeout(POLL_TIMEOUT) {
            Ok(event) => event,
            Err(e) => break Err(e),
        };
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        let pending = std::iter::from_fn(|| poll_event_immediate().ok().flatten());
        for event in first_event.into_iter().chain(pending) {
            let (outcome, new_commands) = handle_event(&mut tui, &event);
            for command in new_commands {
                submit(&commands, command);
            }
            if outcome == Outcome::Quit {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            info!("Quit requested");
            break Ok(());
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            for command in update(&mut tui.file_tree, action) {
                submit(&commands, command);
            }
        }
    };

    // Closing the queue stops the worker after its current command
    drop(commands);
    ratatui::restore();
    result
}

/// Starts the command worker on the blocking pool.
///
/// Commands run one at a time in the order they were sent, so a listing
/// always resolves against the directory the previous command left behind.
/// The worker stops once the returned sender is dropped.
fn spawn_worker(
    fs: Arc<dyn FileSystem>,
    clipboard: Arc<dyn Clipboard>,
    tx: mpsc::Sender<Action>,
) -> (mpsc::Sender<Command>, tokio::task::JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel::<Command>();
    let handle = tokio::task::spawn_blocking(move || {
        info!("Command worker started");
        while let Ok(command) = command_rx.recv() {
            debug!("Running command: {:?}", command);
            for action in run_command(command, fs.as_ref(), clipboard.as_ref()) {
                if tx.send(action).is_err() {
                    warn!("Failed to send command result: receiver dropped");
                    return;
                }
            }
        }
        info!("Command worker stopped");
    });
    (command_tx, handle)
}

fn submit(commands: &mpsc::Sender<Command>, command: Command) {
    if commands.send(command).is_err() {
        warn!("Failed to queue command: worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::FsOp;
    use crate::core::state::Mode;
    use crate::fs::DirTarget;
    use crate::test_support::{FakeClipboard, FakeFs, listing};
    use std::path::PathBuf;
    use crossterm::event::{KeyCode, KeyEvent};

    fn test_config() -> ResolvedConfig {
        crate::core::config::resolve(&Default::default(), &Default::default())
    }

    fn key(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> TuiEvent {
        TuiEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn tui_with_entries() -> TuiState {
        let mut tui = TuiState::from_config(&test_config());
        tui.file_tree
            .apply_listing(listing("/work", &["a.txt", "b.txt", "c.txt"]));
        tui
    }

    #[test]
    fn test_q_quits_when_idle() {
        let mut tui = tui_with_entries();
        let (outcome, _) = handle_event(&mut tui, &key(KeyCode::Char('q')));
        assert_eq!(outcome, Outcome::Quit);
    }

    #[test]
    fn test_q_is_text_in_prompt_but_ctrl_c_quits() {
        let mut tui = tui_with_entries();
        handle_event(
            &mut tui,
            &TuiEvent::Key(KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT)),
        );
        assert_eq!(tui.file_tree.mode(), &Mode::CreateFile);

        let (outcome, _) = handle_event(&mut tui, &key(KeyCode::Char('q')));
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(tui.file_tree.prompt().value(), "q");

        let (outcome, _) = handle_event(&mut tui, &ctrl('c'));
        assert_eq!(outcome, Outcome::Quit);
    }

    #[test]
    fn test_help_toggle_and_focus_switching() {
        let mut tui = tui_with_entries();

        // Tab does nothing without the help pane
        handle_event(&mut tui, &key(KeyCode::Tab));
        assert_eq!(tui.focus, Focus::FileTree);

        handle_event(&mut tui, &key(KeyCode::Char('?')));
        assert!(tui.show_help);
        assert!(!tui.help.active);

        handle_event(&mut tui, &key(KeyCode::Tab));
        assert_eq!(tui.focus, Focus::Help);
        assert!(tui.help.active);

        // Navigation keys now go to the help pane, not the listing
        handle_event(&mut tui, &key(KeyCode::Down));
        assert_eq!(tui.file_tree.cursor, 0);

        // Hiding help returns focus to the file tree
        handle_event(&mut tui, &key(KeyCode::Char('?')));
        assert!(!tui.show_help);
        assert_eq!(tui.focus, Focus::FileTree);
        assert!(!tui.help.active);
    }

    #[test]
    fn test_file_tree_keys_produce_commands() {
        let mut tui = tui_with_entries();
        let (_, commands) = handle_event(&mut tui, &key(KeyCode::Char('j')));
        assert!(commands.is_empty());
        assert_eq!(tui.file_tree.cursor, 1);

        let (_, commands) = handle_event(
            &mut tui,
            &TuiEvent::Key(KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT)),
        );
        assert_eq!(commands, vec![Command::refresh(true)]);
    }

    #[test]
    fn test_help_entries_come_from_keymap() {
        let tui = TuiState::from_config(&test_config());
        assert_eq!(tui.help.title, HELP_TITLE);
        assert!(
            tui.help
                .entries
                .iter()
                .any(|e| e.key == "q/ctrl+c" && e.description == "Quit")
        );
    }

    #[tokio::test]
    async fn test_worker_sends_actions_back() {
        let fs: Arc<dyn FileSystem> = Arc::new(FakeFs::with_entries("/work", &["a.txt"]));
        let clipboard: Arc<dyn Clipboard> = Arc::new(FakeClipboard::default());
        let (tx, rx) = mpsc::channel();

        let (commands, worker) = spawn_worker(fs, clipboard, tx);
        submit(&commands, Command::refresh(false));
        drop(commands);
        worker.await.unwrap();

        match rx.try_recv().unwrap() {
            Action::ListingReady(listing) => {
                assert_eq!(listing.entries.len(), 1);
                assert_eq!(listing.entries[0].name, "a.txt");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_worker_runs_commands_in_submission_order() {
        let fake = Arc::new(FakeFs::with_entries("/work", &["a.txt"]));
        let fs: Arc<dyn FileSystem> = fake.clone();
        let clipboard: Arc<dyn Clipboard> = Arc::new(FakeClipboard::default());
        let (tx, rx) = mpsc::channel();

        let (commands, worker) = spawn_worker(fs, clipboard, tx);
        // An open followed immediately by a refresh and a create
        submit(
            &commands,
            Command::ListDirectory {
                target: DirTarget::Path(PathBuf::from("/work/sub")),
                show_hidden: false,
            },
        );
        submit(&commands, Command::refresh(false));
        submit(
            &commands,
            Command::mutate(FsOp::CreateFile("new.txt".to_string()), false),
        );
        drop(commands);
        worker.await.unwrap();

        assert_eq!(
            fake.calls(),
            vec![
                "list Path(\"/work/sub\") hidden=false".to_string(),
                "list Current hidden=false".to_string(),
                "create_file new.txt".to_string(),
                "list Current hidden=false".to_string(),
            ]
        );
        let dirs: Vec<PathBuf> = rx
            .try_iter()
            .filter_map(|action| match action {
                Action::ListingReady(listing) => Some(listing.dir),
                _ => None,
            })
            .collect();
        assert!(dirs.iter().all(|d| d == &PathBuf::from("/work/sub")));
        assert_eq!(dirs.len(), 3);
    }
}
