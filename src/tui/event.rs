use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::action::Action;
use crate::tui::components::help::HelpScroll;
use crate::tui::keymap::{KeyAction, KeyMap};

/// Terminal input, reduced to what the app reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Key(KeyEvent),
    Paste(String), // Bracketed paste
    Resize,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let translated = match event::read()? {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            Some(TuiEvent::Key(key_event))
        }
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    };
    Ok(translated)
}

/// Poll for an event without blocking.
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

/// Listing keys, in priority order. `enter` opens before anything else.
const LISTING_ACTIONS: [(KeyAction, Action); 17] = [
    (KeyAction::OpenDirectory, Action::OpenDirectory),
    (KeyAction::ParentDirectory, Action::ParentDirectory),
    (KeyAction::Up, Action::CursorUp),
    (KeyAction::Down, Action::CursorDown),
    (KeyAction::PageUp, Action::PageUp),
    (KeyAction::PageDown, Action::PageDown),
    (KeyAction::Top, Action::GoToTop),
    (KeyAction::Bottom, Action::GoToBottom),
    (KeyAction::Copy, Action::CopyItem),
    (KeyAction::Zip, Action::ZipItem),
    (KeyAction::Unzip, Action::UnzipItem),
    (KeyAction::CreateFile, Action::BeginCreateFile),
    (KeyAction::CreateDirectory, Action::BeginCreateDirectory),
    (KeyAction::Delete, Action::BeginDelete),
    (KeyAction::ToggleHidden, Action::ToggleHidden),
    (KeyAction::Home, Action::GoHome),
    (KeyAction::CopyPath, Action::CopyPath),
];

/// Translate an event for the file tree.
///
/// With a prompt open only escape/submit bindings and text editing keys
/// count, and every plain character is text, even one bound to an action.
pub fn file_tree_action(event: &TuiEvent, keymap: &KeyMap, prompt_active: bool) -> Option<Action> {
    let key = match event {
        TuiEvent::Key(key) => key,
        TuiEvent::Paste(text) if prompt_active => return Some(Action::Paste(text.clone())),
        _ => return None,
    };

    if prompt_active {
        if keymap.matches(KeyAction::Escape, key) {
            return Some(Action::Escape);
        }
        if keymap.matches(KeyAction::Submit, key) {
            return Some(Action::Submit);
        }
        return match key.code {
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Delete => Some(Action::DeleteChar),
            KeyCode::Left => Some(Action::PromptLeft),
            KeyCode::Right => Some(Action::PromptRight),
            KeyCode::Home => Some(Action::PromptHome),
            KeyCode::End => Some(Action::PromptEnd),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(Action::InputChar(c))
            }
            _ => None,
        };
    }

    LISTING_ACTIONS
        .iter()
        .find(|(binding, _)| keymap.matches(*binding, key))
        .map(|(_, action)| action.clone())
}

/// Translate an event for the help pane.
pub fn help_scroll(event: &TuiEvent, keymap: &KeyMap) -> Option<HelpScroll> {
    let TuiEvent::Key(key) = event else {
        return None;
    };
    match keymap.lookup(
        key,
        &[
            KeyAction::Up,
            KeyAction::Down,
            KeyAction::PageUp,
            KeyAction::PageDown,
            KeyAction::Top,
            KeyAction::Bottom,
        ],
    )? {
        KeyAction::Up => Some(HelpScroll::Up),
        KeyAction::Down => Some(HelpScroll::Down),
        KeyAction::PageUp => Some(HelpScroll::PageUp),
        KeyAction::PageDown => Some(HelpScroll::PageDown),
        KeyAction::Top => Some(HelpScroll::Top),
        KeyAction::Bottom => Some(HelpScroll::Bottom),
        _ => None,
    }
}
