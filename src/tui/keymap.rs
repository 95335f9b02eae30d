//! # Key Map
//!
//! Configurable key bindings. A binding is written as a string such as
//! `"enter"`, `"ctrl+c"`, `"shift+tab"` or a single character like `"C"`.
//!
//! Character bindings ignore the shift modifier because the character
//! already carries the case: terminals report `Shift+c` as `Char('C')` with
//! `SHIFT` set, and some omit the flag entirely.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;

use crate::core::config::KeysConfig;
use crate::tui::components::help::HelpEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    OpenDirectory,
    ParentDirectory,
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Copy,
    Zip,
    Unzip,
    CreateFile,
    CreateDirectory,
    Delete,
    ToggleHidden,
    Home,
    CopyPath,
    Escape,
    Submit,
    SwitchPane,
    ToggleHelp,
    Quit,
}

impl KeyAction {
    pub const ALL: [KeyAction; 22] = [
        KeyAction::OpenDirectory,
        KeyAction::ParentDirectory,
        KeyAction::Up,
        KeyAction::Down,
        KeyAction::PageUp,
        KeyAction::PageDown,
        KeyAction::Top,
        KeyAction::Bottom,
        KeyAction::Copy,
        KeyAction::Zip,
        KeyAction::Unzip,
        KeyAction::CreateFile,
        KeyAction::CreateDirectory,
        KeyAction::Delete,
        KeyAction::ToggleHidden,
        KeyAction::Home,
        KeyAction::CopyPath,
        KeyAction::Escape,
        KeyAction::Submit,
        KeyAction::SwitchPane,
        KeyAction::ToggleHelp,
        KeyAction::Quit,
    ];

    pub fn description(self) -> &'static str {
        match self {
            KeyAction::OpenDirectory => "Open directory",
            KeyAction::ParentDirectory => "Go to parent directory",
            KeyAction::Up => "Move up",
            KeyAction::Down => "Move down",
            KeyAction::PageUp => "Page up",
            KeyAction::PageDown => "Page down",
            KeyAction::Top => "Go to top",
            KeyAction::Bottom => "Go to bottom",
            KeyAction::Copy => "Copy selected item",
            KeyAction::Zip => "Zip selected item",
            KeyAction::Unzip => "Unzip selected item",
            KeyAction::CreateFile => "Create new file",
            KeyAction::CreateDirectory => "Create new directory",
            KeyAction::Delete => "Delete selected item",
            KeyAction::ToggleHidden => "Toggle hidden files",
            KeyAction::Home => "Go to home directory",
            KeyAction::CopyPath => "Copy path to clipboard",
            KeyAction::Escape => "Cancel prompt",
            KeyAction::Submit => "Submit prompt",
            KeyAction::SwitchPane => "Switch pane",
            KeyAction::ToggleHelp => "Toggle help",
            KeyAction::Quit => "Quit",
        }
    }

    fn defaults(self) -> &'static [&'static str] {
        match self {
            KeyAction::OpenDirectory => &["enter", "l", "right"],
            KeyAction::ParentDirectory => &["h", "left", "backspace"],
            KeyAction::Up => &["k", "up"],
            KeyAction::Down => &["j", "down"],
            KeyAction::PageUp => &["pgup"],
            KeyAction::PageDown => &["pgdown"],
            KeyAction::Top => &["g", "home"],
            KeyAction::Bottom => &["G", "end"],
            KeyAction::Copy => &["C"],
            KeyAction::Zip => &["Z"],
            KeyAction::Unzip => &["U"],
            KeyAction::CreateFile => &["N"],
            KeyAction::CreateDirectory => &["M"],
            KeyAction::Delete => &["X"],
            KeyAction::ToggleHidden => &["H"],
            KeyAction::Home => &["~"],
            KeyAction::CopyPath => &["Y"],
            KeyAction::Escape => &["esc"],
            KeyAction::Submit => &["enter"],
            KeyAction::SwitchPane => &["tab"],
            KeyAction::ToggleHelp => &["?"],
            KeyAction::Quit => &["q", "ctrl+c"],
        }
    }

    fn configured(self, keys: &KeysConfig) -> Option<&Vec<String>> {
        match self {
            KeyAction::OpenDirectory => keys.open_directory.as_ref(),
            KeyAction::ParentDirectory => keys.parent_directory.as_ref(),
            KeyAction::Up => keys.up.as_ref(),
            KeyAction::Down => keys.down.as_ref(),
            KeyAction::PageUp => keys.page_up.as_ref(),
            KeyAction::PageDown => keys.page_down.as_ref(),
            KeyAction::Top => keys.top.as_ref(),
            KeyAction::Bottom => keys.bottom.as_ref(),
            KeyAction::Copy => keys.copy.as_ref(),
            KeyAction::Zip => keys.zip.as_ref(),
            KeyAction::Unzip => keys.unzip.as_ref(),
            KeyAction::CreateFile => keys.create_file.as_ref(),
            KeyAction::CreateDirectory => keys.create_directory.as_ref(),
            KeyAction::Delete => keys.delete.as_ref(),
            KeyAction::ToggleHidden => keys.toggle_hidden.as_ref(),
            KeyAction::Home => keys.home.as_ref(),
            KeyAction::CopyPath => keys.copy_path.as_ref(),
            KeyAction::Escape => keys.escape.as_ref(),
            KeyAction::Submit => keys.submit.as_ref(),
            KeyAction::SwitchPane => keys.switch_pane.as_ref(),
            KeyAction::ToggleHelp => keys.toggle_help.as_ref(),
            KeyAction::Quit => keys.quit.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError(pub String);

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid key binding: {:?}", self.0)
    }
}

impl std::error::Error for KeyParseError {}

/// Modifiers that take part in matching.
const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && normalized(self.code, self.modifiers) == normalized(key.code, key.modifiers)
    }

    /// Short label for the help screen, e.g. `ctrl+c`, `enter`, `C`.
    pub fn label(&self) -> String {
        let mut label = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            label.push_str("ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            label.push_str("alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) && !matches!(self.code, KeyCode::Char(_)) {
            label.push_str("shift+");
        }
        let key = match self.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::BackTab => "backtab".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Delete => "delete".to_string(),
            KeyCode::Insert => "insert".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::PageUp => "pgup".to_string(),
            KeyCode::PageDown => "pgdown".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::F(n) => format!("f{n}"),
            other => format!("{other:?}").to_lowercase(),
        };
        label.push_str(&key);
        label
    }
}

fn normalized(code: KeyCode, modifiers: KeyModifiers) -> KeyModifiers {
    let modifiers = modifiers & MODIFIER_MASK;
    if matches!(code, KeyCode::Char(_)) {
        modifiers - KeyModifiers::SHIFT
    } else {
        modifiers
    }
}

impl FromStr for KeyBinding {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || KeyParseError(s.to_string());
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s.trim();
        if rest.is_empty() {
            return Err(err());
        }

        // Peel modifier prefixes; a bare "+" is the plus key.
        while let Some((prefix, tail)) = rest.split_once('+') {
            if tail.is_empty() {
                break;
            }
            match prefix.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" | "meta" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return Err(err()),
            }
            rest = tail;
        }

        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match rest.to_ascii_lowercase().as_str() {
                "enter" | "return" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "tab" => KeyCode::Tab,
                "backtab" => KeyCode::BackTab,
                "backspace" => KeyCode::Backspace,
                "delete" | "del" => KeyCode::Delete,
                "insert" => KeyCode::Insert,
                "space" => KeyCode::Char(' '),
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "pgup" | "pageup" => KeyCode::PageUp,
                "pgdown" | "pagedown" => KeyCode::PageDown,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                name => match name.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    Some(n @ 1..=12) => KeyCode::F(n),
                    _ => return Err(err()),
                },
            },
        };

        Ok(KeyBinding { code, modifiers })
    }
}

pub struct KeyMap {
    bindings: Vec<(KeyAction, Vec<KeyBinding>)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_config(&KeysConfig::default())
    }
}

impl KeyMap {
    /// Builds the key map, replacing defaults with any configured bindings.
    /// Unparseable bindings are skipped; an action left with none keeps its
    /// defaults.
    pub fn from_config(keys: &KeysConfig) -> Self {
        let bindings = KeyAction::ALL
            .iter()
            .map(|&action| {
                let defaults = || parse_all(action, action.defaults().iter().copied());
                let parsed = match action.configured(keys) {
                    Some(list) => {
                        let parsed = parse_all(action, list.iter().map(String::as_str));
                        if parsed.is_empty() {
                            warn!("No usable bindings for {:?}, keeping defaults", action);
                            defaults()
                        } else {
                            parsed
                        }
                    }
                    None => defaults(),
                };
                (action, parsed)
            })
            .collect();
        Self { bindings }
    }

    pub fn bindings(&self, action: KeyAction) -> &[KeyBinding] {
        self.bindings
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, b)| b.as_slice())
            .unwrap_or(&[])
    }

    pub fn matches(&self, action: KeyAction, key: &KeyEvent) -> bool {
        self.bindings(action).iter().any(|b| b.matches(key))
    }

    /// First action (in declaration order) bound to `key` among `candidates`.
    pub fn lookup(&self, key: &KeyEvent, candidates: &[KeyAction]) -> Option<KeyAction> {
        candidates
            .iter()
            .copied()
            .find(|&action| self.matches(action, key))
    }

    /// One help row per action, keys joined with `/`.
    pub fn help_entries(&self) -> Vec<HelpEntry> {
        self.bindings
            .iter()
            .map(|(action, bindings)| HelpEntry {
                key: bindings
                    .iter()
                    .map(KeyBinding::label)
                    .collect::<Vec<_>>()
                    .join("/"),
                description: action.description().to_string(),
            })
            .collect()
    }
}

fn parse_all<'a>(action: KeyAction, texts: impl Iterator<Item = &'a str>) -> Vec<KeyBinding> {
    texts
        .filter_map(|text| match text.parse::<KeyBinding>() {
            Ok(binding) => Some(binding),
            Err(e) => {
                warn!("{} for {:?}", e, action);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(
            "enter".parse::<KeyBinding>().unwrap(),
            KeyBinding { code: KeyCode::Enter, modifiers: KeyModifiers::NONE }
        );
        assert_eq!("PgDown".parse::<KeyBinding>().unwrap().code, KeyCode::PageDown);
        assert_eq!("f5".parse::<KeyBinding>().unwrap().code, KeyCode::F(5));
        assert_eq!("space".parse::<KeyBinding>().unwrap().code, KeyCode::Char(' '));
        assert_eq!("+".parse::<KeyBinding>().unwrap().code, KeyCode::Char('+'));
    }

    #[test]
    fn test_parse_modifiers() {
        let binding: KeyBinding = "ctrl+alt+x".parse().unwrap();
        assert_eq!(binding.code, KeyCode::Char('x'));
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL | KeyModifiers::ALT);

        let binding: KeyBinding = "shift+tab".parse().unwrap();
        assert_eq!(binding.modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "hyper+x", "f13", "notakey", "ctrl+"] {
            assert!(bad.parse::<KeyBinding>().is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_char_binding_ignores_shift() {
        let binding: KeyBinding = "C".parse().unwrap();
        assert!(binding.matches(&key(KeyCode::Char('C'), KeyModifiers::SHIFT)));
        assert!(binding.matches(&key(KeyCode::Char('C'), KeyModifiers::NONE)));
        assert!(!binding.matches(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!binding.matches(&key(KeyCode::Char('C'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_ctrl_binding_requires_ctrl() {
        let binding: KeyBinding = "ctrl+c".parse().unwrap();
        assert!(binding.matches(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_default_map() {
        let keymap = KeyMap::default();
        assert!(keymap.matches(KeyAction::Copy, &key(KeyCode::Char('C'), KeyModifiers::SHIFT)));
        assert!(keymap.matches(KeyAction::Submit, &key(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(keymap.matches(KeyAction::OpenDirectory, &key(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(keymap.matches(KeyAction::Quit, &key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(keymap.matches(KeyAction::Home, &key(KeyCode::Char('~'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_config_overrides_and_fallback() {
        let keys = KeysConfig {
            copy: Some(vec!["ctrl+y".to_string(), "bogus-key".to_string()]),
            zip: Some(vec!["still-bogus".to_string()]),
            ..Default::default()
        };
        let keymap = KeyMap::from_config(&keys);

        assert!(keymap.matches(KeyAction::Copy, &key(KeyCode::Char('y'), KeyModifiers::CONTROL)));
        assert!(!keymap.matches(KeyAction::Copy, &key(KeyCode::Char('C'), KeyModifiers::SHIFT)));
        // Nothing usable configured for zip: defaults stay
        assert!(keymap.matches(KeyAction::Zip, &key(KeyCode::Char('Z'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_lookup_respects_candidate_order() {
        let keymap = KeyMap::default();
        let enter = key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(
            keymap.lookup(&enter, &[KeyAction::Submit, KeyAction::OpenDirectory]),
            Some(KeyAction::Submit)
        );
        assert_eq!(
            keymap.lookup(&enter, &[KeyAction::Escape]),
            None
        );
    }

    #[test]
    fn test_help_entries_cover_every_action() {
        let entries = KeyMap::default().help_entries();
        assert_eq!(entries.len(), KeyAction::ALL.len());
        let quit = entries.iter().find(|e| e.description == "Quit").unwrap();
        assert_eq!(quit.key, "q/ctrl+c");
        let open = entries.iter().find(|e| e.description == "Open directory").unwrap();
        assert_eq!(open.key, "enter/l/→");
    }
}
