//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.teacup/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Colors and key bindings are kept as strings here; the TUI layer parses
//! them, so this module stays free of terminal types.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::state::DEFAULT_STATUS_LIFETIME;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TeacupConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub start_dir: Option<String>,
    pub show_hidden: Option<bool>,
    pub borderless: Option<bool>,
    pub status_message_lifetime_ms: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ThemeConfig {
    pub active_border: Option<String>,
    pub inactive_border: Option<String>,
    pub title_foreground: Option<String>,
    pub title_background: Option<String>,
    pub selected: Option<String>,
    pub info: Option<String>,
    pub error: Option<String>,
}

/// Binding overrides, one list per action. `None` keeps the defaults.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct KeysConfig {
    pub open_directory: Option<Vec<String>>,
    pub parent_directory: Option<Vec<String>>,
    pub up: Option<Vec<String>>,
    pub down: Option<Vec<String>>,
    pub page_up: Option<Vec<String>>,
    pub page_down: Option<Vec<String>>,
    pub top: Option<Vec<String>>,
    pub bottom: Option<Vec<String>>,
    pub copy: Option<Vec<String>>,
    pub zip: Option<Vec<String>>,
    pub unzip: Option<Vec<String>>,
    pub create_file: Option<Vec<String>>,
    pub create_directory: Option<Vec<String>>,
    pub delete: Option<Vec<String>>,
    pub toggle_hidden: Option<Vec<String>>,
    pub home: Option<Vec<String>>,
    pub copy_path: Option<Vec<String>>,
    pub escape: Option<Vec<String>>,
    pub submit: Option<Vec<String>>,
    pub switch_pane: Option<Vec<String>>,
    pub toggle_help: Option<Vec<String>>,
    pub quit: Option<Vec<String>>,
}

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub start_dir: Option<PathBuf>,
    pub show_hidden: bool,
    pub borderless: bool,
    pub status_lifetime: Duration,
    pub theme: ThemeConfig,
    pub keys: KeysConfig,
}

/// Values given on the command line. `None`/`false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub start_dir: Option<PathBuf>,
    pub show_hidden: bool,
    pub borderless: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.teacup`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".teacup"))
}

/// Returns the path to `~/.teacup/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `path`, or from `~/.teacup/config.toml` when `None`.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `TeacupConfig::default()`. An explicitly given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<TeacupConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => {
                if !p.exists() {
                    info!("No config file found, generating default at {}", p.display());
                    generate_default_config(&p);
                    return Ok(TeacupConfig::default());
                }
                p
            }
            None => {
                warn!("Could not determine home directory, using default config");
                return Ok(TeacupConfig::default());
            }
        },
    };

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<TeacupConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# Teacup Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# start_dir = "~/projects"          # Or set TEACUP_START_DIR
# show_hidden = false               # Or set TEACUP_SHOW_HIDDEN=1
# borderless = false
# status_message_lifetime_ms = 3000

# [theme]                           # Color names ("cyan") or "#rrggbb"
# active_border = "#F25D94"
# inactive_border = "darkgray"
# title_foreground = "#FFFDF5"
# title_background = "#F25D94"
# selected = "#F25D94"
# info = "#04B575"
# error = "#FF4672"

# [keys]                            # Lists of bindings, e.g. ["ctrl+n", "N"]
# open_directory = ["enter", "l", "right"]
# parent_directory = ["h", "left", "backspace"]
# up = ["k", "up"]
# down = ["j", "down"]
# page_up = ["pgup"]
# page_down = ["pgdown"]
# top = ["g", "home"]
# bottom = ["G", "end"]
# copy = ["C"]
# zip = ["Z"]
# unzip = ["U"]
# create_file = ["N"]
# create_directory = ["M"]
# delete = ["X"]
# toggle_hidden = ["H"]
# home = ["~"]
# copy_path = ["Y"]
# escape = ["esc"]
# submit = ["enter"]
# switch_pane = ["tab"]
# toggle_help = ["?"]
# quit = ["q", "ctrl+c"]
"##;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TeacupConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Start directory: CLI → env → config → launch directory
    let start_dir = cli
        .start_dir
        .clone()
        .or_else(|| std::env::var("TEACUP_START_DIR").ok().map(|s| expand_tilde(&s)))
        .or_else(|| config.general.start_dir.as_deref().map(expand_tilde));

    // Hidden files: CLI flag can only turn it on
    let show_hidden = cli.show_hidden
        || std::env::var("TEACUP_SHOW_HIDDEN")
            .ok()
            .and_then(|v| parse_bool(&v))
            .or(config.general.show_hidden)
            .unwrap_or(false);

    let borderless = cli.borderless || config.general.borderless.unwrap_or(false);

    let status_lifetime = config
        .general
        .status_message_lifetime_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_STATUS_LIFETIME);

    ResolvedConfig {
        start_dir,
        show_hidden,
        borderless,
        status_lifetime,
        theme: config.theme.clone(),
        keys: config.keys.clone(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring unrecognised boolean {:?}", other);
            None
        }
    }
}

/// Expands a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
