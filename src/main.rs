use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use teacup::core::config::{self, CliOverrides, TeacupConfig};

#[derive(Parser)]
#[command(name = "teacup", about = "Terminal file tree navigator")]
struct Args {
    /// Directory to start in
    path: Option<PathBuf>,

    /// Show dotfiles
    #[arg(long)]
    show_hidden: bool,

    /// Draw panes without borders
    #[arg(long)]
    borderless: bool,

    /// Config file to use instead of ~/.teacup/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "debug", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("invalid log level '{s}' (expected off, error, warn, info, debug or trace)"))
}

/// Opens `~/.teacup/teacup.log`, falling back to `teacup.log` in the
/// working directory.
fn open_log_file() -> Option<File> {
    if let Some(dir) = config::config_dir()
        && std::fs::create_dir_all(&dir).is_ok()
        && let Ok(file) = File::create(dir.join("teacup.log"))
    {
        return Some(file);
    }
    File::create("teacup.log").ok()
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Some(log_file) = open_log_file() {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    log::info!("Teacup starting up");

    let file_config = config::load_config(args.config.as_deref()).unwrap_or_else(|e| {
        log::warn!("{}, using defaults", e);
        TeacupConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            start_dir: args.path,
            show_hidden: args.show_hidden,
            borderless: args.borderless,
        },
    );

    teacup::tui::run(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_defaults_to_debug() {
        let args = Args::try_parse_from(["teacup"]).unwrap();
        assert_eq!(args.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let args = Args::try_parse_from(["teacup", "--log-level", "WARN"]).unwrap();
        assert_eq!(args.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let err = Args::try_parse_from(["teacup", "--log-level", "loud"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("invalid log level 'loud'"));
    }
}
