//! kiosk-player configuration
//!
//! Merges command-line arguments (which also read `KIOSK_*` environment
//! variables), the TOML config file and compiled defaults, in that priority
//! order, and validates the result.

use crate::error::{Error, Result};
use crate::media::{MediaItem, MediaProfiles};
use crate::playback::SupervisorOptions;
use crate::playlist::Playlist;
use clap::Parser;
use kiosk_common::config::{CompiledDefaults, ConfigLocator, TomlConfig};
use std::path::PathBuf;
use std::time::Duration;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Command-line arguments for kiosk-player
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "kiosk-player")]
#[command(about = "Kiosk signage player: HTTP control of a looping display program")]
#[command(version)]
pub struct Args {
    /// Config file (TOML); also read from KIOSK_CONFIG
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "KIOSK_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "KIOSK_PORT")]
    pub port: Option<u16>,

    /// Directory containing the media files
    #[arg(short, long, env = "KIOSK_MEDIA_DIR")]
    pub media_dir: Option<PathBuf>,

    /// Item displayed when nothing is selected
    #[arg(long, env = "KIOSK_DEFAULT_FILE")]
    pub default_file: Option<PathBuf>,

    /// Item selected at startup
    #[arg(long)]
    pub initial_file: Option<PathBuf>,

    /// Directory of static web UI files
    #[arg(long, env = "KIOSK_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

/// Resolved player configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub media_dir: PathBuf,
    pub default_file: PathBuf,
    pub initial_file: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub respawn_delay: Duration,
    pub log_level: String,
    pub profiles: MediaProfiles,
}

impl Config {
    /// Locate the config file and resolve against `args`
    pub fn load(args: &Args) -> Result<Self> {
        let file = ConfigLocator::new(args.config.clone()).load()?;
        Self::resolve(args, file)
    }

    /// Merge arguments over file values over compiled defaults
    pub fn resolve(args: &Args, file: TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let log_level = file.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(Error::Config(format!(
                "unknown log level {:?} (expected one of {})",
                file.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        let profiles = MediaProfiles::from_settings(
            &file.video.resolve(defaults.video),
            &file.image.resolve(defaults.image),
        )?;

        Ok(Self {
            host: args.host.clone().or(file.host).unwrap_or(defaults.host),
            port: args.port.or(file.port).unwrap_or(defaults.port),
            media_dir: args
                .media_dir
                .clone()
                .or(file.media_dir)
                .unwrap_or(defaults.media_dir),
            default_file: args
                .default_file
                .clone()
                .or(file.default_file)
                .unwrap_or(defaults.default_file),
            initial_file: args.initial_file.clone().or(file.initial_file),
            static_dir: args.static_dir.clone().or(file.static_dir),
            respawn_delay: Duration::from_millis(
                file.respawn_delay_ms.unwrap_or(defaults.respawn_delay_ms),
            ),
            log_level,
            profiles,
        })
    }

    /// Address string for log output
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn playlist(&self) -> Playlist {
        Playlist::new(self.media_dir.clone(), self.profiles.playlist_patterns())
    }

    pub fn supervisor_options(&self) -> SupervisorOptions {
        SupervisorOptions {
            profiles: self.profiles.clone(),
            default_item: MediaItem::new(self.default_file.clone()),
            initial_item: self.initial_file.clone().map(MediaItem::new),
            respawn_delay: self.respawn_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults_without_file_or_args() {
        let config = Config::resolve(&Args::default(), TomlConfig::default()).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.media_dir, PathBuf::from("videos/"));
        assert_eq!(config.default_file, PathBuf::from("./assets/logo.png"));
        assert_eq!(config.respawn_delay, Duration::from_millis(500));
        assert_eq!(config.log_level, "info");
        assert!(config.initial_file.is_none());
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_args_override_file() {
        let file = TomlConfig::parse(
            r#"
            port = 9000
            host = "127.0.0.1"
            media_dir = "/srv/media"
            "#,
        )
        .unwrap();
        let args = Args {
            port: Some(7000),
            ..Args::default()
        };

        let config = Config::resolve(&args, file).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.media_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.bind_addr(), "127.0.0.1:7000");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let file = TomlConfig::parse("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(matches!(
            Config::resolve(&Args::default(), file),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_shortcut_rejected() {
        let file = TomlConfig::parse(
            r#"
            [video.shortcuts]
            kill = "quit"
            "#,
        )
        .unwrap();
        assert!(matches!(
            Config::resolve(&Args::default(), file),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_supervisor_options_and_playlist() {
        let args = Args {
            initial_file: Some(PathBuf::from("videos/intro.mp4")),
            ..Args::default()
        };
        let config = Config::resolve(&args, TomlConfig::default()).unwrap();

        let options = config.supervisor_options();
        assert_eq!(options.default_item, MediaItem::from("./assets/logo.png"));
        assert_eq!(options.initial_item, Some(MediaItem::from("videos/intro.mp4")));

        let playlist = config.playlist();
        assert_eq!(playlist.root(), Path::new("videos/"));
        assert!(playlist.is_included(Path::new("x.mkv")));
        assert!(playlist.is_included(Path::new("x.jpeg")));
    }
}
