//! Bootstrap configuration loading
//!
//! Configuration is resolved in priority order:
//! 1. Command-line arguments / environment (applied by the service binary)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! A missing config file is not an error: the service logs a warning and
//! starts with compiled defaults. A config file that was asked for explicitly
//! (`--config` or `KIOSK_CONFIG`) must exist and parse.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "KIOSK_CONFIG";

/// Raw contents of the TOML config file
///
/// Every field is optional; unset fields fall back to [`CompiledDefaults`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TomlConfig {
    /// Address the HTTP server binds to
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Directory enumerated for the playlist
    #[serde(default)]
    pub media_dir: Option<PathBuf>,

    /// Item shown when nothing is selected (logo / blank screen)
    #[serde(default)]
    pub default_file: Option<PathBuf>,

    /// Item selected at startup instead of the default item
    #[serde(default)]
    pub initial_file: Option<PathBuf>,

    /// Directory of static web UI assets served at `/`
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Delay before relaunching a display process that exited with failure
    #[serde(default)]
    pub respawn_delay_ms: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub video: MediaKindConfig,

    #[serde(default)]
    pub image: MediaKindConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Per-kind display settings as written in the config file
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MediaKindConfig {
    /// File name glob patterns (`*.mp4`)
    #[serde(default)]
    pub patterns: Option<Vec<String>>,

    /// Display program argv; the media path is appended as the last argument
    #[serde(default)]
    pub command: Option<Vec<String>>,

    #[serde(default)]
    pub shortcuts: Option<ShortcutConfig>,
}

/// Control characters understood by a display program
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ShortcutConfig {
    /// Toggles pause/resume
    #[serde(default)]
    pub play_pause: Option<String>,

    /// Asks the program to quit
    #[serde(default)]
    pub kill: Option<String>,
}

/// Fully resolved per-kind display settings
#[derive(Debug, Clone, PartialEq)]
pub struct MediaKindSettings {
    pub patterns: Vec<String>,
    pub command: Vec<String>,
    pub shortcuts: ShortcutConfig,
}

impl MediaKindConfig {
    /// Overlay the file's values on top of `defaults`
    pub fn resolve(&self, defaults: MediaKindSettings) -> MediaKindSettings {
        MediaKindSettings {
            patterns: self.patterns.clone().unwrap_or(defaults.patterns),
            command: self.command.clone().unwrap_or(defaults.command),
            shortcuts: self.shortcuts.clone().unwrap_or(defaults.shortcuts),
        }
    }
}

/// Compiled default values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub media_dir: PathBuf,
    pub default_file: PathBuf,
    pub respawn_delay_ms: u64,
    pub log_level: String,
    pub video: MediaKindSettings,
    pub image: MediaKindSettings,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            media_dir: PathBuf::from("videos/"),
            default_file: PathBuf::from("./assets/logo.png"),
            respawn_delay_ms: 500,
            log_level: default_log_level(),
            video: MediaKindSettings {
                patterns: strings(&["*.avi", "*.m4v", "*.mkv", "*.mov", "*.mp4"]),
                command: strings(&["omxplayer", "--hw", "--loop", "--no-osd"]),
                shortcuts: ShortcutConfig {
                    play_pause: Some(" ".to_string()),
                    kill: Some("q".to_string()),
                },
            },
            image: MediaKindSettings {
                patterns: strings(&["*.gif", "*.jpeg", "*.jpg", "*.png", "*.tif", "*.tiff"]),
                command: strings(&["fim", "--quiet", "--autozoom", "-T", "1"]),
                shortcuts: ShortcutConfig {
                    play_pause: None,
                    kill: Some("q".to_string()),
                },
            },
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl TomlConfig {
    /// Parse config file contents
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Locates and loads the TOML config file
///
/// Search order: explicit path, `KIOSK_CONFIG`, `~/.config/kiosk/config.toml`,
/// `/etc/kiosk/config.toml`.
#[derive(Debug, Clone, Default)]
pub struct ConfigLocator {
    explicit: Option<PathBuf>,
}

impl ConfigLocator {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// Path explicitly requested by the operator, if any
    fn requested_path(&self) -> Option<PathBuf> {
        self.explicit
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
    }

    /// Well-known config file locations, most specific first
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("kiosk").join("config.toml"));
        }
        if cfg!(unix) {
            paths.push(PathBuf::from("/etc/kiosk/config.toml"));
        }
        paths
    }

    /// Load the config file, falling back to an empty config when none exists
    pub fn load(&self) -> Result<TomlConfig> {
        if let Some(path) = self.requested_path() {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            info!("Loading config from {}", path.display());
            return TomlConfig::load(&path);
        }

        for path in Self::search_paths() {
            if path.exists() {
                info!("Loading config from {}", path.display());
                return TomlConfig::load(&path);
            }
        }

        warn!("No config file found, using compiled defaults");
        Ok(TomlConfig::default())
    }
}
