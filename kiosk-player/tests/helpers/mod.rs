//! Shared fixtures for kiosk-player integration tests
//!
//! The display program is a small `sh` script that appends one line per
//! launch (`start <path>`), one line per control byte (`byte [<c>] <path>`)
//! and one line per SIGTERM (`term <path>`) to a log file, and quits on `q`
//! or end of input. SIGTERM is recorded but does not interrupt the read, so
//! a quit byte written before termination is always logged.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use kiosk_common::config::{MediaKindSettings, ShortcutConfig};
use kiosk_player::media::{MediaItem, MediaProfiles};
use kiosk_player::playback::SupervisorOptions;
use tempfile::TempDir;

/// Upper bound for every polling wait
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Temporary media directory, default item and display log
pub struct Fixture {
    pub dir: TempDir,
    pub media_dir: PathBuf,
    pub default_item: MediaItem,
    pub log: PathBuf,
}

impl Fixture {
    /// Media directory holding `files`, plus a default image outside it
    pub fn new(files: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let media_dir = dir.path().join("media");
        std::fs::create_dir(&media_dir).unwrap();
        for name in files {
            std::fs::write(media_dir.join(name), b"media").unwrap();
        }

        let default_path = dir.path().join("logo.png");
        std::fs::write(&default_path, b"logo").unwrap();

        let log = dir.path().join("display.log");
        Self {
            dir,
            media_dir,
            default_item: MediaItem::new(default_path),
            log,
        }
    }

    pub fn item(&self, name: &str) -> MediaItem {
        MediaItem::new(self.media_dir.join(name))
    }

    /// Profiles whose display program is the logging script
    pub fn profiles(&self) -> MediaProfiles {
        self.profiles_with_script(&logging_script(&self.log))
    }

    /// Profiles whose display program is `script` run by `sh -c`
    pub fn profiles_with_script(&self, script: &str) -> MediaProfiles {
        let command = vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ];
        let video = MediaKindSettings {
            patterns: vec!["*.mp4".to_string(), "*.mkv".to_string()],
            command: command.clone(),
            shortcuts: ShortcutConfig {
                play_pause: Some(" ".to_string()),
                kill: Some("q".to_string()),
            },
        };
        let image = MediaKindSettings {
            patterns: vec!["*.png".to_string()],
            command,
            shortcuts: ShortcutConfig {
                play_pause: None,
                kill: Some("q".to_string()),
            },
        };
        MediaProfiles::from_settings(&video, &image).unwrap()
    }

    pub fn options(&self) -> SupervisorOptions {
        SupervisorOptions {
            profiles: self.profiles(),
            default_item: self.default_item.clone(),
            initial_item: None,
            respawn_delay: Duration::from_millis(50),
        }
    }

    /// Lines written by the display script so far
    pub fn log_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Number of launches of `item`
    pub fn starts_of(&self, item: &MediaItem) -> usize {
        let line = format!("start {}", item);
        self.log_lines().iter().filter(|l| **l == line).count()
    }

    /// Number of control bytes `c` received by any process
    pub fn bytes_of(&self, c: char) -> usize {
        let prefix = format!("byte [{}] ", c);
        self.log_lines().iter().filter(|l| l.starts_with(&prefix)).count()
    }

    /// Number of control bytes `c` received by processes showing `item`
    pub fn bytes_sent_to(&self, item: &MediaItem, c: char) -> usize {
        let line = format!("byte [{}] {}", c, item);
        self.log_lines().iter().filter(|l| **l == line).count()
    }

    /// Number of SIGTERMs received by processes showing `item`
    pub fn terms_of(&self, item: &MediaItem) -> usize {
        let line = format!("term {}", item);
        self.log_lines().iter().filter(|l| **l == line).count()
    }

    /// Wait until `item` has been launched at least `count` times
    pub async fn wait_for_starts(&self, item: &MediaItem, count: usize) {
        wait_until(|| self.starts_of(item) >= count).await;
    }
}

/// Script that logs launches and control bytes to `log`
pub fn logging_script(log: &Path) -> String {
    format!(
        r#"trap 'echo "term $1" >> '"'{log}'"'' TERM
echo "start $1" >> '{log}'
while :; do
  c=$(dd bs=1 count=1 2>/dev/null)
  [ -z "$c" ] && exit 0
  echo "byte [$c] $1" >> '{log}'
  [ "$c" = q ] && exit 0
done"#,
        log = log.display()
    )
}

/// Script that ignores its input and exits only on SIGTERM, logging both
pub fn terminate_only_script(log: &Path) -> String {
    format!(
        r#"trap 'echo "term $1" >> '"'{log}'"'; exit 0' TERM
echo "start $1" >> '{log}'
while :; do sleep 0.05; done"#,
        log = log.display()
    )
}

/// Poll `condition` until it holds; panics after [`WAIT_TIMEOUT`]
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while !condition() {
        if Instant::now() > deadline {
            panic!("condition not reached within {:?}", WAIT_TIMEOUT);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
