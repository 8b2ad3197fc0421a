//! Media items and per-kind display dispatch
//!
//! A media item's kind is decided by matching its path against the configured
//! glob patterns, video patterns first. Each kind maps to a display command
//! template and a table of control bytes.

use crate::error::{Error, Result};
use crate::playback::Command;
use kiosk_common::config::{MediaKindSettings, ShortcutConfig};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A playable file, identified by its path
///
/// `.` components are dropped on construction, so `./videos/a.mp4` and
/// `videos/a.mp4` name the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItem(PathBuf);

impl MediaItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(without_cur_dir(path.into()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// String form used for playlist ordering and JSON rendering
    pub fn to_path_string(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }

    /// Whether the file still exists on disk
    pub fn exists(&self) -> bool {
        self.0.is_file()
    }
}

impl fmt::Display for MediaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for MediaItem {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for MediaItem {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for MediaItem {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for MediaItem {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

fn without_cur_dir(path: PathBuf) -> PathBuf {
    if !path.components().any(|c| c == Component::CurDir) {
        return path;
    }
    let stripped: PathBuf = path
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    if stripped.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        stripped
    }
}

/// Closed set of media kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Image,
    Unknown,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Image => write!(f, "image"),
            MediaKind::Unknown => write!(f, "unknown"),
        }
    }
}

// ========================================
// Glob patterns
// ========================================

/// Shell-style glob matched against the trailing components of a path
///
/// Supports `*`, `?` and `[...]` / `[!...]` classes within a component.
/// `*.mp4` matches `videos/a.mp4`; `clips/*.mp4` matches `videos/clips/a.mp4`.
/// Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    components: Vec<Vec<char>>,
}

impl Pattern {
    pub fn new(raw: &str) -> Result<Self> {
        let components: Vec<Vec<char>> = raw
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| c.chars().collect())
            .collect();
        if components.is_empty() {
            return Err(Error::Config(format!("empty media pattern: {:?}", raw)));
        }
        Ok(Self {
            raw: raw.to_string(),
            components,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &Path) -> bool {
        let names: Vec<String> = path
            .iter()
            .map(|c| c.to_string_lossy().into_owned())
            .collect();
        if names.len() < self.components.len() {
            return false;
        }
        names
            .iter()
            .rev()
            .zip(self.components.iter().rev())
            .all(|(name, pattern)| {
                let text: Vec<char> = name.chars().collect();
                wildcard_match(pattern, &text)
            })
    }
}

/// Match one path component against one pattern component
fn wildcard_match(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    // Position of the last `*` and the text position it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() {
            if pattern[p] == '*' {
                backtrack = Some((p, t));
                p += 1;
                continue;
            }
            if let Some(next) = match_single(pattern, p, text[t]) {
                p = next;
                t += 1;
                continue;
            }
        }
        match backtrack {
            Some((star, absorbed)) => {
                p = star + 1;
                t = absorbed + 1;
                backtrack = Some((star, absorbed + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Match a single non-`*` token at `p`; returns the next pattern position
fn match_single(pattern: &[char], p: usize, c: char) -> Option<usize> {
    match pattern[p] {
        '?' => Some(p + 1),
        '[' => match match_class(pattern, p, c) {
            Some((true, next)) => Some(next),
            Some((false, _)) => None,
            // Unterminated class: `[` is a literal
            None => (c == '[').then_some(p + 1),
        },
        literal => (literal == c).then_some(p + 1),
    }
}

/// Evaluate a `[...]` class opening at `open`
///
/// Returns whether `c` matched and the position after the closing `]`, or
/// `None` if the class is not terminated.
fn match_class(pattern: &[char], open: usize, c: char) -> Option<(bool, usize)> {
    let mut i = open + 1;
    let negate = pattern.get(i) == Some(&'!');
    if negate {
        i += 1;
    }
    let first = i;
    let mut matched = false;

    while i < pattern.len() {
        if pattern[i] == ']' && i > first {
            return Some((matched != negate, i + 1));
        }
        let lo = pattern[i];
        match (pattern.get(i + 1), pattern.get(i + 2)) {
            (Some(&'-'), Some(&hi)) if hi != ']' => {
                matched |= lo <= c && c <= hi;
                i += 3;
            }
            _ => {
                matched |= lo == c;
                i += 1;
            }
        }
    }
    None
}

/// Ordered set of patterns; a path is included if any pattern matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let patterns = raw
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    pub fn extend(&mut self, other: &PatternSet) {
        self.patterns.extend(other.patterns.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}

// ========================================
// Display profiles
// ========================================

/// Display program argv; the media path is appended at launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::Config("display command must not be empty".to_string()))?;
        if program.trim().is_empty() {
            return Err(Error::Config("display program must not be blank".to_string()));
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Control bytes understood by a display program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shortcuts {
    pub play_pause: Option<u8>,
    pub kill: Option<u8>,
}

impl Shortcuts {
    pub fn from_config(config: &ShortcutConfig) -> Result<Self> {
        Ok(Self {
            play_pause: control_byte("play_pause", config.play_pause.as_deref())?,
            kill: control_byte("kill", config.kill.as_deref())?,
        })
    }

    /// Control byte for a command, if this kind has one
    pub fn byte_for(&self, command: Command) -> Option<u8> {
        match command {
            Command::Kill => self.kill,
            Command::TogglePlayPause => self.play_pause,
        }
    }
}

fn control_byte(name: &str, value: Option<&str>) -> Result<Option<u8>> {
    match value {
        None => Ok(None),
        Some(s) if s.len() == 1 => Ok(Some(s.as_bytes()[0])),
        Some(s) => Err(Error::Config(format!(
            "shortcut {} must be a single ASCII character, got {:?}",
            name, s
        ))),
    }
}

/// Everything needed to display one kind of media
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaProfile {
    pub kind: MediaKind,
    pub patterns: PatternSet,
    pub command: CommandTemplate,
    pub shortcuts: Shortcuts,
}

impl MediaProfile {
    pub fn from_settings(kind: MediaKind, settings: &MediaKindSettings) -> Result<Self> {
        Ok(Self {
            kind,
            patterns: PatternSet::new(&settings.patterns)?,
            command: CommandTemplate::new(&settings.command)?,
            shortcuts: Shortcuts::from_config(&settings.shortcuts)?,
        })
    }
}

/// Dispatch table from media kind to display profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaProfiles {
    video: MediaProfile,
    image: MediaProfile,
}

impl MediaProfiles {
    pub fn new(video: MediaProfile, image: MediaProfile) -> Self {
        Self { video, image }
    }

    pub fn from_settings(video: &MediaKindSettings, image: &MediaKindSettings) -> Result<Self> {
        Ok(Self::new(
            MediaProfile::from_settings(MediaKind::Video, video)?,
            MediaProfile::from_settings(MediaKind::Image, image)?,
        ))
    }

    /// Kind of a path; video patterns are tested before image patterns
    pub fn kind_of(&self, path: &Path) -> MediaKind {
        if self.video.patterns.matches(path) {
            MediaKind::Video
        } else if self.image.patterns.matches(path) {
            MediaKind::Image
        } else {
            MediaKind::Unknown
        }
    }

    pub fn profile(&self, kind: MediaKind) -> Option<&MediaProfile> {
        match kind {
            MediaKind::Video => Some(&self.video),
            MediaKind::Image => Some(&self.image),
            MediaKind::Unknown => None,
        }
    }

    /// Profile used to display `item`
    pub fn profile_for(&self, item: &MediaItem) -> Result<&MediaProfile> {
        self.profile(self.kind_of(item.path()))
            .ok_or_else(|| Error::UnsupportedMedia(item.path().to_path_buf()))
    }

    /// Union of all kinds' patterns, video first
    pub fn playlist_patterns(&self) -> PatternSet {
        let mut patterns = self.video.patterns.clone();
        patterns.extend(&self.image.patterns);
        patterns
    }
}
