//! Filesystem-backed playlist
//!
//! The playlist is never cached: every call walks the media directory again,
//! so it always reflects the current filesystem state. Two successive calls may
//! disagree if files were added or removed in between; an index obtained from
//! one call can be out of range (or name a different item) on the next.
//!
//! Callers that need several positional lookups to agree take a
//! [`PlaylistSnapshot`] once and work on that.

use crate::error::{Error, Result};
use crate::media::{MediaItem, PatternSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// View over the eligible media files below a root directory
#[derive(Debug, Clone)]
pub struct Playlist {
    root: PathBuf,
    patterns: PatternSet,
}

impl Playlist {
    pub fn new(root: impl Into<PathBuf>, patterns: PatternSet) -> Self {
        Self {
            root: root.into(),
            patterns,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a path matches the playlist patterns (no filesystem access)
    pub fn is_included(&self, path: &Path) -> bool {
        self.patterns.matches(path)
    }

    /// Walk the root and return matching files, ordered by path string
    pub fn entries(&self) -> Vec<MediaItem> {
        if !self.root.is_dir() {
            debug!("Media directory {} does not exist", self.root.display());
            return Vec::new();
        }

        let mut items: Vec<MediaItem> = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.path().is_file() && self.is_included(entry.path()))
            .map(|entry| MediaItem::from(entry.into_path()))
            .collect();

        items.sort_by_cached_key(MediaItem::to_path_string);
        items
    }

    /// Enumerate once for several consistent lookups
    pub fn snapshot(&self) -> PlaylistSnapshot {
        PlaylistSnapshot::new(self.entries())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index` in the current enumeration
    pub fn at(&self, index: usize) -> Result<MediaItem> {
        self.snapshot().at(index)
    }

    /// Position of `item` in the current enumeration
    pub fn index_of(&self, item: &MediaItem) -> Result<usize> {
        self.snapshot().index_of(item)
    }
}

/// One enumeration of a [`Playlist`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistSnapshot {
    items: Vec<MediaItem>,
}

impl PlaylistSnapshot {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn at(&self, index: usize) -> Result<MediaItem> {
        self.items.get(index).cloned().ok_or(Error::OutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len: self.items.len(),
        })
    }

    /// Like [`at`](Self::at) for indexes coming from clients; negatives are out of range
    pub fn at_signed(&self, index: i64) -> Result<MediaItem> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.items.get(i).cloned())
            .ok_or(Error::OutOfRange {
                index,
                len: self.items.len(),
            })
    }

    pub fn index_of(&self, item: &MediaItem) -> Result<usize> {
        self.items
            .iter()
            .position(|x| x == item)
            .ok_or_else(|| Error::NotFound(item.to_string()))
    }

    /// Entry after `current`, wrapping; the first entry if nothing usable is selected
    pub fn next_after(&self, current: Option<&MediaItem>) -> Result<MediaItem> {
        match current.and_then(|item| self.index_of(item).ok()) {
            Some(index) => self.at((index + 1) % self.len()),
            None => self.at(0),
        }
    }

    /// Entry before `current`, wrapping; the last entry if nothing usable is selected
    pub fn prev_before(&self, current: Option<&MediaItem>) -> Result<MediaItem> {
        let len = self.len();
        match current.and_then(|item| self.index_of(item).ok()) {
            Some(index) => self.at((index + len - 1) % len),
            None => self.at_signed(len as i64 - 1),
        }
    }

    /// Path strings in playlist order
    pub fn to_path_strings(&self) -> Vec<String> {
        self.items.iter().map(MediaItem::to_path_string).collect()
    }
}
