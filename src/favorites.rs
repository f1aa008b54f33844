//! Persistent favorites list
//!
//! Favorites live under a single storage key as a JSON array of character
//! snapshots. Storage problems are logged and never reach the caller: a
//! missing or corrupt entry reads as an empty list.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Character;

pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored favorites are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait FavoritesRepository: Send {
    fn list(&self) -> Vec<Character>;
    /// No-op when a favorite with the same id already exists
    fn add(&mut self, character: &Character);
    /// Drops every entry with this id
    fn remove(&mut self, id: i64);
    fn clear(&mut self);
}

/// Favorites stored as `<dir>/<key>.json`
pub struct FileFavorites {
    path: PathBuf,
}

impl FileFavorites {
    pub fn new(dir: &Path) -> Self {
        Self::with_key(dir, FAVORITES_KEY)
    }

    pub fn with_key(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Character>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, entries: &[Character]) -> Result<(), StorageError> {
        let content = serde_json::to_string(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn update(&mut self, change: impl FnOnce(&mut Vec<Character>) -> bool) {
        let mut entries = self.list();
        if !change(&mut entries) {
            return;
        }
        if let Err(e) = self.write(&entries) {
            log::error!("Failed to save favorites to {}: {}", self.path.display(), e);
        }
    }
}

impl FavoritesRepository for FileFavorites {
    fn list(&self) -> Vec<Character> {
        match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring favorites in {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn add(&mut self, character: &Character) {
        self.update(|entries| add_entry(entries, character));
    }

    fn remove(&mut self, id: i64) {
        self.update(|entries| remove_entries(entries, id));
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::error!("Failed to clear favorites at {}: {}", self.path.display(), e),
        }
    }
}

/// Favorites kept in process memory only
#[derive(Debug, Default)]
pub struct MemoryFavorites {
    entries: Vec<Character>,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesRepository for MemoryFavorites {
    fn list(&self) -> Vec<Character> {
        self.entries.clone()
    }

    fn add(&mut self, character: &Character) {
        add_entry(&mut self.entries, character);
    }

    fn remove(&mut self, id: i64) {
        remove_entries(&mut self.entries, id);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

fn add_entry(entries: &mut Vec<Character>, character: &Character) -> bool {
    if entries.iter().any(|c| c.id == character.id) {
        return false;
    }
    entries.push(character.clone());
    true
}

fn remove_entries(entries: &mut Vec<Character>, id: i64) -> bool {
    let before = entries.len();
    entries.retain(|c| c.id != id);
    entries.len() != before
}

#[cfg(test)]
#[path = "favorites_tests.rs"]
mod tests;
