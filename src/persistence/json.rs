//! File-backed progression store
//!
//! Persists all players' records and the session history as a single
//! pretty-printed JSON file, written through on every mutation so a crash
//! never loses a completed save.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::gateway::{HistoryEntry, ProgressionRecord, ProgressionStore};

/// On-disk layout of the save file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    users: HashMap<String, ProgressionRecord>,
    history: Vec<HistoryEntry>,
}

pub struct JsonFileStore {
    path: PathBuf,
    data: StoreFile,
}

impl JsonFileStore {
    /// Open the store at `path`, reading it if present
    pub fn open(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read save file {:?}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Save file {:?} is corrupt", path))?
        } else {
            StoreFile::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    fn write_through(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        let raw = serde_json::to_string_pretty(&self.data).context("Failed to serialize save data")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write save file {:?}", self.path))?;

        Ok(())
    }
}

impl ProgressionStore for JsonFileStore {
    fn load(&mut self, username: &str) -> Result<ProgressionRecord> {
        if let Some(record) = self.data.users.get(username) {
            return Ok(record.clone());
        }

        // First load for this player creates the fresh record on disk, so a
        // second load reads rather than re-creates
        let record = ProgressionRecord::fresh(username);
        self.data.users.insert(username.to_string(), record.clone());
        self.write_through()?;

        Ok(record)
    }

    fn save(&mut self, username: &str, level: u32, score: u32) -> Result<()> {
        self.data.users.insert(
            username.to_string(),
            ProgressionRecord {
                username: username.to_string(),
                level,
                score,
            },
        );
        self.data.history.push(HistoryEntry {
            username: username.to_string(),
            score,
            level,
        });

        self.write_through()
    }
}
