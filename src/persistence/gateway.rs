use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user's persisted progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionRecord {
    pub username: String,
    pub level: u32,
    pub score: u32,
}

impl ProgressionRecord {
    /// The record every new player starts from
    pub fn fresh(username: &str) -> Self {
        Self {
            username: username.to_string(),
            level: 1,
            score: 0,
        }
    }
}

/// One closed session, appended to the history on every save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub username: String,
    pub score: u32,
    pub level: u32,
}

/// The persistence gateway the game session depends on
///
/// `load` is idempotent: the first call for an unknown user creates the fresh
/// record, subsequent calls read it back unchanged. `save` overwrites the
/// user's record and appends a history entry for the closing session.
pub trait ProgressionStore {
    fn load(&mut self, username: &str) -> Result<ProgressionRecord>;
    fn save(&mut self, username: &str, level: u32, score: u32) -> Result<()>;
}

/// In-process store
///
/// Backs ephemeral play and the flush-contract tests, which need to count
/// `save` calls and to simulate a broken store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, ProgressionRecord>,
    history: Vec<HistoryEntry>,
    save_calls: u32,
    fail_loads: bool,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails
    pub fn failing() -> Self {
        Self {
            fail_loads: true,
            fail_saves: true,
            ..Self::default()
        }
    }

    /// A store that loads fine but cannot write
    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Number of successful or attempted save calls so far
    pub fn save_calls(&self) -> u32 {
        self.save_calls
    }

    pub fn record(&self, username: &str) -> Option<ProgressionRecord> {
        self.records.get(username).cloned()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

impl ProgressionStore for MemoryStore {
    fn load(&mut self, username: &str) -> Result<ProgressionRecord> {
        if self.fail_loads {
            bail!("store unavailable");
        }

        Ok(self
            .records
            .entry(username.to_string())
            .or_insert_with(|| ProgressionRecord::fresh(username))
            .clone())
    }

    fn save(&mut self, username: &str, level: u32, score: u32) -> Result<()> {
        self.save_calls += 1;

        if self.fail_saves {
            bail!("store unavailable");
        }

        self.records.insert(
            username.to_string(),
            ProgressionRecord {
                username: username.to_string(),
                level,
                score,
            },
        );
        self.history.push(HistoryEntry {
            username: username.to_string(),
            score,
            level,
        });

        Ok(())
    }
}
