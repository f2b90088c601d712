//! Persistence gateway: per-user progression records and session history
//!
//! The game core only depends on the `ProgressionStore` trait; the JSON file
//! store is the default backend, the memory store serves tests and ephemeral
//! play.

pub mod gateway;
pub mod json;

pub use gateway::{HistoryEntry, MemoryStore, ProgressionRecord, ProgressionStore};
pub use json::JsonFileStore;
