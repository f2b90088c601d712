//! Persistent Snake - grid snake with per-user progression saved across sessions
//!
//! This library provides:
//! - Core game logic and the session state machine (game module)
//! - The progression persistence gateway (persistence module)
//! - TUI rendering (render module)
//! - Keyboard input mapping (input module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
