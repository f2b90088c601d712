//! Core game logic: the per-tick rules, the session state machine, and the
//! level/score progression. No I/O or rendering dependencies except the
//! persistence gateway trait used at session checkpoints.

pub mod action;
pub mod config;
pub mod engine;
pub mod progression;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, TickOutcome};
pub use progression::Progression;
pub use session::Session;
pub use state::{CollisionType, Phase, Position, SessionState, Snake};
