use anyhow::Result;

use super::{
    action::Direction,
    config::GameConfig,
    engine::{GameEngine, TickOutcome},
    progression::Progression,
    state::{Phase, SessionState},
};
use crate::persistence::ProgressionStore;

/// One player's game session: engine, state, and the persistence checkpoints
///
/// Owns the only mutable handle to the `SessionState` and decides when the
/// progression record is flushed to the store: on a fatal collision, on an
/// explicit save while paused, and on quit. Each terminal transition flushes
/// exactly once; a quit after a collision does not flush again.
pub struct Session<S: ProgressionStore> {
    engine: GameEngine,
    state: SessionState,
    store: S,
    username: String,
    pending_steer: Option<Direction>,
    status: Option<String>,
}

impl<S: ProgressionStore> Session<S> {
    /// Load (or create) the player's progression and start a session
    ///
    /// A failed load aborts session creation; there is no fallback identity.
    pub fn start(config: GameConfig, mut store: S, username: &str) -> Result<Self> {
        let record = store.load(username)?;
        let progression = Progression::from_record(&record);

        let mut engine = GameEngine::new(config);
        let state = engine.new_session(progression);

        Ok(Self {
            engine,
            state,
            store,
            username: username.to_string(),
            pending_steer: None,
            status: None,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn tick_rate(&self) -> u32 {
        self.state.tick_rate
    }

    /// Most recent persistence status message, if any
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Record a steer for the next tick; the latest steer within a tick wins.
    /// Ignored while paused or terminated.
    pub fn steer(&mut self, direction: Direction) {
        if self.state.phase == Phase::Running {
            self.pending_steer = Some(direction);
        }
    }

    /// Run one tick; flushes once if the tick was fatal
    pub fn tick(&mut self) -> TickOutcome {
        let steer = self.pending_steer.take();
        let outcome = self.engine.tick(&mut self.state, steer);

        if outcome.collision.is_some() {
            self.flush();
        }

        outcome
    }

    /// Toggle Running <-> Paused; no-op once terminated
    pub fn toggle_pause(&mut self) {
        self.state.phase = match self.state.phase {
            Phase::Running => {
                self.pending_steer = None;
                Phase::Paused
            }
            Phase::Paused => Phase::Running,
            Phase::Terminated => Phase::Terminated,
        };
    }

    /// Explicit save request; only honored while paused, stays paused
    pub fn save(&mut self) {
        if self.state.phase == Phase::Paused {
            self.flush();
        }
    }

    /// Quit the session, flushing unless a collision already did
    pub fn quit(&mut self) {
        if self.state.phase != Phase::Terminated {
            self.state.phase = Phase::Terminated;
            self.flush();
        }
    }

    /// Write current progression through the gateway
    ///
    /// Failures are surfaced as a status message, never as an error: a broken
    /// store must not block shutdown.
    fn flush(&mut self) {
        let progression = self.state.progression;
        match self
            .store
            .save(&self.username, progression.level, progression.score)
        {
            Ok(()) => {
                self.status = Some(format!("Progress saved for {}.", self.username));
            }
            Err(err) => {
                self.status = Some(format!("Save failed: {err:#}"));
            }
        }
    }
}
