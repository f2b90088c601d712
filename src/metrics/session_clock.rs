use std::time::{Duration, Instant};

/// Wall-clock timer for the current session, shown in the header
///
/// Pausing the game stops the clock; resuming restarts it where it left off.
pub struct SessionClock {
    started: Instant,
    banked: Duration,
    running: bool,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            banked: Duration::ZERO,
            running: true,
        }
    }

    pub fn pause(&mut self) {
        if self.running {
            self.banked += self.started.elapsed();
            self.running = false;
        }
    }

    pub fn resume(&mut self) {
        if !self.running {
            self.started = Instant::now();
            self.running = true;
        }
    }

    pub fn elapsed(&self) -> Duration {
        if self.running {
            self.banked + self.started.elapsed()
        } else {
            self.banked
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed().as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}
