use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{interval, interval_at, Instant, Interval};

use crate::game::{Phase, Session};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionClock;
use crate::persistence::ProgressionStore;
use crate::render::Renderer;

/// Interactive play: one logical loop over input events, game ticks, and
/// render frames, paced by the level-dependent tick rate
pub struct PlayMode<S: ProgressionStore> {
    session: Session<S>,
    clock: SessionClock,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl<S: ProgressionStore> PlayMode<S> {
    pub fn new(session: Session<S>) -> Self {
        Self {
            session,
            clock: SessionClock::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Flush before the fallible teardown so a broken terminal cannot
        // lose it; a no-op if a collision already terminated and flushed
        self.session.quit();

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;
        self.print_summary();

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = self.tick_timer();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    let outcome = self.session.tick();
                    if outcome.leveled_up {
                        // The new level's rate takes effect from the next tick
                        tick_timer = self.tick_timer();
                    }
                    if outcome.terminated {
                        self.should_quit = true;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            self.session.state(),
                            &self.clock,
                            self.session.status(),
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn tick_timer(&self) -> Interval {
        let rate = self.session.tick_rate().max(1);
        let period = Duration::from_millis(1000 / u64::from(rate));
        // Start one period out: a fresh interval completes its first tick
        // immediately, which would double-step the snake on every level-up
        interval_at(Instant::now() + period, period)
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => {
                    self.session.steer(direction);
                }
                KeyAction::PauseToggle => {
                    self.session.toggle_pause();
                    match self.session.phase() {
                        Phase::Paused => self.clock.pause(),
                        Phase::Running => self.clock.resume(),
                        Phase::Terminated => {}
                    }
                }
                KeyAction::Save => {
                    self.session.save();
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn print_summary(&self) {
        let state = self.session.state();
        println!(
            "Session over after {}. Final score {} at level {}.",
            self.clock.format_time(),
            state.score(),
            state.level(),
        );
        if let Some(status) = self.session.status() {
            println!("{status}");
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
