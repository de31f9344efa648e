//! Terminal mode that lets the autopilot play while you watch
//!
//! The game speeds through SEEK and slows down in SURVIVE so tight escapes
//! can be followed. The planned route is drawn ahead of the head.
//!
//! # Controls
//!
//! - Space/P: Pause/unpause
//! - R: Restart the game
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{stderr, Stderr},
    time::{Duration, Instant},
};
use tokio::time::{interval, interval_at, Interval};
use tracing::{info, warn};

use super::session::Session;
use crate::autopilot::{AutopilotConfig, Mode};
use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::BestScoreStore;
use crate::render::{Overlay, Renderer};

/// How long the game over panel stays up before the next game
const RESTART_DELAY: Duration = Duration::from_millis(1500);

/// Playback speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    Slow,
    Normal,
    Fast,
    VeryFast,
}

impl PlaybackSpeed {
    /// Tick interval for this speed while the autopilot is in `mode`
    ///
    /// SURVIVE ticks four times slower than SEEK.
    pub fn tick_interval(&self, mode: Mode) -> Duration {
        let base = match self {
            Self::Slow => Duration::from_millis(250),
            Self::Normal => Duration::from_millis(60),
            Self::Fast => Duration::from_millis(25),
            Self::VeryFast => Duration::from_millis(8),
        };

        match mode {
            Mode::Seek => base,
            Mode::Survive => base * 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

pub struct AutopilotMode {
    session: Session,
    store: Option<BestScoreStore>,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
    /// Mode the tick timer is currently paced for
    paced_for: Mode,
    /// Set when the current game ended
    game_over_at: Option<Instant>,
}

impl AutopilotMode {
    pub fn new(
        game_config: GameConfig,
        autopilot_config: AutopilotConfig,
        store: Option<BestScoreStore>,
    ) -> Result<Self> {
        let high_score = store.as_ref().map_or(0, BestScoreStore::best);
        let session = Session::new(game_config, autopilot_config)?.with_high_score(high_score);

        Ok(Self {
            session,
            store,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
            paced_for: Mode::Seek,
            game_over_at: None,
        })
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

        let result = self.run_game_loop(&mut terminal).await;

        // Restore the terminal even if the loop failed
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.current_interval());

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game()?;
                    self.repace(&mut tick_timer);
                }

                _ = render_timer.tick() => {
                    self.session.metrics_mut().update();
                    let overlay = self.overlay();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            self.session.state(),
                            self.session.metrics(),
                            &overlay,
                        );
                    }).context("Failed to draw frame")?;
                }

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

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::TogglePause => self.paused = !self.paused,
                KeyAction::SetSpeed(speed) => {
                    self.speed = speed;
                    self.repace(tick_timer);
                }
                KeyAction::Restart => {
                    self.restart();
                    self.repace(tick_timer);
                }
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) -> Result<()> {
        if self.paused {
            return Ok(());
        }

        if let Some(ended_at) = self.game_over_at {
            if ended_at.elapsed() >= RESTART_DELAY {
                self.restart();
            }
            return Ok(());
        }

        let outcome = self.session.tick()?;
        if let Some(finished) = outcome.finished {
            self.game_over_at = Some(Instant::now());
            self.record_score(finished.score);
        }

        Ok(())
    }

    /// Rebuild the tick timer whenever its period no longer matches the
    /// current mode and speed
    fn repace(&mut self, tick_timer: &mut Interval) {
        self.paced_for = self.session.autopilot().mode().unwrap_or_default();
        let period = self.current_interval();
        if tick_timer.period() != period {
            *tick_timer = paced_interval(period);
        }
    }

    fn current_interval(&self) -> Duration {
        self.speed.tick_interval(self.paced_for)
    }

    fn restart(&mut self) {
        self.session.restart();
        self.game_over_at = None;
        self.paced_for = Mode::Seek;
    }

    fn record_score(&mut self, score: u32) {
        let Some(store) = self.store.as_mut() else {
            return;
        };

        // A failed write should not tear down the UI
        match store.record(score) {
            Ok(true) => info!(score, path = %store.path().display(), "saved new best score"),
            Ok(false) => {}
            Err(err) => warn!(error = %err, "failed to save best score"),
        }
    }

    fn overlay(&self) -> Overlay {
        let autopilot = self.session.autopilot();
        Overlay {
            mode: autopilot.mode(),
            route: autopilot
                .planned_route()
                .map(|route| route.cells().to_vec())
                .unwrap_or_default(),
            paused: self.paused,
            speed: self.speed.as_str(),
            games_played: self.session.metrics().games_played,
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

/// Interval whose first tick is one period away
fn paced_interval(period: Duration) -> Interval {
    interval_at(tokio::time::Instant::now() + period, period)
}
