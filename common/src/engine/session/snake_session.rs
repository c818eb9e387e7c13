use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use super::GameObserver;
use crate::games::SessionRng;
use crate::games::snake::{
    BotController, BotType, Direction, Game, GameEvent, GameOverReason, LevelProgress, Point,
    SnakeSettings,
};
use crate::log;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Turn(Direction),
    Pause,
    Resume,
    TogglePause,
    Restart,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionClock {
    /// Ticks at the game's current speed.
    RealTime,
    /// Ticks back to back, yielding to the runtime in between.
    Unthrottled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    GameOver(GameOverReason),
    Quit,
    /// The command channel closed while the game was paused.
    Disconnected,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub score: u32,
    pub level: u32,
    pub ticks: u64,
    pub seed: u64,
    pub new_record: bool,
    pub end: SessionEnd,
}

/// What a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub body: Vec<Point>,
    pub direction: Direction,
    pub food: Point,
    pub score: u32,
    pub level: u32,
    pub speed_ms: u32,
    pub speed_factor: f64,
    pub is_paused: bool,
    pub progress: LevelProgress,
}

impl From<&Game> for FrameSnapshot {
    fn from(game: &Game) -> Self {
        Self {
            tick: game.ticks(),
            body: game.snake().body().iter().copied().collect(),
            direction: game.snake().direction(),
            food: game.food(),
            score: game.score(),
            level: game.level(),
            speed_ms: game.speed(),
            speed_factor: game.speed_factor(),
            is_paused: game.is_paused(),
            progress: game.level_progress(),
        }
    }
}

pub struct SnakeSessionState {
    pub game: Arc<Mutex<Game>>,
    pub autopilot: Option<BotType>,
    pub clock: SessionClock,
    bot_rng: SessionRng,
}

pub fn create_session(
    settings: &SnakeSettings,
    seed: u64,
    autopilot: Option<BotType>,
    clock: SessionClock,
) -> SnakeSessionState {
    let game = Game::with_rng(settings, SessionRng::new(seed));

    SnakeSessionState {
        game: Arc::new(Mutex::new(game)),
        autopilot,
        clock,
        bot_rng: SessionRng::new(seed.wrapping_add(1)),
    }
}

fn build_timer(clock: SessionClock, period: Duration) -> Option<Interval> {
    match clock {
        SessionClock::RealTime => {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(timer)
        }
        SessionClock::Unthrottled => None,
    }
}

async fn wait_for_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => tokio::task::yield_now().await,
    }
}

fn apply_command(game: &mut Game, command: SessionCommand) -> Option<GameEvent> {
    match command {
        SessionCommand::Turn(direction) => {
            game.set_direction(direction);
            None
        }
        SessionCommand::Pause => game.pause(),
        SessionCommand::Resume => game.resume(),
        SessionCommand::TogglePause => {
            if game.is_paused() {
                game.resume()
            } else {
                game.pause()
            }
        }
        SessionCommand::Restart => {
            game.reset();
            game.start();
            log!("Session restarted");
            None
        }
        SessionCommand::Quit => None,
    }
}

fn summarize(game: &Game, end: SessionEnd) -> SessionSummary {
    SessionSummary {
        score: game.score(),
        level: game.level(),
        ticks: game.ticks(),
        seed: game.seed(),
        new_record: game.is_new_record(),
        end,
    }
}

/// Drives one round until game over or quit. Commands are applied between
/// ticks; the game is only locked for the duration of one step.
pub async fn run_game_loop<O: GameObserver>(
    mut session_state: SnakeSessionState,
    observer: O,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
) -> SessionSummary {
    let mut period = {
        let mut game = session_state.game.lock().await;
        if game.game_over_reason().is_some() {
            game.reset();
        }
        game.start();
        game.tick_interval()
    };
    let mut timer = build_timer(session_state.clock, period);
    let mut commands_open = true;
    let mut ticking = true;

    loop {
        tokio::select! {
            biased;

            command = commands.recv(), if commands_open => {
                let Some(command) = command else {
                    commands_open = false;
                    continue;
                };

                let mut game = session_state.game.lock().await;
                if command == SessionCommand::Quit {
                    log!("Session quit at score {}", game.score());
                    return summarize(&game, SessionEnd::Quit);
                }

                let event = apply_command(&mut game, command);
                ticking = !game.is_paused();
                if game.tick_interval() != period {
                    period = game.tick_interval();
                    timer = build_timer(session_state.clock, period);
                }
                drop(game);

                if let Some(event) = event {
                    observer.on_event(event).await;
                }
            }

            _ = wait_for_tick(&mut timer), if ticking => {
                let mut game = session_state.game.lock().await;

                if let Some(bot_type) = session_state.autopilot
                    && let Some(direction) =
                        BotController::calculate_move(bot_type, &game, &mut session_state.bot_rng)
                {
                    game.set_direction(direction);
                }

                let event = game.update();
                let frame = FrameSnapshot::from(&*game);
                if game.tick_interval() != period {
                    period = game.tick_interval();
                    timer = build_timer(session_state.clock, period);
                }
                let summary = match event {
                    Some(GameEvent::GameOver { reason, .. }) => {
                        Some(summarize(&game, SessionEnd::GameOver(reason)))
                    }
                    _ => None,
                };
                drop(game);

                observer.on_frame(frame).await;
                if let Some(event) = event {
                    observer.on_event(event).await;
                }
                if let Some(summary) = summary {
                    return summary;
                }
            }

            else => {
                let game = session_state.game.lock().await;
                log!("Command channel closed while paused, ending session");
                return summarize(&game, SessionEnd::Disconnected);
            }
        }
    }
}
