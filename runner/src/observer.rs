use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::engine::session::{FrameSnapshot, GameObserver};
use common::games::snake::GameEvent;
use common::log;

/// Logs every game event of one round and remembers the longest snake seen.
#[derive(Clone)]
pub struct LoggingObserver {
    round: u32,
    longest: Arc<AtomicUsize>,
}

impl LoggingObserver {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            longest: Arc::new(AtomicUsize::new(1)),
        }
    }

    pub fn longest_snake(&self) -> usize {
        self.longest.load(Ordering::Relaxed)
    }
}

impl GameObserver for LoggingObserver {
    async fn on_frame(&self, frame: FrameSnapshot) {
        self.longest.fetch_max(frame.body.len(), Ordering::Relaxed);
    }

    async fn on_event(&self, event: GameEvent) {
        match event {
            GameEvent::Eat { score } => {
                log!("[round {}] ate food, score {}", self.round, score);
            }
            GameEvent::LevelUp { level, score } => {
                log!("[round {}] level {} reached at score {}", self.round, level, score);
            }
            GameEvent::GameOver { score, level, reason } => {
                log!(
                    "[round {}] game over ({:?}): score {}, level {}",
                    self.round,
                    reason,
                    score,
                    level
                );
            }
            GameEvent::Pause { score, level } => {
                log!("[round {}] paused at score {}, level {}", self.round, score, level);
            }
            GameEvent::Resume => {
                log!("[round {}] resumed", self.round);
            }
        }
    }
}
