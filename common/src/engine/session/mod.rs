mod snake_session;

pub use snake_session::{
    FrameSnapshot, SessionClock, SessionCommand, SessionEnd, SessionSummary, SnakeSessionState,
    create_session, run_game_loop,
};

use crate::games::snake::GameEvent;

/// Receives everything a front end needs to follow a running session.
pub trait GameObserver: Send + Sync + Clone + 'static {
    fn on_frame(&self, frame: FrameSnapshot) -> impl Future<Output = ()> + Send;

    fn on_event(&self, event: GameEvent) -> impl Future<Output = ()> + Send;
}
