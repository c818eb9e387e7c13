mod bot_controller;
mod food;
mod game_state;
mod grid;
mod levels;
mod settings;
mod snake;
mod types;

pub use bot_controller::{BotController, BotType};
pub use food::Food;
pub use game_state::{Game, GameEvent, GameStatus, INITIAL_DIRECTION};
pub use grid::Grid;
pub use levels::{
    LevelProgress, level_from_score, level_progress, required_score_for_level, speed_for_level,
};
pub use settings::{DEFAULT_FIELD_SIZE, DEFAULT_START, MAX_DIRECTION_QUEUE_SIZE, SnakeSettings};
pub use snake::{MoveResult, Snake, StepPlan};
pub use types::{Axis, Direction, GameOverReason, Point, WallMode};
