use serde::{Deserialize, Serialize};

use super::game_state::Game;
use super::snake::StepPlan;
use super::types::{Direction, Point, WallMode};
use crate::games::SessionRng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotType {
    #[default]
    Efficient,
    Random,
}

/// Autopilot input adapter: picks a direction the same way a player would
/// through `Game::set_direction`.
pub struct BotController;

impl BotController {
    pub fn calculate_move(
        bot_type: BotType,
        game: &Game,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        if !game.is_running() {
            return None;
        }

        match bot_type {
            BotType::Efficient => Self::efficient_pathfinding(game, rng),
            BotType::Random => Self::random_valid_move(game, rng),
        }
    }

    fn efficient_pathfinding(game: &Game, rng: &mut SessionRng) -> Option<Direction> {
        let food = game.food();

        let best = Self::safe_moves(game)
            .into_iter()
            .min_by_key(|(direction, next)| {
                let keeps_heading = *direction == game.snake().direction();
                (Self::manhattan_distance(*next, food, game), !keeps_heading)
            })
            .map(|(direction, _)| direction);

        best.or_else(|| Self::random_valid_move(game, rng))
    }

    fn random_valid_move(game: &Game, rng: &mut SessionRng) -> Option<Direction> {
        let safe: Vec<Direction> = Self::safe_moves(game)
            .into_iter()
            .map(|(direction, _)| direction)
            .collect();

        match rng.choose(&safe) {
            Some(direction) => Some(*direction),
            None => Some(Self::last_resort_move(game)),
        }
    }

    /// With no safe move left, steer into a collision rather than a solid wall,
    /// where the snake would stay blocked and the round would never end.
    fn last_resort_move(game: &Game) -> Direction {
        let snake = game.snake();
        let current = snake.direction();

        Direction::ALL
            .into_iter()
            .filter(|direction| *direction == current || current.can_turn_to(direction))
            .find(|direction| {
                !matches!(
                    snake.plan_step_towards(*direction, game.wall_mode(), game.grid()),
                    StepPlan::Blocked
                )
            })
            .unwrap_or(current)
    }

    /// Directions the snake may legally take that do not end the round this tick.
    fn safe_moves(game: &Game) -> Vec<(Direction, Point)> {
        let snake = game.snake();
        let current = snake.direction();

        Direction::ALL
            .into_iter()
            .filter(|direction| *direction == current || current.can_turn_to(direction))
            .filter_map(|direction| {
                match snake.plan_step_towards(direction, game.wall_mode(), game.grid()) {
                    StepPlan::Advance(next) => Some((direction, next)),
                    StepPlan::Blocked | StepPlan::Collision(..) => None,
                }
            })
            .collect()
    }

    fn manhattan_distance(a: Point, b: Point, game: &Game) -> i32 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();

        match game.wall_mode() {
            WallMode::Kill | WallMode::Solid => dx + dy,
            WallMode::Wrap => {
                let grid = game.grid();
                dx.min(grid.width - dx) + dy.min(grid.height - dy)
            }
        }
    }
}
