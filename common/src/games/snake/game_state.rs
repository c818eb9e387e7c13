use std::time::Duration;

use ringbuffer::{AllocRingBuffer, RingBuffer};

use super::food::Food;
use super::grid::Grid;
use super::levels::{self, LevelProgress};
use super::settings::SnakeSettings;
use super::snake::{Snake, StepPlan};
use super::types::{Direction, GameOverReason, Point, WallMode};
use crate::games::SessionRng;
use crate::log;

pub const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Eat { score: u32 },
    /// Also stands for the eat that caused it; `score` is already updated.
    LevelUp { level: u32, score: u32 },
    GameOver { score: u32, level: u32, reason: GameOverReason },
    Pause { score: u32, level: u32 },
    Resume,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Single-player snake round: one grid, one snake, one piece of food.
///
/// Lifecycle is `Idle -> Running <-> Paused -> GameOver`, and only `reset`
/// leads back to `Idle`. None of the operations fail; inputs that make no
/// sense in the current state are ignored.
pub struct Game {
    grid: Grid,
    snake: Snake,
    food: Food,
    score: u32,
    level: u32,
    speed: u32,
    is_running: bool,
    is_paused: bool,
    wall_mode: WallMode,
    initial_speed: u32,
    min_speed: u32,
    speed_step: u32,
    start_position: Point,
    direction_queue: Option<AllocRingBuffer<Direction>>,
    best_score: u32,
    game_over_reason: Option<GameOverReason>,
    ticks: u64,
    rng: SessionRng,
}

impl Game {
    pub fn new(width: i32, height: i32) -> Self {
        Self::from_settings(&SnakeSettings::with_size(width, height))
    }

    pub fn from_settings(settings: &SnakeSettings) -> Self {
        Self::with_rng(settings, SessionRng::from_random())
    }

    pub fn with_rng(settings: &SnakeSettings, mut rng: SessionRng) -> Self {
        // Two cells minimum so a fresh snake always leaves room for food.
        let grid = Grid::new(settings.field_width.max(2), settings.field_height);
        let start_position = settings.start_position();
        let snake = Snake::new(start_position, INITIAL_DIRECTION);
        let food = Self::initial_food(&grid, &snake, &mut rng);
        let direction_queue = match settings.direction_queue_size {
            0 => None,
            size => Some(AllocRingBuffer::new(size)),
        };
        let min_speed = settings.min_speed_ms.max(1);
        let initial_speed = settings.initial_speed_ms.max(min_speed);

        Self {
            grid,
            snake,
            food,
            score: 0,
            level: 1,
            speed: initial_speed,
            is_running: false,
            is_paused: false,
            wall_mode: settings.wall_mode,
            initial_speed,
            min_speed,
            speed_step: settings.speed_step_ms,
            start_position,
            direction_queue,
            best_score: 0,
            game_over_reason: None,
            ticks: 0,
            rng,
        }
    }

    fn initial_food(grid: &Grid, snake: &Snake, rng: &mut SessionRng) -> Food {
        Food::generate(grid.width, grid.height, snake.body_set(), rng).unwrap_or_else(|| {
            let head = snake.head();
            Food {
                position: grid.wrap(head.x + 1, head.y),
            }
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Point {
        self.food.position
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current tick interval in milliseconds.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn initial_speed(&self) -> u32 {
        self.initial_speed
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.speed))
    }

    pub fn speed_factor(&self) -> f64 {
        f64::from(self.initial_speed) / f64::from(self.speed)
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn wall_mode(&self) -> WallMode {
        self.wall_mode
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn status(&self) -> GameStatus {
        match (self.is_running, self.is_paused, self.game_over_reason) {
            (true, true, _) => GameStatus::Paused,
            (true, false, _) => GameStatus::Running,
            (false, _, Some(_)) => GameStatus::GameOver,
            (false, _, None) => GameStatus::Idle,
        }
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Best score known to the persistence layer, kept across `reset`.
    pub fn set_best_score(&mut self, best_score: u32) {
        self.best_score = best_score;
    }

    pub fn is_new_record(&self) -> bool {
        self.score > self.best_score
    }

    pub fn level_progress(&self) -> LevelProgress {
        levels::level_progress(self.score, self.level)
    }

    /// Returns whether the turn was accepted (committed, or queued when a
    /// direction queue is configured).
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        match self.direction_queue.as_mut() {
            None => self.snake.set_direction(direction),
            Some(queue) => {
                let last = queue.back().copied().unwrap_or(self.snake.direction());
                if queue.is_full() || !last.can_turn_to(&direction) {
                    return false;
                }
                queue.push(direction);
                true
            }
        }
    }

    pub fn set_direction_vector(&mut self, x: i32, y: i32) -> bool {
        match Direction::from_vector(x, y) {
            Some(direction) => self.set_direction(direction),
            None => false,
        }
    }

    pub fn pending_directions(&self) -> usize {
        self.direction_queue.as_ref().map_or(0, |queue| queue.len())
    }

    /// Moves the food to a free in-bounds cell. Returns false and leaves the
    /// food alone otherwise.
    pub fn place_food(&mut self, x: i32, y: i32) -> bool {
        if !self.grid.contains(x, y) || self.snake.contains(&Point::new(x, y)) {
            return false;
        }
        self.food.update(x, y);
        true
    }

    /// Returns false if the round already ended; it has to be `reset` first.
    pub fn start(&mut self) -> bool {
        if self.game_over_reason.is_some() {
            return false;
        }
        self.is_running = true;
        self.is_paused = false;
        log!("Game started (seed {})", self.rng.seed());
        true
    }

    pub fn pause(&mut self) -> Option<GameEvent> {
        if self.is_running && !self.is_paused {
            self.is_paused = true;
            return Some(GameEvent::Pause {
                score: self.score,
                level: self.level,
            });
        }
        None
    }

    pub fn resume(&mut self) -> Option<GameEvent> {
        if self.is_running && self.is_paused {
            self.is_paused = false;
            return Some(GameEvent::Resume);
        }
        None
    }

    pub fn reset(&mut self) {
        self.snake.reset(self.start_position, INITIAL_DIRECTION);
        if let Some(queue) = self.direction_queue.as_mut() {
            queue.clear();
        }
        self.food = Self::initial_food(&self.grid, &self.snake, &mut self.rng);
        self.score = 0;
        self.level = 1;
        self.speed = self.initial_speed;
        self.is_paused = false;
        self.is_running = false;
        self.game_over_reason = None;
        self.ticks = 0;
    }

    /// Advances one tick. Does nothing unless the game is running and not paused.
    pub fn update(&mut self) -> Option<GameEvent> {
        if !self.is_running || self.is_paused {
            return None;
        }

        if let Some(direction) = self.direction_queue.as_mut().and_then(|queue| queue.dequeue()) {
            self.snake.set_direction(direction);
        }
        self.ticks += 1;

        let head = match self.snake.plan_step(self.wall_mode, &self.grid) {
            StepPlan::Collision(_, reason) => return Some(self.finish(reason)),
            StepPlan::Blocked => return None,
            StepPlan::Advance(head) => head,
        };

        if head != self.food.position {
            self.snake.commit(head);
            return None;
        }

        self.snake.grow();
        self.snake.commit(head);
        let next_food = Food::generate(
            self.grid.width,
            self.grid.height,
            self.snake.body_set(),
            &mut self.rng,
        );
        self.score = self.score.saturating_add(1);

        let previous_level = self.level;
        self.level = levels::level_from_score(self.score);
        let leveled_up = self.level > previous_level;
        if leveled_up {
            self.speed = levels::speed_for_level(
                self.level,
                self.initial_speed,
                self.min_speed,
                self.speed_step,
            );
        }

        match next_food {
            Some(food) => self.food = food,
            None => return Some(self.finish(GameOverReason::BoardFilled)),
        }

        if leveled_up {
            log!(
                "Level up: {} (score {}, tick interval {} ms)",
                self.level,
                self.score,
                self.speed
            );
            return Some(GameEvent::LevelUp {
                level: self.level,
                score: self.score,
            });
        }

        Some(GameEvent::Eat { score: self.score })
    }

    fn finish(&mut self, reason: GameOverReason) -> GameEvent {
        self.is_running = false;
        self.game_over_reason = Some(reason);
        log!(
            "Game over: {:?} after {} ticks, score {}, level {}",
            reason,
            self.ticks,
            self.score,
            self.level
        );
        GameEvent::GameOver {
            score: self.score,
            level: self.level,
            reason,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(settings: &SnakeSettings) -> Game {
        Game::with_rng(settings, SessionRng::new(42))
    }

    fn started(settings: &SnakeSettings) -> Game {
        let mut game = seeded(settings);
        game.start();
        game
    }

    fn body(game: &Game) -> Vec<Point> {
        game.snake().body().iter().copied().collect()
    }

    fn park_food(game: &mut Game) {
        // Somewhere the tests never walk through.
        assert!(game.place_food(0, 15));
    }

    #[test]
    fn test_initial_state() {
        let game = seeded(&SnakeSettings::default());
        assert_eq!(body(&game), vec![Point::new(10, 10)]);
        assert_eq!(game.snake().direction(), Direction::Right);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.speed(), 150);
        assert_eq!(game.status(), GameStatus::Idle);
        assert!(!game.snake().contains(&game.food()));
    }

    #[test]
    fn test_eat_scenario() {
        let mut game = started(&SnakeSettings::default());
        assert!(game.place_food(11, 10));

        let event = game.update();

        assert_eq!(event, Some(GameEvent::Eat { score: 1 }));
        assert_eq!(game.score(), 1);
        assert_eq!(body(&game), vec![Point::new(11, 10), Point::new(10, 10)]);
        assert!(!game.snake().contains(&game.food()));
        assert!(game.grid().contains(game.food().x, game.food().y));
    }

    #[test]
    fn test_eating_grows_longer_snake_by_one() {
        let mut game = started(&SnakeSettings::default());
        game.set_snake(Snake::from_segments(
            vec![Point::new(5, 5), Point::new(4, 5), Point::new(3, 5)],
            Direction::Right,
        ));
        assert!(game.place_food(6, 5));

        game.update();

        assert_eq!(game.snake().len(), 4);
        assert_eq!(game.snake().tail(), Point::new(3, 5));

        park_food(&mut game);
        game.update();
        assert_eq!(game.snake().len(), 4);
    }

    #[test]
    fn test_plain_move_has_no_event() {
        let mut game = started(&SnakeSettings::default());
        park_food(&mut game);
        assert_eq!(game.update(), None);
        assert_eq!(body(&game), vec![Point::new(11, 10)]);
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn test_update_is_noop_unless_running() {
        let mut game = seeded(&SnakeSettings::default());
        park_food(&mut game);
        assert_eq!(game.update(), None);
        assert_eq!(body(&game), vec![Point::new(10, 10)]);

        game.start();
        game.pause();
        assert_eq!(game.update(), None);
        assert_eq!(body(&game), vec![Point::new(10, 10)]);
        assert_eq!(game.ticks(), 0);
    }

    #[test]
    fn test_wrap_mode_crosses_edge() {
        let settings = SnakeSettings {
            start_x: 15,
            start_y: 4,
            ..SnakeSettings::default()
        };
        let mut game = started(&settings);
        park_food(&mut game);
        assert_eq!(game.update(), None);
        assert_eq!(game.snake().head(), Point::new(0, 4));
        assert!(game.is_running());
    }

    #[test]
    fn test_kill_mode_ends_game_at_wall() {
        let settings = SnakeSettings {
            wall_mode: WallMode::Kill,
            start_x: 15,
            start_y: 4,
            ..SnakeSettings::default()
        };
        let mut game = started(&settings);
        park_food(&mut game);

        let event = game.update();

        assert_eq!(
            event,
            Some(GameEvent::GameOver {
                score: 0,
                level: 1,
                reason: GameOverReason::WallCollision,
            })
        );
        assert!(!game.is_running());
        assert_eq!(game.status(), GameStatus::GameOver);
        assert_eq!(body(&game), vec![Point::new(15, 4)]);
    }

    #[test]
    fn test_solid_mode_keeps_running_at_wall() {
        let settings = SnakeSettings {
            wall_mode: WallMode::Solid,
            start_x: 15,
            start_y: 4,
            ..SnakeSettings::default()
        };
        let mut game = started(&settings);
        park_food(&mut game);

        assert_eq!(game.update(), None);
        assert_eq!(game.update(), None);
        assert!(game.is_running());
        assert_eq!(body(&game), vec![Point::new(15, 4)]);

        game.set_direction(Direction::Up);
        game.update();
        assert_eq!(game.snake().head(), Point::new(15, 3));
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut game = started(&SnakeSettings::default());
        game.set_snake(Snake::from_segments(
            vec![
                Point::new(5, 5),
                Point::new(6, 5),
                Point::new(6, 6),
                Point::new(5, 6),
                Point::new(4, 6),
            ],
            Direction::Left,
        ));
        park_food(&mut game);
        assert!(game.set_direction(Direction::Down));

        let event = game.update();

        assert!(matches!(
            event,
            Some(GameEvent::GameOver {
                reason: GameOverReason::SelfCollision,
                ..
            })
        ));
        assert!(!game.is_running());
        assert_eq!(game.snake().len(), 5);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut game = started(&SnakeSettings::default());
        park_food(&mut game);
        assert!(!game.set_direction(Direction::Left));
        assert!(!game.set_direction_vector(-5, 0));
        assert!(!game.set_direction_vector(1, 1));
        assert!(!game.set_direction_vector(0, 0));
        game.update();
        assert_eq!(game.snake().head(), Point::new(11, 10));
    }

    #[test]
    fn test_last_turn_wins_without_queue() {
        let mut game = started(&SnakeSettings::default());
        park_food(&mut game);
        assert!(game.set_direction(Direction::Up));
        assert!(!game.set_direction(Direction::Down));
        game.update();
        assert_eq!(game.snake().head(), Point::new(10, 9));
    }

    #[test]
    fn test_direction_queue_applies_one_turn_per_tick() {
        let settings = SnakeSettings {
            direction_queue_size: 2,
            ..SnakeSettings::default()
        };
        let mut game = started(&settings);
        park_food(&mut game);

        assert!(game.set_direction(Direction::Up));
        assert!(!game.set_direction(Direction::Down));
        assert!(game.set_direction(Direction::Left));
        assert!(!game.set_direction(Direction::Down));
        assert_eq!(game.pending_directions(), 2);

        game.update();
        assert_eq!(game.snake().head(), Point::new(10, 9));
        game.update();
        assert_eq!(game.snake().head(), Point::new(9, 9));
        assert_eq!(game.pending_directions(), 0);
    }

    #[test]
    fn test_level_up_speeds_game() {
        let mut game = started(&SnakeSettings::default());
        let mut events = vec![];
        for step in 0..3 {
            assert!(game.place_food(11 + step, 10));
            events.push(game.update());
        }

        assert_eq!(events[0], Some(GameEvent::Eat { score: 1 }));
        assert_eq!(events[1], Some(GameEvent::Eat { score: 2 }));
        assert_eq!(events[2], Some(GameEvent::LevelUp { level: 2, score: 3 }));
        assert_eq!(game.speed(), 140);
        assert!((game.speed_factor() - 150.0 / 140.0).abs() < 1e-9);
        assert_eq!(game.level_progress().label, "0/4");
    }

    #[test]
    fn test_pause_resume_are_idempotent() {
        let mut game = seeded(&SnakeSettings::default());
        assert_eq!(game.pause(), None);
        assert_eq!(game.resume(), None);

        game.start();
        assert_eq!(game.resume(), None);
        assert_eq!(game.pause(), Some(GameEvent::Pause { score: 0, level: 1 }));
        assert_eq!(game.pause(), None);
        assert_eq!(game.status(), GameStatus::Paused);
        assert_eq!(game.resume(), Some(GameEvent::Resume));
        assert_eq!(game.resume(), None);
        assert_eq!(game.status(), GameStatus::Running);
    }

    #[test]
    fn test_game_over_is_terminal_until_reset() {
        let settings = SnakeSettings {
            wall_mode: WallMode::Kill,
            start_x: 15,
            ..SnakeSettings::default()
        };
        let mut game = started(&settings);
        park_food(&mut game);
        assert!(matches!(game.update(), Some(GameEvent::GameOver { .. })));

        assert!(!game.start());
        assert_eq!(game.update(), None);
        assert_eq!(game.pause(), None);

        game.reset();
        assert_eq!(game.status(), GameStatus::Idle);
        assert!(game.start());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let settings = SnakeSettings {
            direction_queue_size: 2,
            ..SnakeSettings::default()
        };
        let mut game = started(&settings);
        for step in 0..3 {
            assert!(game.place_food(11 + step, 10));
            game.update();
        }
        game.set_direction(Direction::Up);
        game.pause();

        game.reset();
        game.start();

        assert_eq!(body(&game), vec![Point::new(10, 10)]);
        assert_eq!(game.snake().direction(), Direction::Right);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.speed(), game.initial_speed());
        assert!(!game.is_paused());
        assert!(game.is_running());
        assert_eq!(game.pending_directions(), 0);
        assert_eq!(game.ticks(), 0);
        assert!(!game.snake().contains(&game.food()));
    }

    #[test]
    fn test_filling_the_board_ends_game() {
        let settings = SnakeSettings::with_size(2, 1);
        let mut game = started(&settings);
        assert_eq!(body(&game), vec![Point::new(1, 0)]);
        assert_eq!(game.food(), Point::new(0, 0));

        let event = game.update();

        assert_eq!(
            event,
            Some(GameEvent::GameOver {
                score: 1,
                level: 1,
                reason: GameOverReason::BoardFilled,
            })
        );
        assert_eq!(game.snake().len(), 2);
    }

    #[test]
    fn test_new_record_tracks_best_score() {
        let mut game = started(&SnakeSettings::default());
        game.set_best_score(1);
        assert!(!game.is_new_record());
        assert!(game.place_food(11, 10));
        game.update();
        assert!(!game.is_new_record());
        assert!(game.place_food(12, 10));
        game.update();
        assert!(game.is_new_record());

        game.reset();
        assert_eq!(game.best_score(), 1);
    }

    #[test]
    fn test_place_food_rejects_snake_and_out_of_bounds() {
        let mut game = seeded(&SnakeSettings::default());
        let before = game.food();
        assert!(!game.place_food(10, 10));
        assert!(!game.place_food(16, 0));
        assert_eq!(game.food(), before);
    }

    #[test]
    fn test_invariants_hold_over_random_play() {
        for wall_mode in [WallMode::Wrap, WallMode::Solid, WallMode::Kill] {
            let settings = SnakeSettings {
                wall_mode,
                field_width: 8,
                field_height: 8,
                start_x: 4,
                start_y: 4,
                ..SnakeSettings::default()
            };
            let mut game = started(&settings);
            let mut rng = SessionRng::new(7);
            let mut last_score = 0;
            let mut last_level = 1;

            for _ in 0..5000 {
                if !game.is_running() {
                    game.reset();
                    game.start();
                    last_score = 0;
                    last_level = 1;
                }
                if let Some(direction) = rng.choose(&Direction::ALL) {
                    let before = game.snake().direction();
                    game.set_direction(*direction);
                    assert!(!game.snake().direction().is_opposite(&before));
                }
                game.update();

                let snake = game.snake();
                assert!(!snake.is_empty());
                assert_eq!(snake.body().len(), snake.body_set().len());
                if game.is_running() {
                    assert!(!snake.contains(&game.food()));
                }
                assert!(game.score() >= last_score);
                assert!(game.level() >= last_level);
                assert_eq!(game.level(), levels::level_from_score(game.score()));
                assert!((0.0..=1.0).contains(&game.level_progress().value));
                last_score = game.score();
                last_level = game.level();
            }
        }
    }
}
