use std::collections::{HashSet, VecDeque};

use super::grid::Grid;
use super::types::{Direction, GameOverReason, Point, WallMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub head: Point,
    pub ate: bool,
    pub collision: Option<GameOverReason>,
}

impl MoveResult {
    pub fn is_collision(&self) -> bool {
        self.collision.is_some()
    }
}

/// Outcome of looking one step ahead without touching the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPlan {
    Advance(Point),
    /// Solid wall ahead: the head stays where it is for this tick.
    Blocked,
    Collision(Point, GameOverReason),
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
    direction: Direction,
    grow_next: bool,
}

impl Snake {
    pub fn new(start_pos: Point, direction: Direction) -> Self {
        Self::from_segments(vec![start_pos], direction)
    }

    /// Builds a snake from head-first segments. Duplicates are dropped and an
    /// empty list falls back to a single segment at the origin.
    pub fn from_segments(segments: Vec<Point>, direction: Direction) -> Self {
        let mut body = VecDeque::with_capacity(segments.len().max(1));
        let mut body_set = HashSet::with_capacity(segments.len().max(1));
        for segment in segments {
            if body_set.insert(segment) {
                body.push_back(segment);
            }
        }
        if body.is_empty() {
            body.push_back(Point::new(0, 0));
            body_set.insert(Point::new(0, 0));
        }

        Self {
            body,
            body_set,
            direction,
            grow_next: false,
        }
    }

    pub fn body(&self) -> &VecDeque<Point> {
        &self.body
    }

    pub fn body_set(&self) -> &HashSet<Point> {
        &self.body_set
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_growing(&self) -> bool {
        self.grow_next
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    pub fn head(&self) -> Point {
        self.body.front().copied().unwrap_or(Point::new(0, 0))
    }

    pub fn tail(&self) -> Point {
        self.body.back().copied().unwrap_or(Point::new(0, 0))
    }

    /// Returns false when the turn was rejected because it stays on the current axis.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.direction.can_turn_to(&direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn grow(&mut self) {
        self.grow_next = true;
    }

    pub fn reset(&mut self, start_pos: Point, direction: Direction) {
        *self = Self::new(start_pos, direction);
    }

    /// Whether stepping onto `point` would hit the body this tick. The tail is
    /// free unless the snake is about to grow, since it moves away on commit.
    pub fn blocks(&self, point: &Point) -> bool {
        if !self.body_set.contains(point) {
            return false;
        }
        self.grow_next || *point != self.tail()
    }

    pub fn plan_step(&self, wall_mode: WallMode, grid: &Grid) -> StepPlan {
        self.plan_step_towards(self.direction, wall_mode, grid)
    }

    pub fn plan_step_towards(
        &self,
        direction: Direction,
        wall_mode: WallMode,
        grid: &Grid,
    ) -> StepPlan {
        let head = self.head();
        let raw = head.offset(direction);

        let next = match wall_mode {
            WallMode::Wrap => grid.wrap(raw.x, raw.y),
            WallMode::Kill => {
                if !grid.contains(raw.x, raw.y) {
                    return StepPlan::Collision(raw, GameOverReason::WallCollision);
                }
                raw
            }
            WallMode::Solid => {
                let clamped = grid.clamp(raw.x, raw.y);
                if clamped == head {
                    return StepPlan::Blocked;
                }
                clamped
            }
        };

        if self.blocks(&next) {
            return StepPlan::Collision(next, GameOverReason::SelfCollision);
        }

        StepPlan::Advance(next)
    }

    /// Moves the head onto `next`, which must come from `plan_step`.
    pub fn commit(&mut self, next: Point) {
        if self.grow_next {
            self.grow_next = false;
        } else if let Some(tail) = self.body.pop_back() {
            self.body_set.remove(&tail);
        }

        self.body.push_front(next);
        self.body_set.insert(next);
    }

    pub fn advance(&mut self, food: Point, wall_mode: WallMode, grid: &Grid) -> MoveResult {
        match self.plan_step(wall_mode, grid) {
            StepPlan::Collision(head, reason) => MoveResult {
                head,
                ate: false,
                collision: Some(reason),
            },
            StepPlan::Blocked => MoveResult {
                head: self.head(),
                ate: false,
                collision: None,
            },
            StepPlan::Advance(head) => {
                let ate = head == food;
                self.commit(head);
                MoveResult {
                    head,
                    ate,
                    collision: None,
                }
            }
        }
    }
}
