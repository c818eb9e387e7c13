use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::types::{Point, WallMode};
use crate::config::Validate;

pub const DEFAULT_FIELD_SIZE: i32 = 16;
pub const DEFAULT_START: Point = Point { x: 10, y: 10 };
pub const MAX_DIRECTION_QUEUE_SIZE: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSettings {
    pub field_width: i32,
    pub field_height: i32,
    pub wall_mode: WallMode,
    pub initial_speed_ms: u32,
    pub min_speed_ms: u32,
    pub speed_step_ms: u32,
    pub start_x: i32,
    pub start_y: i32,
    /// Pending turns buffered between ticks. Zero keeps only the last turn.
    pub direction_queue_size: usize,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_SIZE,
            field_height: DEFAULT_FIELD_SIZE,
            wall_mode: WallMode::Wrap,
            initial_speed_ms: 150,
            min_speed_ms: 60,
            speed_step_ms: 10,
            start_x: DEFAULT_START.x,
            start_y: DEFAULT_START.y,
            direction_queue_size: 0,
        }
    }
}

impl SnakeSettings {
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            field_width: width,
            field_height: height,
            ..Self::default()
        }
    }

    /// The configured start, or the field centre when it lies outside the field.
    pub fn start_position(&self) -> Point {
        let grid = Grid::new(self.field_width, self.field_height);
        if grid.contains(self.start_x, self.start_y) {
            Point::new(self.start_x, self.start_y)
        } else {
            grid.center()
        }
    }
}

impl Validate for SnakeSettings {
    fn validate(&self) -> Result<(), String> {
        if self.field_width < 5 || self.field_width > 100 {
            return Err("field_width must be between 5 and 100".to_string());
        }
        if self.field_height < 5 || self.field_height > 100 {
            return Err("field_height must be between 5 and 100".to_string());
        }
        if self.min_speed_ms < 10 {
            return Err("min_speed_ms must be at least 10".to_string());
        }
        if self.initial_speed_ms < self.min_speed_ms {
            return Err("initial_speed_ms must not be below min_speed_ms".to_string());
        }
        if self.initial_speed_ms > 5000 {
            return Err("initial_speed_ms must not exceed 5000".to_string());
        }
        if self.direction_queue_size > MAX_DIRECTION_QUEUE_SIZE {
            return Err(format!(
                "direction_queue_size must not exceed {}",
                MAX_DIRECTION_QUEUE_SIZE
            ));
        }
        if !(0..self.field_width).contains(&self.start_x)
            || !(0..self.field_height).contains(&self.start_y)
        {
            return Err("start position must lie inside the field".to_string());
        }
        Ok(())
    }
}
