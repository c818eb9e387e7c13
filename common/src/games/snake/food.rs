use std::collections::HashSet;

use super::grid::Grid;
use super::types::Point;
use crate::games::SessionRng;
use crate::log;

const MAX_SAMPLE_ATTEMPTS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    pub position: Point,
}

impl Food {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            position: Point::new(x, y),
        }
    }

    pub fn update(&mut self, x: i32, y: i32) {
        self.position = Point::new(x, y);
    }

    /// Places food on a free cell. Random sampling is tried first; once it keeps
    /// hitting the snake the free cells are enumerated instead, so this always
    /// terminates. `None` means the snake covers the whole grid.
    pub fn generate(
        width: i32,
        height: i32,
        occupied: &HashSet<Point>,
        rng: &mut SessionRng,
    ) -> Option<Food> {
        let grid = Grid::new(width, height);

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let pos = grid.random_position(rng);
            if !occupied.contains(&pos) {
                log!("Food spawned at ({}, {})", pos.x, pos.y);
                return Some(Food { position: pos });
            }
        }

        let free: Vec<Point> = grid.cells().filter(|p| !occupied.contains(p)).collect();
        let pos = *rng.choose(&free)?;
        log!(
            "Food spawned at ({}, {}) from {} free cells",
            pos.x,
            pos.y,
            free.len()
        );
        Some(Food { position: pos })
    }
}
