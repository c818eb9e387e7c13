use super::types::Point;
use crate::games::SessionRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    /// Dimensions below one cell are raised to one.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn wrap(&self, x: i32, y: i32) -> Point {
        Point::new(x.rem_euclid(self.width), y.rem_euclid(self.height))
    }

    pub fn clamp(&self, x: i32, y: i32) -> Point {
        Point::new(x.clamp(0, self.width - 1), y.clamp(0, self.height - 1))
    }

    pub fn random_position(&self, rng: &mut SessionRng) -> Point {
        Point::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        )
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }
}
