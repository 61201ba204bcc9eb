use rand::Rng;
use rand::seq::IteratorRandom;

use crate::snake::{Bounds, Point, Snake};

/// Random samples tried before falling back to scanning for free cells.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// Picks a uniformly random interior cell not covered by the snake.
/// `None` means the snake fills the whole interior.
pub fn place<R: Rng>(snake: &Snake, bounds: &Bounds, rng: &mut R) -> Option<Point> {
    if bounds.interior_area() == 0 {
        return None;
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Point::new(
            rng.gen_range(bounds.min_x + 1..bounds.max_x),
            rng.gen_range(bounds.min_y + 1..bounds.max_y),
        );
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    bounds.interior_cells().filter(|&p| !snake.occupies(p)).choose(rng)
}
