use std::collections::VecDeque;

use Direction::*;

/// A cell on the playfield, in one-indexed terminal coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Point::new(self.x + dx, self.y + dy)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// The border lines of the board. Everything strictly between them is playable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Row 1 is kept for the HUD, so the top border sits on row 2.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Bounds { min_x: 1, max_x: cols as i32, min_y: 2, max_y: rows as i32 }
    }

    pub fn contains_interior(&self, p: Point) -> bool {
        p.x > self.min_x && p.x < self.max_x && p.y > self.min_y && p.y < self.max_y
    }

    pub fn interior_cells(&self) -> impl Iterator<Item = Point> + '_ {
        (self.min_y + 1..self.max_y)
            .flat_map(move |y| (self.min_x + 1..self.max_x).map(move |x| Point::new(x, y)))
    }

    pub fn interior_area(&self) -> usize {
        let w = (self.max_x - self.min_x - 1).max(0) as usize;
        let h = (self.max_y - self.min_y - 1).max(0) as usize;
        w * h
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    /// The head ran into one of the snake's own segments.
    Body,
}

/// What a single `advance` changed on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub previous_head: Point,
    pub vacated: Point,
}

pub struct Snake {
    body: VecDeque<Point>,
    direction: Direction,
    last_vacated: Option<Point>,
}

impl Snake {
    /// Builds a straight snake with its head at `head`, the rest trailing
    /// away from `direction`.
    pub fn new(head: Point, size: usize, direction: Direction) -> Self {
        let behind = direction.opposite();
        let mut body = VecDeque::with_capacity(size.max(1));
        let mut pos = head;

        for _ in 0..size.max(1) {
            body.push_back(pos);
            pos = pos.step(behind);
        }

        Snake { body, direction, last_vacated: None }
    }

    #[cfg(test)]
    pub fn from_segments(segments: &[Point], direction: Direction) -> Self {
        assert!(!segments.is_empty());
        Snake { body: segments.iter().copied().collect(), direction, last_vacated: None }
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> + '_ {
        self.body.iter()
    }

    pub fn occupies(&self, p: Point) -> bool {
        self.body.contains(&p)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Turning straight back onto the neck is ignored.
    pub fn is_reversal(&self, direction: Direction) -> bool {
        direction == self.direction.opposite()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if !self.is_reversal(direction) {
            self.direction = direction;
        }
    }

    /// Moves the head one cell in `direction`; every other segment takes the
    /// cell its predecessor held.
    pub fn advance(&mut self, direction: Direction) -> Step {
        self.set_direction(direction);

        let previous_head = self.head();
        self.body.push_front(previous_head.step(self.direction));

        // Body is never empty, so there is always a tail to drop.
        let vacated = self.body.pop_back().unwrap_or(previous_head);
        self.last_vacated = Some(vacated);

        Step { previous_head, vacated }
    }

    /// Adds a segment holding `at` right behind the head.
    pub fn grow(&mut self, at: Point) {
        self.body.insert(1, at);

        // After an advance the segment behind the new one already sits on
        // `at`. Pulling the trailing segments back one cell leaves the tail
        // on the cell that advance vacated.
        if let Some(tail) = self.last_vacated.take() {
            if self.body.get(2) == Some(&at) {
                self.body.remove(2);
                self.body.push_back(tail);
            }
        }
    }

    pub fn check_collision(&self, bounds: &Bounds) -> Option<Collision> {
        let head = self.head();

        if !bounds.contains_interior(head) {
            return Some(Collision::Wall);
        }

        if self.body.iter().skip(1).any(|&p| p == head) {
            return Some(Collision::Body);
        }

        None
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
