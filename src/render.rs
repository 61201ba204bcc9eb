//! Drawing. The frame is drawn once per session; after that every tick only
//! touches the cells that changed, so the screen is never cleared mid-game.

use std::io;

use crate::config::{BLANK_CHAR, FOOD_CHAR, FRAME_CHAR, INSTRUCTIONS, SNAKE_BODY_CHAR};
use crate::snake::{Bounds, Point, Snake};
use crate::term::{Style, Terminal};

pub const HUD_ANCHOR: Point = Point::new(1, 1);

/// Border lines plus the instruction text centred on the bottom one.
pub fn draw_frame<T: Terminal>(term: &mut T, bounds: &Bounds) -> io::Result<()> {
    term.clear()?;

    for x in bounds.min_x..=bounds.max_x {
        term.print_at(Point::new(x, bounds.min_y), FRAME_CHAR, Style::Highlight)?;
        term.print_at(Point::new(x, bounds.max_y), FRAME_CHAR, Style::Highlight)?;
    }

    for y in bounds.min_y + 1..bounds.max_y {
        term.print_at(Point::new(bounds.min_x, y), FRAME_CHAR, Style::Highlight)?;
        term.print_at(Point::new(bounds.max_x, y), FRAME_CHAR, Style::Highlight)?;
    }

    let room = (bounds.max_x - bounds.min_x - 1).max(0) as usize;
    let text: String = INSTRUCTIONS.chars().take(room).collect();
    let start = bounds.min_x + 1 + (room - text.chars().count()) as i32 / 2;
    term.print_str_at(Point::new(start, bounds.max_y), &text, Style::Highlight)?;

    term.flush()
}

pub fn draw_hud<T: Terminal>(term: &mut T, score: u64) -> io::Result<()> {
    term.print_str_at(HUD_ANCHOR, &format!(" Score: {} ", score), Style::Highlight)
}

/// Draws every segment and blanks the cells given up this tick.
pub fn draw_snake<T: Terminal>(term: &mut T, snake: &Snake, vacated: &[Point]) -> io::Result<()> {
    for &pos in vacated {
        if !snake.occupies(pos) {
            term.print_at(pos, BLANK_CHAR, Style::Plain)?;
        }
    }

    for (i, &pos) in snake.segments().enumerate() {
        let ch = if i == 0 {snake.head_char()} else {SNAKE_BODY_CHAR};
        term.print_at(pos, ch, Style::Plain)?;
    }

    Ok(())
}

pub fn draw_food<T: Terminal>(term: &mut T, food: Point) -> io::Result<()> {
    term.print_at(food, FOOD_CHAR, Style::Plain)
}
