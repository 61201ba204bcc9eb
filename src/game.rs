use std::io;
use std::time::Instant;

use log::{debug, info, warn};
use rand::Rng;

use crate::clock::GameClock;
use crate::config::{END_MESSAGE, INITIAL_SNAKE_LENGTH, MIN_COLS, MIN_ROWS, RESIZED_MESSAGE};
use crate::error::GameError;
use crate::food;
use crate::input::{Command, InputDecoder};
use crate::interrupt::Interrupt;
use crate::render;
use crate::snake::{Bounds, Collision, Direction, Point, Snake};
use crate::term::Terminal;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Lost,
}

/// Why a session stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    Collided(Collision),
    Interrupted,
    Resized,
    /// No free cell left for food.
    BoardFilled,
}

impl SessionEnd {
    pub fn message(&self) -> &'static str {
        match self {
            SessionEnd::Resized => RESIZED_MESSAGE,
            _ => END_MESSAGE,
        }
    }
}

/// What is printed once the terminal has been restored. A session that
/// failed part way still reports the score it reached.
#[derive(Debug)]
pub struct Summary {
    pub score: u64,
    pub outcome: Result<SessionEnd, GameError>,
}

impl Summary {
    pub fn lines(&self) -> Vec<String> {
        let last = match &self.outcome {
            Ok(end) => end.message().to_string(),
            Err(e) => e.to_string(),
        };
        vec![format!("Score: {}", self.score), last]
    }
}

pub fn check_size(cols: u16, rows: u16) -> Result<(), GameError> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        return Err(GameError::TooSmall { cols, rows });
    }
    Ok(())
}

/// One game, from the first frame to the end reason. Owns every piece of
/// mutable game state and the terminal it draws on.
pub struct SnakeGame<T: Terminal, R: Rng> {
    term: T,
    rng: R,
    size: (u16, u16),
    bounds: Bounds,
    snake: Snake,
    food: Point,
    score: u64,
    pending: Direction,
    state: GameState,
    clock: GameClock,
    decoder: InputDecoder,
}

impl<T: Terminal, R: Rng> SnakeGame<T, R> {
    pub fn new(term: T, mut rng: R) -> Result<Self, GameError> {
        let size = term.size()?;
        let (cols, rows) = size;
        check_size(cols, rows)?;

        let bounds = Bounds::for_terminal(cols, rows);
        let center = Point::new(cols as i32 / 2, rows as i32 / 2);
        let snake = Snake::new(center, INITIAL_SNAKE_LENGTH, Direction::Up);
        let food = food::place(&snake, &bounds, &mut rng).ok_or(GameError::TooSmall { cols, rows })?;

        info!("New game on a {}x{} terminal, snake at {:?}, food at {:?}", cols, rows, center, food);

        Ok(SnakeGame {
            term,
            rng,
            size,
            bounds,
            pending: snake.direction(),
            snake,
            food,
            score: 0,
            state: GameState::Running,
            clock: GameClock::new(Instant::now()),
            decoder: InputDecoder::new(),
        })
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Runs until the snake crashes, the player quits, the terminal is
    /// resized or `interrupt` is triggered.
    pub fn run(&mut self, interrupt: &Interrupt) -> io::Result<SessionEnd> {
        self.draw_all()?;
        self.clock.reset(Instant::now());

        while self.state == GameState::Running {
            if interrupt.is_set() {
                info!("Interrupted");
                return Ok(self.finish(SessionEnd::Interrupted));
            }

            let live = self.term.size()?;
            if live != self.size {
                warn!("Terminal resized from {:?} to {:?}", self.size, live);
                return Ok(self.finish(SessionEnd::Resized));
            }

            let timeout = self.clock.remaining(Instant::now(), self.score);
            if let Some(byte) = self.term.read_byte(timeout)? {
                match self.decoder.feed(byte) {
                    Some(Command::Quit) => {
                        info!("Player quit");
                        return Ok(self.finish(SessionEnd::Quit));
                    },
                    Some(Command::Turn(dir)) => self.steer(dir),
                    None => {},
                }
            }

            let now = Instant::now();
            if self.clock.is_due(now, self.score) {
                if let Some(end) = self.tick()? {
                    return Ok(end);
                }
                self.clock.reset(now);
            }
        }

        // Only reachable if run is called again after the game ended
        Ok(SessionEnd::Quit)
    }

    /// Latches a direction for the next tick. Reversing onto the neck is ignored.
    pub fn steer(&mut self, direction: Direction) {
        if self.snake.is_reversal(direction) {
            return;
        }
        if self.pending != direction {
            debug!("Pending direction {:?}", direction);
        }
        self.pending = direction;
    }

    /// Commits one move.
    pub fn tick(&mut self) -> io::Result<Option<SessionEnd>> {
        let step = self.snake.advance(self.pending);

        if let Some(collision) = self.snake.check_collision(&self.bounds) {
            info!("{:?} collision at {:?} with score {}", collision, self.snake.head(), self.score);
            return Ok(Some(self.finish(SessionEnd::Collided(collision))));
        }

        let ate = self.snake.head() == self.food;
        if ate {
            self.score += 1;
            self.snake.grow(step.previous_head);

            match food::place(&self.snake, &self.bounds, &mut self.rng) {
                Some(food) => {
                    info!("Score {}, length {}, next food at {:?}", self.score, self.snake.len(), food);
                    self.food = food;
                },
                None => {
                    info!("Board filled with score {}", self.score);
                    return Ok(Some(self.finish(SessionEnd::BoardFilled)));
                },
            }
        }

        render::draw_snake(&mut self.term, &self.snake, &[step.vacated])?;
        if ate {
            render::draw_food(&mut self.term, self.food)?;
        }
        render::draw_hud(&mut self.term, self.score)?;
        self.term.flush()?;

        Ok(None)
    }

    fn draw_all(&mut self) -> io::Result<()> {
        render::draw_frame(&mut self.term, &self.bounds)?;
        render::draw_hud(&mut self.term, self.score)?;
        render::draw_snake(&mut self.term, &self.snake, &[])?;
        render::draw_food(&mut self.term, self.food)?;
        self.term.flush()
    }

    fn finish(&mut self, end: SessionEnd) -> SessionEnd {
        self.state = GameState::Lost;
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::tick_interval;
    use crate::config::{FOOD_CHAR, SNAKE_BODY_CHAR};
    use crate::term::Recorder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn game(cols: u16, rows: u16) -> SnakeGame<Recorder, StdRng> {
        SnakeGame::new(Recorder::new(cols, rows), StdRng::seed_from_u64(42)).unwrap()
    }

    /// Moves the food somewhere it will not interfere.
    fn park_food(game: &mut SnakeGame<Recorder, StdRng>) {
        game.food = Point::new(game.bounds.max_x - 1, game.bounds.max_y - 1);
    }

    fn body(game: &SnakeGame<Recorder, StdRng>) -> Vec<Point> {
        game.snake.segments().copied().collect()
    }

    #[test]
    fn rejects_small_terminals() {
        for (cols, rows) in [(23, 12), (24, 11), (10, 5)] {
            let res = SnakeGame::new(Recorder::new(cols, rows), StdRng::seed_from_u64(0));
            assert!(matches!(res, Err(GameError::TooSmall { .. })));
        }
        assert!(SnakeGame::new(Recorder::new(24, 12), StdRng::seed_from_u64(0)).is_ok());
    }

    #[test]
    fn starts_centered_heading_up() {
        let game = game(40, 20);
        assert_eq!(body(&game), vec![Point::new(20, 10), Point::new(20, 11), Point::new(20, 12)]);
        assert_eq!(game.pending, Direction::Up);
        assert_eq!(game.state(), GameState::Running);
        assert!(!game.snake.occupies(game.food));
    }

    #[test]
    fn running_up_hits_the_top_border() {
        let mut game = game(40, 20);
        park_food(&mut game);

        let center_y = 10;
        for _ in 0..center_y - 3 {
            assert_eq!(game.tick().unwrap(), None);
        }
        assert_eq!(game.tick().unwrap(), Some(SessionEnd::Collided(Collision::Wall)));
        assert_eq!(game.score(), 0);
        assert_eq!(game.state(), GameState::Lost);
    }

    #[test]
    fn eating_food_scores_and_grows() {
        let mut game = game(40, 20);
        game.food = Point::new(20, 9);

        assert_eq!(game.tick().unwrap(), None);
        assert_eq!(game.score(), 1);
        assert_eq!(game.snake.len(), 4);
        assert_eq!(body(&game)[1], Point::new(20, 10));
        assert!(!game.snake.occupies(game.food));
        assert_eq!(game.term.glyph(game.food), FOOD_CHAR);
        assert!(game.term.row_text(1).starts_with(" Score: 1 "));
    }

    #[test]
    fn reversal_leaves_pending_untouched() {
        let mut game = game(40, 20);
        game.steer(Direction::Down);
        assert_eq!(game.pending, Direction::Up);

        game.steer(Direction::Left);
        assert_eq!(game.pending, Direction::Left);

        // Still judged against the active direction, not the pending one
        game.steer(Direction::Right);
        assert_eq!(game.pending, Direction::Right);
        game.steer(Direction::Down);
        assert_eq!(game.pending, Direction::Right);
    }

    #[test]
    fn pending_direction_applies_on_the_next_tick() {
        let mut game = game(40, 20);
        park_food(&mut game);

        game.steer(Direction::Left);
        assert_eq!(game.snake.direction(), Direction::Up);

        game.tick().unwrap();
        assert_eq!(game.snake.head(), Point::new(19, 10));
        assert_eq!(game.snake.direction(), Direction::Left);
    }

    #[test]
    fn self_collision_ends_the_game() {
        let mut game = game(40, 20);
        park_food(&mut game);
        game.snake = Snake::from_segments(&[
            Point::new(10, 10),
            Point::new(11, 10),
            Point::new(11, 11),
            Point::new(10, 11),
            Point::new(9, 11),
        ], Direction::Left);
        game.pending = Direction::Left;

        game.steer(Direction::Down);
        assert_eq!(game.tick().unwrap(), Some(SessionEnd::Collided(Collision::Body)));
    }

    #[test]
    fn ticks_redraw_only_what_moved() {
        let mut game = game(40, 20);
        park_food(&mut game);
        game.draw_all().unwrap();
        let clears = game.term.clears;

        let flushes = game.term.flushes;
        game.tick().unwrap();
        assert_eq!(game.term.clears, clears);
        assert_eq!(game.term.flushes, flushes + 1);
        assert_eq!(game.term.glyph(Point::new(20, 9)), '^');
        assert_eq!(game.term.glyph(Point::new(20, 12)), ' ');
        assert_eq!(game.term.count(SNAKE_BODY_CHAR), 2);
    }

    #[test]
    fn quit_key_ends_the_run() {
        let mut game = SnakeGame::new(
            Recorder::new(40, 20).with_input(b"\x1b[Dq"),
            StdRng::seed_from_u64(1),
        ).unwrap();

        let end = game.run(&Interrupt::new()).unwrap();
        assert_eq!(end, SessionEnd::Quit);
        assert_eq!(end.message(), "Good Game");
        assert_eq!(game.pending, Direction::Left);
        // Quit comes before the first tick is due
        assert_eq!(body(&game)[0], Point::new(20, 10));
        assert_eq!(game.state(), GameState::Lost);
    }

    #[test]
    fn interrupt_stops_the_run() {
        let mut game = game(40, 20);
        let interrupt = Interrupt::new();
        interrupt.trigger();

        assert_eq!(game.run(&interrupt).unwrap(), SessionEnd::Interrupted);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn interrupt_during_run_stops_within_a_tick() {
        let mut game = game(40, 20);
        park_food(&mut game);
        let interrupt = Interrupt::new();
        let handle = interrupt.clone();
        let raised_after = Duration::from_millis(600);

        let started = Instant::now();
        let trigger = std::thread::spawn(move || {
            std::thread::sleep(raised_after);
            handle.trigger();
        });
        let end = game.run(&interrupt).unwrap();
        let elapsed = started.elapsed();
        trigger.join().unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert!(elapsed >= raised_after);
        assert!(elapsed < raised_after + tick_interval(0) + Duration::from_millis(150), "{:?}", elapsed);
        // The snake moved before the flag went up and stopped after it
        assert!(game.snake.head().y < 10);
        assert_eq!(game.state(), GameState::Lost);
    }

    #[test]
    fn poll_timeout_tracks_time_left_in_the_tick() {
        let mut game = SnakeGame::new(
            Recorder::new(40, 20).with_input(b"xyz"),
            StdRng::seed_from_u64(5),
        ).unwrap();
        park_food(&mut game);
        // Two ticks from the top border
        game.snake = Snake::new(Point::new(20, 4), 3, Direction::Up);
        game.term.byte_delay = Duration::from_millis(100);

        let end = game.run(&Interrupt::new()).unwrap();
        assert_eq!(end, SessionEnd::Collided(Collision::Wall));

        let interval = tick_interval(0);
        let timeouts = &game.term.timeouts;
        assert!(timeouts.len() >= 5, "{:?}", timeouts);
        assert!(timeouts.iter().all(|&t| t <= interval));

        // Three bytes 100ms apart, then a wait for the rest of the tick
        for pair in timeouts[..4].windows(2) {
            assert!(pair[1] + Duration::from_millis(50) < pair[0], "{:?}", timeouts);
        }
        assert!(timeouts[3] < Duration::from_millis(200), "{:?}", timeouts);

        // After the first tick the countdown starts over
        assert!(timeouts[4] > Duration::from_millis(350), "{:?}", timeouts);
    }

    #[test]
    fn summary_reports_score_on_every_path() {
        let done = Summary { score: 3, outcome: Ok(SessionEnd::Collided(Collision::Body)) };
        assert_eq!(done.lines(), vec!["Score: 3", "Good Game"]);

        let resized = Summary { score: 0, outcome: Ok(SessionEnd::Resized) };
        assert_eq!(resized.lines(), vec!["Score: 0", "YOU CHANGED THE SCREEN SIZE!!!"]);

        let failed = Summary {
            score: 7,
            outcome: Err(io::Error::new(io::ErrorKind::UnexpectedEof, "standard input closed").into()),
        };
        assert_eq!(failed.lines(), vec!["Score: 7", "Terminal error: standard input closed"]);
    }

    #[test]
    fn resize_ends_the_run() {
        for (cols, rows) in [(41, 20), (40, 21)] {
            let mut game = game(40, 20);
            game.term.cols = cols;
            game.term.rows = rows;

            let end = game.run(&Interrupt::new()).unwrap();
            assert_eq!(end, SessionEnd::Resized);
            assert_eq!(end.message(), "YOU CHANGED THE SCREEN SIZE!!!");
        }
    }

    #[test]
    fn run_ends_on_collision() {
        let mut game = game(40, 20);
        park_food(&mut game);
        game.snake = Snake::new(Point::new(20, 3), 3, Direction::Up);

        let started = Instant::now();
        let end = game.run(&Interrupt::new()).unwrap();
        assert_eq!(end, SessionEnd::Collided(Collision::Wall));
        assert!(started.elapsed() >= Duration::from_millis(425));
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut game = game(24, 12);
        // Snake covering every interior cell but the one in front of its head
        let mut cells: Vec<Point> = game.bounds.interior_cells().collect();
        let food = cells.remove(0);
        let head = cells.remove(0);
        let mut segments = vec![head];
        segments.extend(cells);
        game.snake = Snake::from_segments(&segments, Direction::Left);
        game.pending = Direction::Left;
        game.food = food;

        assert_eq!(game.tick().unwrap(), Some(SessionEnd::BoardFilled));
        assert_eq!(game.score(), 1);
    }
}
