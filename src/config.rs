use std::env;
use std::path::PathBuf;

use simplelog::LevelFilter;

pub const MIN_COLS: u16 = 24;
pub const MIN_ROWS: u16 = 12;

pub const INITIAL_SNAKE_LENGTH: usize = 3;

pub const SNAKE_BODY_CHAR: char = '#';
pub const FOOD_CHAR: char = '@';
pub const BLANK_CHAR: char = ' ';
pub const FRAME_CHAR: char = ' ';

pub const INSTRUCTIONS: &str = "arrows move, q quits";

pub const END_MESSAGE: &str = "Good Game";
pub const RESIZED_MESSAGE: &str = "YOU CHANGED THE SCREEN SIZE!!!";

const DEFAULT_LOG_FILE: &str = "snake.log";
const LOG_LEVEL_VAR: &str = "SNAKE_LOG";
const LOG_FILE_VAR: &str = "SNAKE_LOG_FILE";

/// Where and how much to log. The terminal is the playfield, so logs go to a file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub path: PathBuf,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_values(env::var(LOG_LEVEL_VAR).ok(), env::var(LOG_FILE_VAR).ok())
    }

    fn from_values(level: Option<String>, path: Option<String>) -> Self {
        let level = level
            .and_then(|s| s.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let path = path
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        LogSettings { level, path }
    }
}
