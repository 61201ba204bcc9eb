use std::fmt;
use std::io;

use crate::config::{MIN_COLS, MIN_ROWS};

#[derive(Debug)]
pub enum GameError {
    /// The terminal cannot fit a playable board.
    TooSmall { cols: u16, rows: u16 },
    Io(io::Error),
    Signal(ctrlc::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::TooSmall { cols, rows } => write!(
                f,
                "Screen too small: {}x{}, need at least {}x{}",
                cols, rows, MIN_COLS, MIN_ROWS
            ),
            GameError::Io(e) => write!(f, "Terminal error: {}", e),
            GameError::Signal(e) => write!(f, "Could not install interrupt handler: {}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::TooSmall { .. } => None,
            GameError::Io(e) => Some(e),
            GameError::Signal(e) => Some(e),
        }
    }
}

impl From<io::Error> for GameError {
    fn from(e: io::Error) -> Self {
        GameError::Io(e)
    }
}

impl From<ctrlc::Error> for GameError {
    fn from(e: ctrlc::Error) -> Self {
        GameError::Signal(e)
    }
}
