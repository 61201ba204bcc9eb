mod clock;
mod config;
mod error;
mod food;
mod game;
mod input;
mod interrupt;
mod render;
mod snake;
mod term;

use std::fs::File;
use std::process::exit;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::config::LogSettings;
use crate::error::GameError;
use crate::game::{SnakeGame, Summary};
use crate::interrupt::Interrupt;
use crate::term::Tty;

fn main() {
    init_logging(&LogSettings::from_env());

    match play() {
        Ok(summary) => {
            if let Err(e) = &summary.outcome {
                log::error!("Session failed: {}", e);
            }
            for line in summary.lines() {
                println!("{}", line);
            }
        },
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
        },
    }

    // Every way out of a session, good or bad, reports 1
    exit(1);
}

/// Errors before the first frame end the program here; anything after that
/// still produces a summary with the score reached.
fn play() -> Result<Summary, GameError> {
    let interrupt = Interrupt::install()?;
    let mut game = SnakeGame::new(Tty::new()?, rand::thread_rng())?;

    let outcome = game.run(&interrupt).map_err(GameError::from);
    let score = game.score();
    log::info!("Session over: {:?}, state {:?}, score {}", outcome, game.state(), score);

    // Dropping the game restores the terminal before the summary is printed
    drop(game);
    Ok(Summary { score, outcome })
}

fn init_logging(settings: &LogSettings) {
    if settings.level == LevelFilter::Off {
        return;
    }

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&settings.path) {
        let _ = WriteLogger::init(settings.level, log_config, log_file);
    }
}
