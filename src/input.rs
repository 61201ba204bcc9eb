use crate::snake::Direction;

const ESC: u8 = 27;
const QUIT: u8 = b'q';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Idle,
    AwaitingBracket,
    AwaitingArrow,
}

/// Turns raw terminal bytes into commands. Arrow keys arrive as `ESC [ A..D`,
/// possibly split over several reads, so the state survives between calls.
pub struct InputDecoder {
    state: State,
}

impl InputDecoder {
    pub fn new() -> Self {
        InputDecoder { state: State::Idle }
    }

    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        let (next, command) = match (self.state, byte) {
            (State::Idle, ESC) => (State::AwaitingBracket, None),
            (State::Idle, QUIT) => (State::Idle, Some(Command::Quit)),
            (State::Idle, _) => (State::Idle, None),
            (State::AwaitingBracket, b'[') => (State::AwaitingArrow, None),
            (State::AwaitingArrow, b'A') => (State::Idle, Some(Command::Turn(Direction::Up))),
            (State::AwaitingArrow, b'B') => (State::Idle, Some(Command::Turn(Direction::Down))),
            (State::AwaitingArrow, b'C') => (State::Idle, Some(Command::Turn(Direction::Right))),
            (State::AwaitingArrow, b'D') => (State::Idle, Some(Command::Turn(Direction::Left))),
            // Anything unexpected mid-sequence is swallowed
            _ => (State::Idle, None),
        };

        self.state = next;
        command
    }
}
