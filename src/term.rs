use std::io::{self, Stdout, Write, stdout};
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Attribute;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::{debug, warn};
use termios::{ECHO, ICANON, TCSANOW, Termios, VMIN, VTIME, tcsetattr};

use crate::snake::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Inverse video, used for the frame and HUD.
    Highlight,
}

/// What the game needs from a terminal. Positions are one-indexed.
pub trait Terminal {
    /// `(columns, rows)`
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Waits up to `timeout` for a single input byte.
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;

    fn print_at(&mut self, pos: Point, ch: char, style: Style) -> io::Result<()>;

    fn print_str_at(&mut self, pos: Point, text: &str, style: Style) -> io::Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at(Point::new(pos.x + i as i32, pos.y), ch, style)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// The real terminal. Holds raw input mode and the alternate screen for as
/// long as it lives and puts everything back when dropped.
pub struct Tty {
    stdout: Stdout,
    saved_mode: Termios,
}

impl Tty {
    pub fn new() -> io::Result<Self> {
        let saved_mode = set_input_mode()?;
        let mut tty = Tty { stdout: stdout(), saved_mode };

        execute!(tty.stdout, EnterAlternateScreen, cursor::Hide, terminal::Clear(ClearType::All))?;
        debug!("Terminal set up (no echo, unbuffered input, cursor hidden)");

        Ok(tty)
    }

    fn restore(&mut self) -> io::Result<()> {
        tcsetattr(io::stdin().as_raw_fd(), TCSANOW, &self.saved_mode)?;
        execute!(
            self.stdout,
            style::SetAttribute(Attribute::Reset),
            cursor::Show,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            LeaveAlternateScreen
        )
    }
}

impl Drop for Tty {
    fn drop(&mut self) {
        match self.restore() {
            Ok(()) => debug!("Terminal restored"),
            Err(e) => warn!("Failed to restore terminal: {}", e),
        }
    }
}

impl Terminal for Tty {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        let mut fds = libc::pollfd { fd: libc::STDIN_FILENO, events: libc::POLLIN, revents: 0 };
        // Round up so a sub-millisecond wait does not turn into a spin
        let millis = timeout.as_micros().div_ceil(1000).min(libc::c_int::MAX as u128) as libc::c_int;

        let ready = unsafe { libc::poll(&mut fds, 1, millis) };
        if ready < 0 {
            return ignore_interrupted(io::Error::last_os_error());
        }
        if !poll_readable(ready, fds.revents)? {
            return Ok(None);
        }

        // Read straight from the descriptor: a buffered reader would hide
        // pending bytes from the next poll.
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, &mut byte as *mut u8 as *mut libc::c_void, 1) };
        match n {
            1 => Ok(Some(byte)),
            0 => Err(closed_input()),
            _ => ignore_interrupted(io::Error::last_os_error()),
        }
    }

    fn print_at(&mut self, pos: Point, ch: char, style: Style) -> io::Result<()> {
        self.print_str_at(pos, ch.encode_utf8(&mut [0; 4]), style)
    }

    fn print_str_at(&mut self, pos: Point, text: &str, style: Style) -> io::Result<()> {
        if pos.x < 1 || pos.y < 1 {
            return Ok(());
        }

        let to = cursor::MoveTo(pos.x as u16 - 1, pos.y as u16 - 1);
        match style {
            Style::Plain => queue!(self.stdout, to, style::Print(text)),
            Style::Highlight => queue!(
                self.stdout,
                to,
                style::SetAttribute(Attribute::Reverse),
                style::Print(text),
                style::SetAttribute(Attribute::NoReverse)
            ),
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// Switches stdin to the game's input mode and returns the previous one.
fn set_input_mode() -> io::Result<Termios> {
    let stdin = io::stdin().as_raw_fd();
    let saved = Termios::from_fd(stdin)?;
    tcsetattr(stdin, TCSANOW, &input_mode(saved))?;
    Ok(saved)
}

/// Line buffering and echo off, reads never wait. Signals stay on so
/// Ctrl+C still raises SIGINT.
fn input_mode(mut mode: Termios) -> Termios {
    mode.c_lflag &= !(ICANON | ECHO);
    mode.c_cc[VMIN] = 0;
    mode.c_cc[VTIME] = 0;
    mode
}

/// Whether poll left a byte to read. A hangup with nothing pending means
/// stdin is gone and every later poll would return at once.
fn poll_readable(ready: libc::c_int, revents: libc::c_short) -> io::Result<bool> {
    if ready == 0 {
        return Ok(false);
    }
    if revents & libc::POLLIN != 0 {
        return Ok(true);
    }
    if revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0 {
        return Err(closed_input());
    }
    Ok(false)
}

fn closed_input() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "standard input closed")
}

/// A signal landing mid-poll is not an error; the loop checks its stop flag next.
fn ignore_interrupted(err: io::Error) -> io::Result<Option<u8>> {
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
        _ => Err(err),
    }
}

#[cfg(test)]
pub use recorder::Recorder;
