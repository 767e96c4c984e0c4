//! Host key mapping
//!
//! Key names follow the browser `KeyboardEvent.key` values. Matching is
//! case-insensitive so held Shift does not drop a direction.

use crate::sim::state::Direction;

/// A discrete action decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    /// Enter the nearby station
    Select,
    /// Return the rocket to the start and stop any tour
    ResetJourney,
    /// Jump straight to a station (0-based index)
    JumpTo(usize),
}

impl Direction {
    /// `w`/`ArrowUp`, `s`/`ArrowDown`, `a`/`ArrowLeft`, `d`/`ArrowRight`
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Direction::Up),
            "s" | "arrowdown" => Some(Direction::Down),
            "a" | "arrowleft" => Some(Direction::Left),
            "d" | "arrowright" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl Command {
    pub fn from_key(key: &str) -> Option<Self> {
        if let Some(direction) = Direction::from_key(key) {
            return Some(Command::Steer(direction));
        }
        match key.to_lowercase().as_str() {
            " " | "space" | "spacebar" | "enter" => Some(Command::Select),
            "escape" | "esc" => Some(Command::ResetJourney),
            digit => match digit.parse::<usize>() {
                Ok(n @ 1..=9) => Some(Command::JumpTo(n - 1)),
                _ => None,
            },
        }
    }
}
