//! Scripted player input, one character per tick.

use std::str::FromStr;

use snake_core::{Command, Direction};

/// Input issued on a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Press(Direction),
    SpeedUp(bool),
    Idle,
}

impl Step {
    fn command(self) -> Option<Command> {
        match self {
            Self::Press(direction) => Some(Command::PressDirection { direction }),
            Self::SpeedUp(held) => Some(Command::SetSpeedUp { held }),
            Self::Idle => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown move {found:?} at position {index}; expected one of U D L R + - .")]
pub(crate) struct ScriptError {
    found: char,
    index: usize,
}

/// Sequence of steps replayed by the demo loop. Whitespace is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Command to apply on the given tick; ticks past the end are idle.
    pub(crate) fn command(&self, tick: usize) -> Option<Command> {
        self.steps.get(tick).and_then(|step| step.command())
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(moves: &str) -> Result<Self, Self::Err> {
        let steps = moves
            .chars()
            .filter(|found| !found.is_whitespace())
            .enumerate()
            .map(|(index, found)| {
                let step = match found.to_ascii_uppercase() {
                    'U' => Step::Press(Direction::Up),
                    'D' => Step::Press(Direction::Down),
                    'L' => Step::Press(Direction::Left),
                    'R' => Step::Press(Direction::Right),
                    '+' => Step::SpeedUp(true),
                    '-' => Step::SpeedUp(false),
                    '.' => Step::Idle,
                    _ => return Err(ScriptError { found, index }),
                };
                Ok(step)
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { steps })
    }
}
