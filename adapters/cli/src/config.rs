//! TOML configuration for the terminal demo.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use snake_core::CellCoord;
use snake_world::Setup;

/// Parameters describing the board and the run, as read from TOML.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) board: BoardConfig,
    pub(crate) snake: SnakeConfig,
    pub(crate) apple: AppleConfig,
    pub(crate) run: RunConfig,
}

/// Dimensions of the board in cells.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardConfig {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
        }
    }
}

/// Starting cell and speed settings of the head.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SnakeConfig {
    pub(crate) column: u32,
    pub(crate) row: u32,
    pub(crate) speed: f32,
    pub(crate) speed_up_factor: f32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            column: 1,
            row: 1,
            speed: 1.0,
            speed_up_factor: 1.0,
        }
    }
}

/// Starting cell of the apple.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppleConfig {
    pub(crate) column: u32,
    pub(crate) row: u32,
}

impl Default for AppleConfig {
    fn default() -> Self {
        Self { column: 5, row: 1 }
    }
}

/// Fixed timestep and generator seed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunConfig {
    pub(crate) tick_millis: u64,
    pub(crate) seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_millis: 1000,
            seed: 0x5eed,
        }
    }
}

/// Reasons a configuration cannot describe a playable board.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("board must have at least one column and one row, got {columns}x{rows}")]
    EmptyBoard { columns: u32, rows: u32 },
    #[error("{what} cell {cell} lies outside the {columns}x{rows} board")]
    OutOfBounds {
        what: &'static str,
        cell: CellCoord,
        columns: u32,
        rows: u32,
    },
    #[error("head and apple both start on {cell}")]
    Overlap { cell: CellCoord },
    #[error("speed {speed} and speed-up factor {factor} must be positive and finite")]
    InvalidSpeed { speed: f32, factor: f32 },
    #[error("tick duration must be positive")]
    ZeroTick,
    #[error("head would travel {cells} cells per tick; at most one is allowed")]
    TooFast { cells: f32 },
}

impl Config {
    /// Reads the configuration file, or falls back to the defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    pub(crate) fn head_cell(&self) -> CellCoord {
        CellCoord::new(self.snake.column, self.snake.row)
    }

    pub(crate) fn apple_cell(&self) -> CellCoord {
        CellCoord::new(self.apple.column, self.apple.row)
    }

    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.run.tick_millis)
    }

    /// Rejects boards the gameplay systems cannot run on.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let BoardConfig { columns, rows } = self.board;
        if columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyBoard { columns, rows });
        }

        for (what, cell) in [("head", self.head_cell()), ("apple", self.apple_cell())] {
            if cell.column() >= columns || cell.row() >= rows {
                return Err(ConfigError::OutOfBounds {
                    what,
                    cell,
                    columns,
                    rows,
                });
            }
        }
        if self.head_cell() == self.apple_cell() {
            return Err(ConfigError::Overlap {
                cell: self.head_cell(),
            });
        }

        let SnakeConfig {
            speed,
            speed_up_factor: factor,
            ..
        } = self.snake;
        if !(speed.is_finite() && factor.is_finite() && speed > 0.0 && factor > 0.0) {
            return Err(ConfigError::InvalidSpeed { speed, factor });
        }
        if self.run.tick_millis == 0 {
            return Err(ConfigError::ZeroTick);
        }

        // The trailing system rejects any jump of more than one cell.
        let cells = speed * factor.max(1.0) * self.tick().as_secs_f32();
        if cells > 1.0 {
            return Err(ConfigError::TooFast { cells });
        }
        Ok(())
    }

    /// Builds the world setup described by the configuration.
    pub(crate) fn setup(&self) -> Setup {
        Setup::new(self.board.columns, self.board.rows, self.head_cell())
            .with_speed(self.snake.speed)
            .with_speed_up_factor(self.snake.speed_up_factor)
            .with_apple(self.apple_cell())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.head_cell(), CellCoord::new(1, 1));
        assert_eq!(config.apple_cell(), CellCoord::new(5, 1));
        assert_eq!(config.run.seed, 0x5eed);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: Config = toml::from_str(
            r#"
            [board]
            columns = 4
            rows = 3

            [apple]
            column = 3
            row = 2
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.board, BoardConfig { columns: 4, rows: 3 });
        assert_eq!(config.apple_cell(), CellCoord::new(3, 2));
        assert_eq!(config.snake, SnakeConfig::default());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed: Result<Config, _> = toml::from_str("[board]\nwidth = 4\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_board_is_rejected() {
        let mut config = Config::default();
        config.board.rows = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyBoard {
                columns: 8,
                rows: 0,
            })
        );
    }

    #[test]
    fn apple_outside_the_board_is_rejected() {
        let mut config = Config::default();
        config.apple.column = 8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfBounds { what: "apple", .. })
        ));
    }

    #[test]
    fn head_and_apple_must_differ() {
        let mut config = Config::default();
        config.apple = AppleConfig { column: 1, row: 1 };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Overlap {
                cell: CellCoord::new(1, 1),
            })
        );
    }

    #[test]
    fn speed_up_must_not_skip_cells() {
        let mut config = Config::default();
        config.snake.speed_up_factor = 2.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFast { cells: 2.0 })
        );

        config.run.tick_millis = 500;
        assert_eq!(config.validate(), Ok(()));
    }
}
