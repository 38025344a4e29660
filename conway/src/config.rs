// config.rs - Startup options for a simulation

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::board::Board;
use crate::error::SimError;

/// Canvas the grid was originally laid out on: 400x400 px in 20 px cells.
pub const CANVAS_WIDTH: u32 = 400;
pub const CANVAS_HEIGHT: u32 = 400;
pub const CELL_SIZE: u32 = 20;
pub const DEFAULT_INTERVAL_MS: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] SimError),
}

/// Grid size, initial interval and initial running state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rows: usize,
    pub cols: usize,
    pub interval_ms: i64,
    pub running: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::from_canvas(CANVAS_WIDTH, CANVAS_HEIGHT, CELL_SIZE)
    }
}

impl SimulationConfig {
    /// Rows and columns that fit a `width x height` pixel canvas.
    ///
    /// Not validated: a canvas smaller than one cell gives 0 rows or columns,
    /// which `validate()` (and `Board::new`) rejects.
    pub fn from_canvas(width: u32, height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            rows: (height / cell_size) as usize,
            cols: (width / cell_size) as usize,
            interval_ms: DEFAULT_INTERVAL_MS,
            running: false,
        }
    }

    /// Parse from YAML. Missing keys keep their defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        Board::new(self.rows, self.cols)?;
        interval_from_millis(self.interval_ms)?;
        Ok(())
    }

    pub fn interval(&self) -> Result<Duration, SimError> {
        interval_from_millis(self.interval_ms)
    }
}

/// Positive millisecond count as a `Duration`.
pub fn interval_from_millis(ms: i64) -> Result<Duration, SimError> {
    match u64::try_from(ms) {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(SimError::InvalidInterval(ms)),
    }
}
