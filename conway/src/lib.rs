// lib.rs - Conway's Game of Life: board, generation engine and timed scheduler

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;

pub use board::{Board, CellPos};
pub use config::{ConfigError, SimulationConfig};
pub use engine::SimulationEngine;
pub use error::{Result, SimError};
pub use scheduler::{LiveCellsSink, RunState, Scheduler};
