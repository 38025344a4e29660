// main.rs - Desktop front end for the Game of Life simulation

use std::path::Path;

use anyhow::Context;
use conway::SimulationConfig;
use conway::config::CELL_SIZE;
use eframe::egui;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod runner;
mod ui;

use runner::SimHandle;
use ui::GridDisplay;

const CONFIG_PATH: &str = "conway-config.yaml";

/// Simulation options plus how large each cell is drawn.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DisplayConfig {
    #[serde(flatten)]
    simulation: SimulationConfig,
    cell_size: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { simulation: SimulationConfig::default(), cell_size: CELL_SIZE as f32 }
    }
}

fn load_config(path: &Path) -> anyhow::Result<DisplayConfig> {
    if !path.exists() {
        info!("config file not found, using defaults");
        return Ok(DisplayConfig::default());
    }
    let contents = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config: DisplayConfig = serde_yml::from_str(&contents).context("failed to parse config YAML")?;
    config.simulation.validate().context("invalid simulation config")?;
    anyhow::ensure!(config.cell_size > 0.0, "cell_size must be positive, got {}", config.cell_size);
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config(Path::new(CONFIG_PATH))?;
    let DisplayConfig { simulation, cell_size } = config;
    info!(
        rows = simulation.rows,
        cols = simulation.cols,
        interval_ms = simulation.interval_ms,
        running = simulation.running,
        "configuration loaded"
    );

    let sim = SimHandle::spawn(simulation.clone())?;
    let app = GridDisplay::new(sim, simulation.rows, simulation.cols, cell_size, simulation.interval_ms);

    let width = simulation.cols as f32 * cell_size + 40.0;
    let height = simulation.rows as f32 * cell_size + 160.0;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width.max(480.0), height]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("window closed with error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config_reads_simulation_keys_at_top_level() {
        let config: DisplayConfig = serde_yml::from_str("rows: 10\ncols: 30\ncell_size: 12\n").unwrap();
        assert_eq!(config.simulation.rows, 10);
        assert_eq!(config.simulation.cols, 30);
        assert_eq!(config.simulation.interval_ms, 100);
        assert_eq!(config.cell_size, 12.0);
    }

    #[test]
    fn missing_config_file_means_defaults() {
        let config = load_config(Path::new("no-such-dir/conway-config.yaml")).unwrap();
        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.cell_size, 20.0);
    }
}
