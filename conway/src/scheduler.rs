// scheduler.rs - Run/stop loop that advances the engine on a timer
//
// Everything here lives on one thread. The recurring tick is a task spawned on
// the caller's `LocalSet` that sleeps, advances, publishes, then sleeps again;
// its JoinHandle is the pending-timer handle and `stop()` aborts it. A task is
// never polled again after `abort()` on a single thread, so no advance runs
// after `stop()` returns.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tokio::task::{JoinHandle, LocalSet};
use tracing::{debug, info, warn};

use crate::board::CellPos;
use crate::config::{interval_from_millis, SimulationConfig};
use crate::engine::SimulationEngine;
use crate::error::Result;

/// Receives the live cells after construction, every toggle and every generation.
pub trait LiveCellsSink {
    fn publish(&self, generation: u64, cells: &[CellPos]);
}

impl<F: Fn(u64, &[CellPos])> LiveCellsSink for F {
    fn publish(&self, generation: u64, cells: &[CellPos]) {
        self(generation, cells)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

pub struct Scheduler {
    engine: Rc<RefCell<SimulationEngine>>,
    sink: Rc<dyn LiveCellsSink>,
    interval: Rc<Cell<Duration>>,
    state: RunState,
    tasks: Rc<LocalSet>,
    pending: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Stopped scheduler around `engine`. Publishes the initial live cells.
    ///
    /// Ticks are spawned on `tasks`; they only run while the caller drives that
    /// set (`run_until`, `block_on` or awaiting it).
    pub fn new(
        engine: SimulationEngine,
        interval_ms: i64,
        sink: impl LiveCellsSink + 'static,
        tasks: Rc<LocalSet>,
    ) -> Result<Self> {
        let interval = interval_from_millis(interval_ms)?;
        let scheduler = Self {
            engine: Rc::new(RefCell::new(engine)),
            sink: Rc::new(sink),
            interval: Rc::new(Cell::new(interval)),
            state: RunState::Stopped,
            tasks,
            pending: None,
        };
        scheduler.publish();
        Ok(scheduler)
    }

    /// Builds the engine from `config` and starts it if `config.running` is set.
    pub fn from_config(
        config: &SimulationConfig,
        sink: impl LiveCellsSink + 'static,
        tasks: Rc<LocalSet>,
    ) -> Result<Self> {
        let engine = SimulationEngine::new(config.rows, config.cols)?;
        let mut scheduler = Self::new(engine, config.interval_ms, sink, tasks)?;
        if config.running {
            scheduler.start();
        }
        Ok(scheduler)
    }

    pub fn state(&self) -> RunState { self.state }
    pub fn is_running(&self) -> bool { self.state == RunState::Running }
    pub fn interval(&self) -> Duration { self.interval.get() }

    pub fn generation(&self) -> u64 { self.engine.borrow().generation() }
    pub fn rows(&self) -> usize { self.engine.borrow().board().rows() }
    pub fn cols(&self) -> usize { self.engine.borrow().board().cols() }

    /// Advance once right away, then keep advancing every interval.
    /// No-op while already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.pending = Some(self.arm());
        self.state = RunState::Running;
        info!(interval_ms = self.interval.get().as_millis() as u64, "simulation started");

        advance_and_publish(&self.engine, self.sink.as_ref());
    }

    /// Cancel the pending tick. Safe to call in either state.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        if self.state == RunState::Running {
            self.state = RunState::Stopped;
            info!(generation = self.engine.borrow().generation(), "simulation stopped");
        }
    }

    /// Interval for future armings; a tick already waiting keeps its delay.
    pub fn set_interval(&mut self, ms: i64) -> Result<()> {
        let interval = interval_from_millis(ms)?;
        self.interval.set(interval);
        info!(interval_ms = ms, "interval changed");
        Ok(())
    }

    pub fn toggle_cell(&self, x: usize, y: usize) -> Result<()> {
        self.engine.borrow_mut().toggle_cell(x, y)?;
        self.publish();
        Ok(())
    }

    /// One manual generation, outside the timer.
    pub fn step(&self) {
        advance_and_publish(&self.engine, self.sink.as_ref());
    }

    /// Kill every cell and reset the generation counter. Leaves the run state alone.
    pub fn clear(&self) {
        self.engine.borrow_mut().clear();
        info!("board cleared");
        self.publish();
    }

    pub fn live_cells(&self) -> Vec<CellPos> {
        self.engine.borrow().live_cells()
    }

    fn publish(&self) {
        let (generation, cells) = {
            let engine = self.engine.borrow();
            (engine.generation(), engine.live_cells())
        };
        self.sink.publish(generation, &cells);
    }

    // Each tick re-arms only after it finishes, so drift accumulates rather
    // than being corrected.
    fn arm(&self) -> JoinHandle<()> {
        let engine = Rc::clone(&self.engine);
        let sink = Rc::clone(&self.sink);
        let interval = Rc::clone(&self.interval);
        let mut delay = interval.get();

        self.tasks.spawn_local(async move {
            loop {
                tokio::time::sleep(delay).await;
                advance_and_publish(&engine, sink.as_ref());
                delay = interval.get();
            }
        })
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

fn advance_and_publish(engine: &RefCell<SimulationEngine>, sink: &dyn LiveCellsSink) {
    let (generation, cells) = {
        let Ok(mut engine) = engine.try_borrow_mut() else {
            warn!("engine busy, skipping generation");
            return;
        };
        engine.advance_generation();
        (engine.generation(), engine.live_cells())
    };
    debug!(generation, live = cells.len(), "publishing generation");
    sink.publish(generation, &cells);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn quiet() -> impl LiveCellsSink {
        |_: u64, _: &[CellPos]| {}
    }

    fn scheduler(rows: usize, cols: usize, interval_ms: i64) -> Result<Scheduler> {
        Scheduler::new(SimulationEngine::new(rows, cols)?, interval_ms, quiet(), Rc::new(LocalSet::new()))
    }

    #[test]
    fn starts_stopped_with_configured_interval() {
        let scheduler = scheduler(3, 3, 250).unwrap();
        assert_eq!(scheduler.state(), RunState::Stopped);
        assert_eq!(scheduler.interval(), Duration::from_millis(250));
    }

    #[test]
    fn non_positive_initial_interval_is_rejected() {
        let result = scheduler(3, 3, 0);
        assert!(matches!(result, Err(SimError::InvalidInterval(0))));
    }

    #[test]
    fn set_interval_keeps_previous_value_on_error() {
        let mut scheduler = scheduler(3, 3, 100).unwrap();
        assert_eq!(scheduler.set_interval(0), Err(SimError::InvalidInterval(0)));
        assert_eq!(scheduler.set_interval(-20), Err(SimError::InvalidInterval(-20)));
        assert_eq!(scheduler.interval(), Duration::from_millis(100));

        scheduler.set_interval(40).unwrap();
        assert_eq!(scheduler.interval(), Duration::from_millis(40));
    }

    #[test]
    fn stop_twice_is_a_no_op() {
        let mut scheduler = scheduler(3, 3, 100).unwrap();
        scheduler.stop();
        scheduler.stop();
        assert_eq!(scheduler.state(), RunState::Stopped);
        assert_eq!(scheduler.generation(), 0);
    }

    #[test]
    fn step_advances_without_starting() {
        let scheduler = scheduler(3, 3, 100).unwrap();
        scheduler.toggle_cell(1, 0).unwrap();
        scheduler.toggle_cell(1, 1).unwrap();
        scheduler.toggle_cell(1, 2).unwrap();
        scheduler.step();
        assert_eq!(scheduler.state(), RunState::Stopped);
        assert_eq!(scheduler.live_cells(), vec![CellPos::new(0, 1), CellPos::new(1, 1), CellPos::new(2, 1)]);
    }

    #[test]
    fn busy_engine_skips_the_tick_instead_of_panicking() {
        let engine = RefCell::new(SimulationEngine::new(3, 3).unwrap());
        let published = Cell::new(0);
        let sink = |_: u64, _: &[CellPos]| published.set(published.get() + 1);
        {
            let _held = engine.borrow();
            advance_and_publish(&engine, &sink);
        }
        assert_eq!(engine.borrow().generation(), 0);
        assert_eq!(published.get(), 0);

        advance_and_publish(&engine, &sink);
        assert_eq!(engine.borrow().generation(), 1);
        assert_eq!(published.get(), 1);
    }

    #[test]
    fn start_outside_any_runtime_arms_without_panicking() {
        let mut scheduler = scheduler(4, 4, 100).unwrap();
        scheduler.start();
        assert_eq!(scheduler.state(), RunState::Running);
        assert_eq!(scheduler.generation(), 1);
        scheduler.stop();
        assert_eq!(scheduler.state(), RunState::Stopped);
    }

    #[test]
    fn dimensions_are_reported_by_value() {
        let scheduler = scheduler(4, 7, 100).unwrap();
        assert_eq!((scheduler.rows(), scheduler.cols()), (4, 7));
    }
}
