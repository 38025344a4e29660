// runner.rs - Simulation thread: owns the scheduler, takes commands from the UI
//
// The scheduler is single-threaded (Rc/RefCell + spawn_local), so it lives on
// its own thread inside a current-thread runtime and LocalSet. The UI thread
// only sends `Command`s and reads the latest `Frame`.

use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Context;
use conway::{CellPos, Scheduler, SimulationConfig};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::LocalSet;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle { x: usize, y: usize },
    Start,
    Stop,
    Step,
    Clear,
    SetInterval(i64),
    Shutdown,
}

/// What the UI draws: the last published cells plus scheduler status.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub cells: Vec<CellPos>,
    pub generation: u64,
    pub running: bool,
    pub interval_ms: u64,
    pub last_error: Option<String>,
}

pub type SharedFrame = Arc<Mutex<Frame>>;

pub struct SimHandle {
    commands: UnboundedSender<Command>,
    frame: SharedFrame,
    thread: Option<thread::JoinHandle<()>>,
}

impl SimHandle {
    pub fn spawn(config: SimulationConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid simulation config")?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build simulation runtime")?;

        let (commands, receiver) = mpsc::unbounded_channel();
        let frame = SharedFrame::default();
        let thread_frame = Arc::clone(&frame);

        let thread = thread::Builder::new()
            .name("simulation".into())
            .spawn(move || {
                let local = Rc::new(LocalSet::new());
                local.block_on(&runtime, run(config, receiver, thread_frame, Rc::clone(&local)));
            })
            .context("failed to spawn simulation thread")?;

        Ok(Self { commands, frame, thread: Some(thread) })
    }

    pub fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("simulation thread is gone, command dropped");
        }
    }

    /// Copy of the latest frame.
    pub fn frame(&self) -> Frame {
        match self.frame.lock() {
            Ok(frame) => frame.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Drop for SimHandle {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("simulation thread panicked");
            }
        }
    }
}

fn with_frame(frame: &SharedFrame, update: impl FnOnce(&mut Frame)) {
    let mut guard = match frame.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    update(&mut guard);
}

async fn run(
    config: SimulationConfig,
    mut commands: UnboundedReceiver<Command>,
    frame: SharedFrame,
    tasks: Rc<LocalSet>,
) {
    let sink_frame = Arc::clone(&frame);
    let sink = move |generation: u64, cells: &[CellPos]| {
        with_frame(&sink_frame, |frame| {
            frame.generation = generation;
            frame.cells = cells.to_vec();
        });
    };

    let mut scheduler = match Scheduler::from_config(&config, sink, tasks) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!(error = %e, "could not create simulation");
            with_frame(&frame, |frame| frame.last_error = Some(e.to_string()));
            return;
        }
    };
    info!(rows = config.rows, cols = config.cols, "simulation thread ready");
    sync_status(&scheduler, &frame, None);

    while let Some(command) = commands.recv().await {
        let outcome = match command {
            Command::Toggle { x, y } => scheduler.toggle_cell(x, y),
            Command::Start => {
                scheduler.start();
                Ok(())
            }
            Command::Stop => {
                scheduler.stop();
                Ok(())
            }
            Command::Step => {
                scheduler.step();
                Ok(())
            }
            Command::Clear => {
                scheduler.clear();
                Ok(())
            }
            Command::SetInterval(ms) => scheduler.set_interval(ms),
            Command::Shutdown => break,
        };

        let error = outcome.err().map(|e| {
            warn!(error = %e, "command rejected");
            e.to_string()
        });
        sync_status(&scheduler, &frame, error);
    }

    scheduler.stop();
    info!("simulation thread stopped");
}

fn sync_status(scheduler: &Scheduler, frame: &SharedFrame, error: Option<String>) {
    let running = scheduler.is_running();
    let interval_ms = scheduler.interval().as_millis() as u64;
    with_frame(frame, |frame| {
        frame.running = running;
        frame.interval_ms = interval_ms;
        frame.last_error = error;
    });
}
