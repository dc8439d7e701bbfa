//! Periodic task engine: runs every registered task once per interval.
//!
//! The engine owns one timer (a Tokio task driving a [`tokio::time::Interval`]).
//! Each tick walks the tasks in registration order and spawns every task that
//! is still under its repetition cap; the tick does not wait for them, so a
//! slow or failing task never delays the next tick or its siblings.
//!
//! `start` and `stop` are idempotent: the engine is running exactly when it
//! holds a timer handle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

type TaskFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

struct TaskHandle {
    call: TaskFn,
    reps: u64,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine must be started from within a Tokio runtime")]
    NoRuntime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Running,
}

pub struct Engine {
    interval: Duration,
    max_reps: Option<u64>,
    tasks: Arc<Mutex<Vec<TaskHandle>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Engine {
    /// An engine that runs each task every `interval`, forever.
    ///
    /// # Panics
    /// If `interval` is zero.
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "engine interval must be non-zero");
        Self {
            interval,
            max_reps: None,
            tasks: Arc::new(Mutex::new(Vec::new())),
            timer: Mutex::new(None),
        }
    }

    /// Caps how many times each task is run.
    pub fn with_reps(mut self, reps: u64) -> Self {
        self.max_reps = Some(reps);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> EngineState {
        match &*self.timer.lock() {
            Some(handle) if !handle.is_finished() => EngineState::Running,
            _ => EngineState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == EngineState::Running
    }

    /// Registers a task. Takes effect from the next tick when already running.
    pub fn add<F, Fut>(&self, task: F) -> &Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let call: TaskFn = Arc::new(move || task().boxed());
        let mut tasks = self.tasks.lock();
        tasks.push(TaskHandle { call, reps: 0 });
        debug!(tasks = tasks.len(), "[ENGINE] Task registered");
        self
    }

    pub fn task_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Drops every registered task.
    pub fn clear(&self) {
        self.tasks.lock().clear();
    }

    /// Starts ticking; the first tick comes one interval from now.
    pub fn start(&self) -> Result<(), EngineError> {
        let mut timer = self.timer.lock();
        if matches!(&*timer, Some(handle) if !handle.is_finished()) {
            debug!("[ENGINE] Already running");
            return Ok(());
        }
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let tasks = Arc::clone(&self.tasks);
        let period = self.interval;
        let max_reps = self.max_reps;
        *timer = Some(runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                dispatch(&tasks, max_reps);
            }
        }));
        info!(interval_ms = period.as_millis() as u64, "[ENGINE] Started");
        Ok(())
    }

    /// Cancels the timer. Tasks already dispatched run to completion.
    pub fn stop(&self) {
        if let Some(handle) = self.timer.lock().take() {
            handle.abort();
            info!("[ENGINE] Stopped");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}

fn dispatch(tasks: &Mutex<Vec<TaskHandle>>, max_reps: Option<u64>) {
    let due: Vec<TaskFn> = {
        let mut tasks = tasks.lock();
        tasks
            .iter_mut()
            .filter(|t| max_reps.map_or(true, |cap| t.reps < cap))
            .map(|t| {
                t.reps += 1;
                Arc::clone(&t.call)
            })
            .collect()
    };
    for call in due {
        tokio::spawn(call());
    }
}
