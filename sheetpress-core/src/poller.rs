//! Poller: periodically fetches named pages and publishes only on change.
//!
//! Every tick fetches all pages concurrently, waits for every fetch to settle,
//! and then compares each successful result with the last value seen for that
//! page (compared in serialized form). When at least one page changed, the
//! [`Sink`] receives one snapshot holding every page's current value,
//! unchanged pages included.
//!
//! # Failure isolation
//! A page whose fetch fails is logged and keeps its previous value; the other
//! pages in the same tick are unaffected. Nothing is retried before the next
//! scheduled tick, and fetch errors never reach the sink.
//!
//! # Overlap
//! A tick that fires while the previous one is still in flight is skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, info, warn};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::engine::{Engine, EngineError, EngineState};
use crate::sink::Sink;

/// Error type for page fetchers (simple boxed error).
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Page id → current value, in page registration order.
pub type Snapshot = serde_json::Map<String, Value>;

/// One independently polled source of data.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The previous tick had not settled yet.
    Skipped,
    Completed(TickReport),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Pages whose value differed from the cached one.
    pub changed: Vec<String>,
    /// Pages whose fetch failed.
    pub failed: Vec<String>,
    /// Whether the sink accepted a snapshot on this tick.
    pub published: bool,
}

impl TickReport {
    pub fn is_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}

struct Page {
    id: String,
    fetcher: Arc<dyn PageFetcher>,
}

struct Cached {
    serialized: String,
    value: Value,
}

struct PollState {
    pages: Vec<Page>,
    cache: Mutex<Vec<Option<Cached>>>,
    sink: Arc<dyn Sink>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the tick ends, even by unwinding.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Poller {
    engine: Engine,
    state: Arc<PollState>,
}

impl Poller {
    /// Builds a poller over `pages` (kept in the given order). A repeated page
    /// id replaces the earlier fetcher.
    ///
    /// # Panics
    /// If `interval` is zero. [`crate::config::PollConfig::interval`] never
    /// yields one.
    pub fn new<I, S>(pages: I, sink: Arc<dyn Sink>, interval: Duration) -> Self
    where
        I: IntoIterator<Item = (S, Arc<dyn PageFetcher>)>,
        S: Into<String>,
    {
        let mut slots: Vec<Page> = Vec::new();
        for (id, fetcher) in pages {
            let id = id.into();
            match slots.iter_mut().find(|p| p.id == id) {
                Some(existing) => {
                    warn!(page = %id, "[POLL] Duplicate page id, replacing earlier fetcher");
                    existing.fetcher = fetcher;
                }
                None => slots.push(Page { id, fetcher }),
            }
        }

        let state = Arc::new(PollState {
            cache: Mutex::new(slots.iter().map(|_| None).collect()),
            pages: slots,
            sink,
            in_flight: AtomicBool::new(false),
        });

        let engine = Engine::new(interval);
        let task_state = Arc::clone(&state);
        engine.add(move || {
            let state = Arc::clone(&task_state);
            async move {
                state.tick().await;
            }
        });

        info!(
            pages = state.pages.len(),
            interval_ms = interval.as_millis() as u64,
            "[POLL] Poller created"
        );
        Self { engine, state }
    }

    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        self.state.pages.iter().map(|p| p.id.as_str())
    }

    pub fn start(&self) -> Result<(), EngineError> {
        self.engine.start()
    }

    pub fn stop(&self) {
        self.engine.stop()
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Runs one poll cycle now, outside the timer.
    pub async fn tick(&self) -> TickOutcome {
        self.state.tick().await
    }

    /// The last known value of every page (`null` for never-fetched pages).
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(&self.state.cache.lock())
    }
}

impl PollState {
    async fn tick(&self) -> TickOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("[POLL] Previous tick still in flight, skipping");
            return TickOutcome::Skipped;
        }
        let _in_flight = InFlight(&self.in_flight);

        debug!(pages = self.pages.len(), "[POLL] Tick started");
        let results = join_all(self.pages.iter().map(|p| p.fetcher.fetch())).await;

        let mut report = TickReport::default();
        let snapshot = {
            let mut cache = self.cache.lock();
            for ((page, slot), result) in self.pages.iter().zip(cache.iter_mut()).zip(results) {
                let value = match result {
                    Ok(value) => value,
                    Err(e) => {
                        error!(page = %page.id, error = %e, "[POLL][ERROR] Fetch failed, keeping last value");
                        report.failed.push(page.id.clone());
                        continue;
                    }
                };
                let serialized = match serde_json::to_string(&value) {
                    Ok(s) => s,
                    Err(e) => {
                        error!(page = %page.id, error = ?e, "[POLL][ERROR] Could not serialize page value");
                        report.failed.push(page.id.clone());
                        continue;
                    }
                };
                if slot.as_ref().map(|c| c.serialized.as_str()) != Some(serialized.as_str()) {
                    debug!(page = %page.id, bytes = serialized.len(), "[POLL] Page changed");
                    *slot = Some(Cached { serialized, value });
                    report.changed.push(page.id.clone());
                }
            }
            report.is_changed().then(|| self.snapshot(&cache))
        };

        let Some(snapshot) = snapshot else {
            debug!(failed = report.failed.len(), "[POLL] No changes");
            return TickOutcome::Completed(report);
        };

        info!(changed = ?report.changed, "[POLL] Publishing snapshot");
        match self.sink.publish(&snapshot).await {
            Ok(()) => report.published = true,
            Err(e) => error!(error = %e, "[POLL][ERROR] Sink failed to publish snapshot"),
        }
        TickOutcome::Completed(report)
    }

    fn snapshot(&self, cache: &[Option<Cached>]) -> Snapshot {
        self.pages
            .iter()
            .zip(cache)
            .map(|(page, slot)| {
                let value = slot.as_ref().map_or(Value::Null, |c| c.value.clone());
                (page.id.clone(), value)
            })
            .collect()
    }
}
