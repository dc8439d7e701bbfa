//! Where a changed snapshot goes.
//!
//! [`JsonFileSink`] writes the combined snapshot to disk as indented JSON so
//! that version control shows line-level diffs between publishes.
//! [`CallbackSink`] hands it to a closure instead.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{debug, info};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::poller::Snapshot;

/// Indentation the blog data file has always been written with.
pub const DEFAULT_INDENT: usize = 8;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot rejected: {0}")]
    Rejected(String),
}

/// Receives the full snapshot whenever at least one page changed.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Sink: Send + Sync {
    async fn publish(&self, snapshot: &Snapshot) -> Result<(), SinkError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
    indent: usize,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the snapshot exactly as it will be written.
    pub fn render(&self, snapshot: &Snapshot) -> Result<Vec<u8>, SinkError> {
        let indent = vec![b' '; self.indent];
        let mut out = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
        snapshot.serialize(&mut ser)?;
        out.push(b'\n');
        Ok(out)
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }

    // Written to a sibling temp file and renamed over the target, so readers
    // only ever see a complete file.
    fn write_atomically(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;
            debug!(path = %dir.display(), "Created output directory");
        }

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(bytes).map_err(|e| self.io_error(e))?;
        tmp.flush().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

#[async_trait]
impl Sink for JsonFileSink {
    async fn publish(&self, snapshot: &Snapshot) -> Result<(), SinkError> {
        let bytes = self.render(snapshot)?;
        self.write_atomically(&bytes)?;
        info!(
            path = %self.path.display(),
            bytes = bytes.len(),
            pages = snapshot.len(),
            "Snapshot saved to disk"
        );
        Ok(())
    }
}

/// Adapts a closure into a [`Sink`].
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: Fn(&Snapshot) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> Sink for CallbackSink<F>
where
    F: Fn(&Snapshot) + Send + Sync,
{
    async fn publish(&self, snapshot: &Snapshot) -> Result<(), SinkError> {
        (self.callback)(snapshot);
        Ok(())
    }
}
