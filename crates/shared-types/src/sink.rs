//! Block-size log sink port and adapters.
//!
//! After each party build the strategies forward the block sizes of the new
//! index to a sink. File path and format belong to the adapter.

use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::entities::Party;
use crate::errors::BlockingResult;

/// Destination for per-build block sizes (driven port).
pub trait BlockSizeSink: Send + Sync {
    /// Record the block sizes of one build.
    ///
    /// `strategy` is a short tag such as `SNN_2P` or `PSIG`.
    fn record(&self, strategy: &str, party: Party, sizes: &[usize]) -> BlockingResult<()>;
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl BlockSizeSink for NoOpSink {
    fn record(&self, _strategy: &str, _party: Party, _sizes: &[usize]) -> BlockingResult<()> {
        Ok(())
    }
}

/// A single recorded build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkEntry {
    pub strategy: String,
    pub party: Party,
    pub sizes: Vec<usize>,
}

/// Sink keeping entries in memory, mostly for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<SinkEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries.
    pub fn entries(&self) -> Vec<SinkEntry> {
        self.entries.lock().clone()
    }
}

impl BlockSizeSink for MemorySink {
    fn record(&self, strategy: &str, party: Party, sizes: &[usize]) -> BlockingResult<()> {
        self.entries.lock().push(SinkEntry {
            strategy: strategy.to_string(),
            party,
            sizes: sizes.to_vec(),
        });
        Ok(())
    }
}

/// Appends one line per build to `<dir>/<strategy>_<party>.csv`.
///
/// Each size is written followed by a comma, e.g. `3,4,2,`.
#[derive(Debug, Clone)]
pub struct CsvBlockSizeSink {
    dir: PathBuf,
}

impl CsvBlockSizeSink {
    /// Create a sink writing below `dir`. The directory is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File that receives the sizes of `party` for `strategy`.
    pub fn path_for(&self, strategy: &str, party: Party) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", strategy, party))
    }
}

impl BlockSizeSink for CsvBlockSizeSink {
    fn record(&self, strategy: &str, party: Party, sizes: &[usize]) -> BlockingResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(strategy, party);

        let mut line = String::with_capacity(sizes.len() * 4 + 1);
        for size in sizes {
            line.push_str(&size.to_string());
            line.push(',');
        }
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(line.as_bytes())?;

        tracing::debug!(path = %path.display(), blocks = sizes.len(), "Block sizes appended");
        Ok(())
    }
}
