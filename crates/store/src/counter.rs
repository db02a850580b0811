//! Per-day invocation counter store.
//!
//! A small key-value map from calendar-day key (`YYYY-MM-DD`) to count,
//! the Rust-side replacement for the script-properties bag the quota
//! monitor originally wrote into.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use scanlog_core::{Error, Result};

use crate::config::StoreConfig;

const COUNTER_FILE: &str = "daily-counters.json";

/// Key-value store for daily invocation counts.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Stored count for the day, if any.
    async fn get(&self, day: &str) -> Result<Option<u32>>;

    /// Stores the count for a day, overwriting any previous value.
    async fn put(&self, day: &str, count: u32) -> Result<()>;

    /// Removes the entry for a day. Removing a missing day is not an error.
    async fn remove(&self, day: &str) -> Result<()>;
}

/// Counter store persisted as a single JSON object file.
pub struct FileCounters {
    path: PathBuf,
    counts: Mutex<BTreeMap<String, u32>>,
}

impl FileCounters {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        let path = config.data_dir.join(COUNTER_FILE);

        let counts = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            serde_json::from_reader(reader)
                .map_err(|e| Error::store(format!("corrupt counter file: {}", e)))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            counts: Mutex::new(counts),
        })
    }

    fn persist(&self, counts: &BTreeMap<String, u32>) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(counts)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl CounterStore for FileCounters {
    async fn get(&self, day: &str) -> Result<Option<u32>> {
        Ok(self.counts.lock().get(day).copied())
    }

    async fn put(&self, day: &str, count: u32) -> Result<()> {
        let mut counts = self.counts.lock();
        counts.insert(day.to_string(), count);
        self.persist(&counts)
    }

    async fn remove(&self, day: &str) -> Result<()> {
        let mut counts = self.counts.lock();
        if counts.remove(day).is_some() {
            self.persist(&counts)?;
        }
        Ok(())
    }
}

/// In-memory counter store for tests.
#[derive(Clone, Default)]
pub struct MemoryCounters {
    counts: Arc<Mutex<BTreeMap<String, u32>>>,
}

impl MemoryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored entries, ordered by day key.
    pub fn entries(&self) -> BTreeMap<String, u32> {
        self.counts.lock().clone()
    }
}

#[async_trait]
impl CounterStore for MemoryCounters {
    async fn get(&self, day: &str) -> Result<Option<u32>> {
        Ok(self.counts.lock().get(day).copied())
    }

    async fn put(&self, day: &str, count: u32) -> Result<()> {
        self.counts.lock().insert(day.to_string(), count);
        Ok(())
    }

    async fn remove(&self, day: &str) -> Result<()> {
        self.counts.lock().remove(day);
        Ok(())
    }
}
