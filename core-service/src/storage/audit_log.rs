//! JSONL Validation Audit Log
//!
//! Append-only `ValidationStore` backed by a JSON Lines file. The newest
//! records are also kept in memory; the file is the durable trail and is
//! rotated to `<name>.jsonl.old` once it grows past `max_entries` writes.
//!
//! Queries are answered from memory while the tail still holds every
//! matching record, and from the current plus rotated file otherwise.

use std::collections::{HashSet, VecDeque};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::{order_and_limit, AuditFilter, SortOrder, StoreResult, ValidationStore};
use crate::logic::validation::ValidationAuditRecord;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Writes before the file is rotated
const MAX_LOG_ENTRIES: usize = 10_000;

/// Newest records kept in memory
const MAX_IN_MEMORY: usize = 1_000;

// ============================================================================
// LOG
// ============================================================================

pub struct JsonlAuditLog {
    path: PathBuf,
    cache: RwLock<VecDeque<ValidationAuditRecord>>,
    /// Serializes file writes and counts them toward rotation
    writes: Mutex<usize>,
    /// Set once a record has left the in-memory tail
    evicted: AtomicBool,
    max_entries: usize,
    max_in_memory: usize,
}

impl JsonlAuditLog {
    /// Open (or create) the log and load its tail into memory
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::with_limits(path, MAX_LOG_ENTRIES, MAX_IN_MEMORY)
    }

    pub fn with_limits(path: impl AsRef<Path>, max_entries: usize, max_in_memory: usize) -> StoreResult<Self> {
        let log = Self {
            path: path.as_ref().to_path_buf(),
            cache: RwLock::new(VecDeque::new()),
            writes: Mutex::new(0),
            evicted: AtomicBool::new(false),
            max_entries: max_entries.max(1),
            max_in_memory: max_in_memory.max(1),
        };
        let loaded = log.load_from_disk()?;
        *log.writes.lock() = loaded;
        tracing::info!(path = %log.path.display(), loaded, "validation audit log opened");
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rotated file path
    pub fn rotated_path(&self) -> PathBuf {
        self.path.with_extension("jsonl.old")
    }

    /// Reload the in-memory tail. Unparseable lines are skipped.
    pub fn load_from_disk(&self) -> StoreResult<usize> {
        if self.rotated_path().exists() {
            self.evicted.store(true, Ordering::Release);
        }
        if !self.path.exists() {
            return Ok(0);
        }

        let records = read_records(&self.path)?;
        let count = records.len();

        let mut cache = self.cache.write();
        cache.clear();
        cache.extend(records);
        while cache.len() > self.max_in_memory {
            cache.pop_front();
            self.evicted.store(true, Ordering::Release);
        }
        Ok(count)
    }

    /// True when every record matching `filter` is still in memory.
    /// Records are appended in `recorded_at` order, so a tail that starts
    /// before `filter.since` holds the whole window.
    fn tail_covers(&self, filter: &AuditFilter) -> bool {
        if !self.evicted.load(Ordering::Acquire) {
            return true;
        }
        let cache = self.cache.read();
        match (filter.since, cache.front()) {
            (Some(since), Some(oldest)) => oldest.recorded_at < since,
            _ => false,
        }
    }

    /// Rotated file, then current file. Cached records whose file has
    /// already been rotated away are kept in front.
    fn scan(&self, filter: &AuditFilter) -> StoreResult<Vec<ValidationAuditRecord>> {
        let _writes = self.writes.lock();

        let mut on_disk = Vec::new();
        let mut seen = HashSet::new();
        for path in [self.rotated_path(), self.path.clone()] {
            if !path.exists() {
                continue;
            }
            for record in read_records(&path)? {
                if seen.insert(record.id.clone()) && filter.matches(&record) {
                    on_disk.push(record);
                }
            }
        }

        let mut rows: Vec<_> = self
            .cache
            .read()
            .iter()
            .filter(|r| !seen.contains(&r.id) && filter.matches(r))
            .cloned()
            .collect();
        rows.extend(on_disk);
        Ok(rows)
    }

    fn write_to_disk(&self, record: &ValidationAuditRecord) -> StoreResult<()> {
        let mut writes = self.writes.lock();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serde_json::to_string(record)?)?;
        writer.flush()?;
        *writes += 1;

        if *writes >= self.max_entries {
            let old = self.rotated_path();
            if old.exists() {
                std::fs::remove_file(&old)?;
            }
            std::fs::rename(&self.path, &old)?;
            *writes = 0;
            tracing::info!(path = %self.path.display(), "rotated validation audit log");
        }
        Ok(())
    }
}

#[async_trait]
impl ValidationStore for JsonlAuditLog {
    async fn append(&self, record: ValidationAuditRecord) -> StoreResult<()> {
        self.write_to_disk(&record)?;

        let mut cache = self.cache.write();
        cache.push_back(record);
        while cache.len() > self.max_in_memory {
            cache.pop_front();
            self.evicted.store(true, Ordering::Release);
        }
        Ok(())
    }

    async fn query(&self, filter: &AuditFilter, order: SortOrder, limit: usize) -> StoreResult<Vec<ValidationAuditRecord>> {
        let rows = if self.tail_covers(filter) {
            self.cache.read().iter().filter(|r| filter.matches(r)).cloned().collect()
        } else {
            self.scan(filter)?
        };
        Ok(order_and_limit(rows, order, limit))
    }
}

/// Parse a JSONL file. Unparseable lines are skipped.
fn read_records(path: &Path) -> StoreResult<Vec<ValidationAuditRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        match serde_json::from_str::<ValidationAuditRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping malformed audit line"),
        }
    }
    Ok(records)
}

// ============================================================================
// TESTS
// ============================================================================
