//! Dedup Ledger - Bounded Record of Produced Hashes
//!
//! The ledger is advisory. Every storage failure is logged and degrades to
//! "nothing recorded": reads come back empty, writes are skipped. Generation
//! never sees a ledger error.
//!
//! Storage is an injected port keyed by string. The whole ledger lives in a
//! single JSON blob `{hashes, records}` under [`LEDGER_KEY`], capped at the
//! ledger capacity with the oldest entries evicted first.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LEDGER_CAPACITY;
use crate::hashing::normalize_brand;
use crate::pipeline::GeneratedLogo;

/// Storage key holding the ledger blob.
pub const LEDGER_KEY: &str = "logo_generation_hashes";

/// Errors from ledger storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded: need {needed} bytes, limit {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt stored value: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Keyed string storage behind the ledger.
pub trait LedgerStorage: Send + Sync {
    /// Value under `key`, or `None` when nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process storage with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    offline: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage refusing writes once the stored values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self { quota: Some(bytes), ..Self::default() }
    }

    /// Toggle simulated unavailability; every call fails while offline.
    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory storage offline".into()));
        }
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))
    }
}

impl LedgerStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries()?;
        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
///
/// Writes go through a temp file in the same directory and an atomic rename.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a `FileStorage` rooted at `dir`, creating it if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl LedgerStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                Err(StorageError::Corrupt(e.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.key_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// What the ledger remembers about one produced logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashRecord {
    pub hash: String,
    pub brand_name: String,
    pub algorithm: String,
    pub variant: u32,
    /// Epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub quality_score: Option<f64>,
}

impl HashRecord {
    pub fn from_logo(logo: &GeneratedLogo) -> Self {
        Self {
            hash: logo.hash.clone(),
            brand_name: logo.meta.brand_name.clone(),
            algorithm: logo.algorithm.to_string(),
            variant: logo.variant,
            created_at: logo.meta.generated_at,
            quality_score: logo.quality.as_ref().map(|q| q.score),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerBlob {
    #[serde(default)]
    hashes: Vec<String>,
    #[serde(default)]
    records: Vec<HashRecord>,
}

/// Bounded FIFO ledger over a [`LedgerStorage`].
pub struct HashLedger {
    storage: Arc<dyn LedgerStorage>,
    capacity: usize,
    // read-modify-write of the blob must not interleave
    write_lock: Mutex<()>,
}

impl HashLedger {
    pub fn new(storage: Arc<dyn LedgerStorage>) -> Self {
        Self::with_capacity(storage, LEDGER_CAPACITY)
    }

    pub fn with_capacity(storage: Arc<dyn LedgerStorage>, capacity: usize) -> Self {
        Self {
            storage,
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn try_load(&self) -> Result<LedgerBlob> {
        match self.storage.get(LEDGER_KEY)? {
            None => Ok(LedgerBlob::default()),
            Some(text) => {
                serde_json::from_str(&text).map_err(|e| StorageError::Corrupt(e.to_string()))
            }
        }
    }

    fn load(&self) -> LedgerBlob {
        self.try_load().unwrap_or_else(|e| {
            warn!(error = %e, "ledger read failed, treating as empty");
            LedgerBlob::default()
        })
    }

    fn try_save(&self, blob: &LedgerBlob) -> Result<()> {
        let text = serde_json::to_string(blob).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        self.storage.set(LEDGER_KEY, &text)
    }

    /// Whether `hash` was recorded before. Storage failures read as `false`.
    pub fn is_duplicate(&self, hash: &str) -> bool {
        self.load().hashes.iter().any(|h| h == hash)
    }

    /// Append `record`, evicting the oldest entries past capacity.
    ///
    /// A hash already present is left where it is. Storage failures skip the
    /// write.
    pub fn record(&self, record: HashRecord) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut blob = self.load();
        if blob.hashes.iter().any(|h| *h == record.hash) {
            debug!(hash = %record.hash, "hash already in ledger");
            return;
        }
        blob.hashes.push(record.hash.clone());
        blob.records.push(record);
        trim_front(&mut blob.hashes, self.capacity);
        trim_front(&mut blob.records, self.capacity);

        if let Err(e) = self.try_save(&blob) {
            warn!(error = %e, "ledger write skipped");
        }
    }

    pub fn record_logo(&self, logo: &GeneratedLogo) {
        self.record(HashRecord::from_logo(logo));
    }

    /// Records for `brand_name` (case- and padding-insensitive), oldest first.
    pub fn brand_history(&self, brand_name: &str) -> Vec<HashRecord> {
        let wanted = normalize_brand(brand_name);
        self.load()
            .records
            .into_iter()
            .filter(|r| normalize_brand(&r.brand_name) == wanted)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.load().hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything. Storage failures are logged and ignored.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = self.storage.remove(LEDGER_KEY) {
            warn!(error = %e, "ledger clear skipped");
        }
    }
}

fn trim_front<T>(items: &mut Vec<T>, capacity: usize) {
    if items.len() > capacity {
        let excess = items.len() - capacity;
        items.drain(..excess);
    }
}
