use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::session::SessionRecord;
use crate::util::round_percent;

/// Storage key of the session log. The file store keeps it in
/// `<state dir>/<key>.json`.
pub const SESSIONS_KEY: &str = "sessions";

/// Most recent sessions kept in the log.
pub const HISTORY_CAPACITY: usize = 50;

/// Aggregate figures derived from the session log. All zero when the log is
/// empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_sessions: usize,
    pub total_questions: usize,
    pub total_correct: usize,
    pub average_score_percent: u32,
    pub best_score_percent: u32,
}

impl HistoryStats {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let total_questions = records.iter().map(|r| r.total_questions).sum();
        let total_correct = records.iter().map(|r| r.correct_count).sum();
        let best_score_percent = records
            .iter()
            .map(SessionRecord::score_percent)
            .max()
            .unwrap_or(0);

        Self {
            total_sessions: records.len(),
            total_questions,
            total_correct,
            average_score_percent: round_percent(total_correct, total_questions),
            best_score_percent,
        }
    }
}

/// Persisted, most-recent-first log of completed sessions.
///
/// Callers must not overlap `append` calls on the same log; implementations
/// serialise them internally but make no promise across processes.
pub trait SessionStore {
    /// Prepend `record` and keep the newest [`HISTORY_CAPACITY`] entries.
    fn append(&self, record: &SessionRecord) -> Result<(), PersistenceError>;

    /// The whole log, newest first. Empty when nothing was saved or the
    /// stored payload cannot be read.
    fn read_all(&self) -> Vec<SessionRecord>;

    /// Remove the whole log. Clearing an empty log is not an error.
    fn clear(&self) -> Result<(), PersistenceError>;

    fn aggregate_stats(&self) -> HistoryStats {
        HistoryStats::from_records(&self.read_all())
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn push_front_bounded(records: &mut Vec<SessionRecord>, record: &SessionRecord) {
    records.insert(0, record.clone());
    records.truncate(HISTORY_CAPACITY);
}

/// Session log stored as a JSON array in a single file.
///
/// Writes go to a temporary file next to the target which is then renamed
/// over it, so readers see either the old or the new log.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Like `read_all` but reports why the log could not be read.
    pub fn try_read_all(&self) -> Result<Vec<SessionRecord>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn write_atomic(&self, records: &[SessionRecord]) -> Result<(), PersistenceError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| PersistenceError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let data = serde_json::to_vec_pretty(records)?;

        let io_err = |source| PersistenceError::Io {
            path: dir.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&data).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        tmp.persist(&self.path)
            .map_err(|source| PersistenceError::Persist {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn append(&self, record: &SessionRecord) -> Result<(), PersistenceError> {
        let _guard = lock(&self.write_lock);

        let mut records = match self.try_read_all() {
            Ok(records) => records,
            // only an undecodable log may be replaced; any other failure
            // would overwrite records that are still on disk
            Err(e @ PersistenceError::Decode { .. }) => {
                warn!(error = %e, "replacing unreadable session history");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        push_front_bounded(&mut records, record);
        self.write_atomic(&records)?;

        debug!(
            path = %self.path.display(),
            sessions = records.len(),
            "appended session to history"
        );
        Ok(())
    }

    fn read_all(&self) -> Vec<SessionRecord> {
        match self.try_read_all() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "unable to read session history, treating it as empty");
                Vec::new()
            }
        }
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        let _guard = lock(&self.write_lock);

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// In-process session log, used when no state directory is available.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: Mutex<Vec<SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn append(&self, record: &SessionRecord) -> Result<(), PersistenceError> {
        push_front_bounded(&mut lock(&self.records), record);
        Ok(())
    }

    fn read_all(&self) -> Vec<SessionRecord> {
        lock(&self.records).clone()
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        lock(&self.records).clear();
        Ok(())
    }
}
