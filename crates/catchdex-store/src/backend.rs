use crate::paths::{record_path, user_dir};
use catchdex_model::{CaughtRecord, GameKey, UserId};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    Io,
    Corrupt,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io_error",
            Self::Corrupt => "corrupt_record",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Caught-state persistence contract.
///
/// `read` never fails for a missing record: an empty mapping is the normal
/// state for a save that was never written. `write` is a full
/// read-modify-write of the record and durably persists the whole updated
/// document. The contract assumes a single writer per (user, game); two
/// concurrent writers race and the later full-record snapshot wins, which can
/// discard the other writer's update to a different key. Callers wanting
/// stronger guarantees must serialize writes themselves.
pub trait CaughtStateStore: Send + Sync + 'static {
    fn read(&self, user: &UserId, game: GameKey) -> Result<CaughtRecord, StoreError>;

    fn write(
        &self,
        user: &UserId,
        game: GameKey,
        species_key: &str,
        caught: bool,
    ) -> Result<CaughtRecord, StoreError>;
}

/// Filesystem-backed store: one pretty-printed JSON document per
/// (identity, game), created lazily on first write.
pub struct LocalFsStore {
    pub root: PathBuf,
}

impl LocalFsStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn load(&self, user: &UserId, game: GameKey) -> Result<CaughtRecord, StoreError> {
        let path = record_path(&self.root, user, game);
        if !path.exists() {
            return Ok(CaughtRecord::new());
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Corrupt,
                format!("unreadable record at {}: {e}", path.display()),
            )
        })
    }
}

impl CaughtStateStore for LocalFsStore {
    fn read(&self, user: &UserId, game: GameKey) -> Result<CaughtRecord, StoreError> {
        self.load(user, game)
    }

    fn write(
        &self,
        user: &UserId,
        game: GameKey,
        species_key: &str,
        caught: bool,
    ) -> Result<CaughtRecord, StoreError> {
        let mut record = self.load(user, game)?;
        record.set(species_key.to_string(), caught);

        fs::create_dir_all(user_dir(&self.root, user))
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        let body = serde_json::to_string_pretty(&record)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let path = record_path(&self.root, user, game);
        if let Err(e) = fs::write(&path, body) {
            warn!(user = %user, game = %game, "record write failed: {e}");
            return Err(StoreError::new(StoreErrorCode::Io, e.to_string()));
        }
        Ok(record)
    }
}

/// In-memory store for tests and harnesses; same contract, no durability.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(UserId, GameKey), CaughtRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaughtStateStore for MemoryStore {
    fn read(&self, user: &UserId, game: GameKey) -> Result<CaughtRecord, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        Ok(records
            .get(&(user.clone(), game))
            .cloned()
            .unwrap_or_default())
    }

    fn write(
        &self,
        user: &UserId,
        game: GameKey,
        species_key: &str,
        caught: bool,
    ) -> Result<CaughtRecord, StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let record = records.entry((user.clone(), game)).or_default();
        record.set(species_key.to_string(), caught);
        Ok(record.clone())
    }
}
