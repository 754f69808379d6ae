use crate::model::Snapshot;
use chrono::Utc;
use directories::ProjectDirs;
use log::{error, info};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid board json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Whole-snapshot persistence. `save` replaces everything previously stored.
pub trait SnapshotStore {
    fn load(&self) -> Result<Value, StorageError>;
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError>;
}

/// A board kept as one JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Value, StorageError> {
        if !self.path.exists() {
            info!("no board at {:?}, writing an empty one", self.path);
            let empty = Snapshot::empty();
            write_snapshot(&self.path, &empty)?;
            return Ok(serde_json::to_value(&empty)?);
        }
        let data = fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        write_snapshot(&self.path, snapshot).inspect_err(|err| {
            error!("saving board to {:?} failed: {}", self.path, err);
        })
    }
}

/// Writes `snapshot` to `path` with a fresh `lastUpdated` stamp.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut stamped = snapshot.clone();
    stamped.last_updated = Some(Utc::now());
    let serialized = serde_json::to_string_pretty(&stamped)?;
    fs::write(path, serialized).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (rows, cols) = snapshot.dimensions();
    info!(
        "saved board to {:?}: holding={} cells={}x{} years={}",
        path,
        snapshot.holding_area.len(),
        rows,
        cols,
        snapshot.number_of_years
    );
    Ok(())
}

/// Keeps the last saved snapshot in memory. `fail_saves` simulates an
/// unreachable backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    stored: Option<Value>,
    pub fail_saves: bool,
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: Value) -> Self {
        MemoryStore {
            stored: Some(value),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<&Value> {
        self.stored.as_ref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Value, StorageError> {
        match &self.stored {
            Some(value) => Ok(value.clone()),
            None => Ok(serde_json::to_value(Snapshot::empty())?),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::Unavailable("memory store set to fail".into()));
        }
        self.stored = Some(serde_json::to_value(snapshot)?);
        self.saves += 1;
        Ok(())
    }
}

pub fn default_data_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "skedbord").map(|dirs| dirs.data_dir().join("board.json"))
}
