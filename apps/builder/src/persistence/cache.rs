//! Local device cache: a key/value directory holding the serialized model
//! under one fixed key. Reads and writes are synchronous.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::document::model::DocumentModel;
use crate::document::partial::PartialDocument;

/// Storage key of the working draft.
pub const STORAGE_KEY: &str = "dc_builder_state_v1";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Raw value under `key`, `None` if never written.
    pub fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the value under `key`. The write goes to a temp file in the same
    /// directory first, so a reader never sees a half-written snapshot.
    pub fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    /// The saved draft as a partial document. Unparseable content is an error;
    /// hydration treats it as absence.
    pub fn load_document(&self) -> Result<Option<PartialDocument>, CacheError> {
        match self.read(STORAGE_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(PartialDocument::from_json(&raw)?)),
            _ => Ok(None),
        }
    }

    pub fn save_document(&self, model: &DocumentModel) -> Result<(), CacheError> {
        self.write(STORAGE_KEY, &serde_json::to_string(model)?)
    }
}
