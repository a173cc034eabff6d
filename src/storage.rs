use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{StorageError, StoreResult};
use crate::leaderboard::Entry;

/// On-disk shape of the leaderboard.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    pub scores: Vec<Entry>,
}

/// JSON file holding the leaderboard. Saves go through a sibling temporary
/// file that is renamed over the target, so a crash mid-save leaves either the
/// previous or the new document, never a torn one.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// `None` when no backing file exists yet.
    pub fn load(&self) -> StoreResult<Option<Vec<Entry>>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        let document: Document =
            serde_json::from_slice(&raw).map_err(|e| StorageError::corrupt(&self.path, e))?;
        Ok(Some(document.scores))
    }

    pub fn save(&self, scores: &[Entry]) -> StoreResult<()> {
        let mut encoded = serde_json::to_vec_pretty(&DocumentRef { scores })
            .map_err(|e| encoding_failure(&self.path, e))?;
        encoded.push(b'\n');

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;

        let temp = self.temp_path();
        if let Err(e) = self.replace_with(&temp, &encoded) {
            // Best effort, the original error is the one worth reporting.
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        sync_dir(parent).map_err(|e| StorageError::io(parent, e))?;

        debug!("Saved {} entries to {}", scores.len(), self.path.display());
        Ok(())
    }

    fn replace_with(&self, temp: &Path, encoded: &[u8]) -> StoreResult<()> {
        let mut file = fs::File::create(temp).map_err(|e| StorageError::io(temp, e))?;
        file.write_all(encoded)
            .and_then(|_| file.sync_all())
            .map_err(|e| StorageError::io(temp, e))?;
        drop(file);
        fs::rename(temp, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }
}

// Encoding problems are on our side, not in the file, so they are not CorruptData.
fn encoding_failure(path: &Path, e: serde_json::Error) -> StorageError {
    StorageError::io(path, io::Error::other(e))
}

// Makes the rename itself durable.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

// Borrowing twin of `Document` so saving does not clone the collection.
#[derive(Serialize)]
struct DocumentRef<'a> {
    scores: &'a [Entry],
}
