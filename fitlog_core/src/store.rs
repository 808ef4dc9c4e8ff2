//! User collection persistence with file locking.
//!
//! The whole collection is written on every save. Writes go to a temp
//! file in the same directory which is synced and renamed over the
//! target, so readers see either the old or the new file. A sidecar
//! `.lock` file serializes writers and readers from other processes.

use crate::{Error, Result, UserRecord};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Durable storage for the user collection
pub trait UserStore {
    /// Read every stored user
    ///
    /// Missing or unreadable data is not an error: it yields an empty list.
    fn load(&self) -> Vec<UserRecord>;

    /// Replace the stored collection with `users`
    fn save(&self, users: &[UserRecord]) -> Result<()>;
}

/// JSON file store (`[{"username", "weight", "activities"}, ...]`)
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn open_lock(&self) -> std::io::Result<File> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
    }

    fn read_contents(&self) -> std::io::Result<String> {
        let lock = self.open_lock()?;
        lock.lock_shared()?;

        let mut contents = String::new();
        let result = File::open(&self.path)
            .and_then(|file| std::io::BufReader::new(file).read_to_string(&mut contents));

        lock.unlock()?;
        result.map(|_| contents)
    }
}

impl UserStore for JsonFileStore {
    fn load(&self) -> Vec<UserRecord> {
        if !self.path.exists() {
            tracing::info!("No users file found at {:?}, starting empty", self.path);
            return Vec::new();
        }

        let contents = match self.read_contents() {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    "Failed to read users file {:?}: {}. Starting empty.",
                    self.path,
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<UserRecord>>(&contents) {
            Ok(users) => {
                tracing::debug!("Loaded {} users from {:?}", users.len(), self.path);
                users
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse users file {:?}: {}. Starting empty.",
                    self.path,
                    e
                );
                Vec::new()
            }
        }
    }

    fn save(&self, users: &[UserRecord]) -> Result<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let lock = self.open_lock()?;
        lock.lock_exclusive()?;

        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, users)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        // Atomically replace the old file
        let persisted = temp.persist(&self.path).map_err(|e| Error::Io(e.error));
        lock.unlock()?;
        persisted?;

        tracing::debug!("Saved {} users to {:?}", users.len(), self.path);
        Ok(())
    }
}
