// src/fs/mock.rs

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use super::FileSystem;
use crate::errors::Result;

/// In-memory [`FileSystem`] for tests: paths mapped to mtimes.
///
/// Only metadata is modelled; the engine never reads file contents.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    mtimes: Arc<Mutex<HashMap<PathBuf, SystemTime>>>,
    unreadable: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or update `path` with the current time as mtime.
    pub fn touch(&self, path: impl AsRef<Path>) {
        self.set_modified(path, SystemTime::now());
    }

    /// Create or update `path` with an mtime `ago` in the past.
    pub fn touched_ago(&self, path: impl AsRef<Path>, ago: Duration) {
        self.set_modified(path, SystemTime::now() - ago);
    }

    pub fn set_modified(&self, path: impl AsRef<Path>, mtime: SystemTime) {
        let mut mtimes = self.mtimes.lock().unwrap();
        mtimes.insert(path.as_ref().to_path_buf(), mtime);
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let mut mtimes = self.mtimes.lock().unwrap();
        mtimes.remove(path.as_ref());
    }

    /// Make `modified` fail for `path`, simulating e.g. a permission error.
    pub fn set_unreadable(&self, path: impl AsRef<Path>) {
        let mut unreadable = self.unreadable.lock().unwrap();
        unreadable.insert(path.as_ref().to_path_buf());
    }
}

impl FileSystem for MockFileSystem {
    fn modified(&self, path: &Path) -> Result<Option<SystemTime>> {
        {
            let unreadable = self.unreadable.lock().unwrap();
            if unreadable.contains(path) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("mock: metadata unreadable for {:?}", path),
                )
                .into());
            }
        }

        let mtimes = self.mtimes.lock().unwrap();
        Ok(mtimes.get(path).copied())
    }
}
