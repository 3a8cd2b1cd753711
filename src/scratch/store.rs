//! Scratch directory and capture artifact lifecycle.

use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_SUBDIR: &str = "still-server";

/// Allocates per-capture scratch files and owns the directory they live in.
///
/// One artifact exists per capture; the capture serialization upstream
/// guarantees two artifacts are never in flight at once, which also keeps
/// the epoch-millisecond naming scheme collision-free.
#[derive(Debug, Clone)]
pub struct ScratchStore {
    dir: PathBuf,
}

impl Default for ScratchStore {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join(DEFAULT_SUBDIR),
        }
    }
}

impl ScratchStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory itself is created lazily on first allocation.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory scratch files are placed in.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Allocates a scratch file path for one capture.
    ///
    /// Creates the scratch directory if absent. The file itself is not
    /// created; the capture tool writes it.
    pub fn allocate(&self) -> io::Result<TempArtifact> {
        fs::create_dir_all(&self.dir)?;
        let name = format!("capture_{}.jpg", Utc::now().timestamp_millis());
        Ok(TempArtifact {
            path: self.dir.join(name),
            released: false,
        })
    }
}

/// A scratch file owned by exactly one in-flight capture.
///
/// The file is removed when the artifact is dropped, so every exit path
/// out of a capture cleans up, including early returns. [`release`] is the
/// explicit form; calling it more than once is harmless, and a file that
/// was never written is not an error.
///
/// [`release`]: TempArtifact::release
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    released: bool,
}

impl TempArtifact {
    /// Path the capture tool should write to.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file, consuming the artifact.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %error,
                    "Failed to remove scratch file"
                );
            }
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        self.remove();
    }
}
