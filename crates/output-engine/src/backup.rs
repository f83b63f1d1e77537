//! Backup rotation for previous outputs.
//!
//! Before an output is written, any file already at that path (and, when
//! guarded, its companion plot image) is moved into a new directory
//! `{root}/{prefix}{i}`, `i` being the smallest positive integer whose
//! directory does not exist yet. The probe runs against the filesystem on
//! every call.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pathcurve_common::config::BackupSettings;
use pathcurve_common::error::{CurveError, CurveResult};
use serde::Serialize;

/// Directory created by one rotation, and what was moved into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupDirectory {
    pub path: PathBuf,
    pub index: u32,
    /// Final locations of the moved files.
    pub moved: Vec<PathBuf>,
}

/// Guards outputs under one root directory.
///
/// Probe, create and move run under a single lock so concurrent workers
/// never pick the same index or move the same file twice.
#[derive(Debug)]
pub struct BackupManager {
    root: PathBuf,
    settings: BackupSettings,
    lock: Mutex<()>,
}

impl BackupManager {
    pub fn new(root: impl Into<PathBuf>, settings: BackupSettings) -> Self {
        Self {
            root: root.into(),
            settings,
            lock: Mutex::new(()),
        }
    }

    /// Companion plot image for an output text file.
    pub fn companion_path(output_path: &Path) -> PathBuf {
        output_path.with_extension("png")
    }

    /// Move any previous output for `output_path` into a fresh backup directory.
    ///
    /// Returns `None` when there was nothing to move. After `Ok` the output
    /// path does not exist.
    pub fn protect(&self, output_path: &Path) -> CurveResult<Option<BackupDirectory>> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut conflicts = Vec::new();
        if output_path.exists() {
            conflicts.push(output_path.to_path_buf());
        }
        if self.settings.guard_companion {
            let companion = Self::companion_path(output_path);
            if companion.exists() {
                conflicts.push(companion);
            }
        }
        if conflicts.is_empty() {
            return Ok(None);
        }

        let (index, dir) = self.create_next_dir()?;

        let mut moved = Vec::with_capacity(conflicts.len());
        for source in conflicts {
            let Some(name) = source.file_name() else {
                return Err(CurveError::backup_io(
                    &source,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
                ));
            };
            let target = dir.join(name);
            std::fs::rename(&source, &target).map_err(|e| CurveError::backup_io(&source, e))?;
            tracing::debug!(
                from = %source.display(),
                to = %target.display(),
                "Moved previous output"
            );
            moved.push(target);
        }

        Ok(Some(BackupDirectory {
            path: dir,
            index,
            moved,
        }))
    }

    /// Smallest index whose directory does not exist yet, created atomically.
    fn create_next_dir(&self) -> CurveResult<(u32, PathBuf)> {
        let mut index = 1u32;
        loop {
            let candidate = self.root.join(format!("{}{index}", self.settings.prefix));
            if !candidate.exists() {
                match std::fs::create_dir(&candidate) {
                    Ok(()) => return Ok((index, candidate)),
                    // Lost a race with another process; keep probing.
                    Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                    Err(e) => return Err(CurveError::backup_io(candidate, e)),
                }
            }
            index = index.checked_add(1).ok_or_else(|| {
                CurveError::backup_io(
                    &self.root,
                    std::io::Error::other("backup directory indices exhausted"),
                )
            })?;
        }
    }
}
