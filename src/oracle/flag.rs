//! Per-builder failure flag
//!
//! The oracle remembers whether the most recent build of a builder failed by
//! keeping an empty marker file `<work_dir>/<builder>.failed`. The file's
//! existence is the whole state: present means failed, absent means
//! succeeded. Only the latest outcome is kept.

use log::{debug, info};
use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Extension of the marker file
pub const FLAG_EXTENSION: &str = "failed";

/// Outcome of the most recent build of a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LastBuild {
    Succeeded,
    Failed,
}

/// Tracks the last build state of one builder
///
/// Builders sharing a work directory must have distinct names. There is no
/// locking; a builder is expected to be driven by one process at a time.
#[derive(Debug, Clone)]
pub struct BuildStatusOracle {
    builder_name: String,
    work_dir: PathBuf,
}

impl BuildStatusOracle {
    pub fn new(builder_name: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        BuildStatusOracle {
            builder_name: builder_name.into(),
            work_dir: work_dir.into(),
        }
    }

    pub fn builder_name(&self) -> &str {
        &self.builder_name
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path of the marker file for this builder
    pub fn flag_path(&self) -> PathBuf {
        self.work_dir
            .join(format!("{}.{}", self.builder_name, FLAG_EXTENSION))
    }

    /// Current state read from disk. A missing work directory reads as success.
    pub fn last_build(&self) -> LastBuild {
        if self.flag_path().exists() {
            LastBuild::Failed
        } else {
            LastBuild::Succeeded
        }
    }

    pub fn last_build_succeeded(&self) -> bool {
        self.last_build() == LastBuild::Succeeded
    }

    /// Record that the last build failed. Calling this repeatedly is harmless.
    pub fn set_last_build_as_failed(&self) -> io::Result<()> {
        self.mark_failed()
    }

    /// Drop a recorded failure, if any
    pub fn forget_last_build(&self) -> io::Result<()> {
        match self.last_build() {
            LastBuild::Failed => self.clear(),
            LastBuild::Succeeded => Ok(()),
        }
    }

    /// Succeeded | Failed -> Failed
    fn mark_failed(&self) -> io::Result<()> {
        self.transition(LastBuild::Failed)
    }

    /// Failed -> Succeeded
    fn clear(&self) -> io::Result<()> {
        self.transition(LastBuild::Succeeded)
    }

    fn transition(&self, to: LastBuild) -> io::Result<()> {
        let path = self.flag_path();
        match to {
            LastBuild::Failed => {
                fs::create_dir_all(&self.work_dir)?;
                File::create(&path)?;
                info!("Builder '{}': last build marked as failed", self.builder_name);
            }
            LastBuild::Succeeded => match fs::remove_file(&path) {
                Ok(()) => info!("Builder '{}': forgot failed build", self.builder_name),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Builder '{}': flag {} already gone", self.builder_name, path.display());
                }
                Err(e) => return Err(e),
            },
        }
        Ok(())
    }
}
