//! File rotation management for the logger
//!
//! The active file is renamed to `<name>.1` when it reaches the size limit;
//! older backups shift up by one and the one past `max_backups` is removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::logger::config::RotationConfig;

/// Decides when to rotate and shifts the numbered backups
pub struct RotationManager {
    config: RotationConfig,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    pub fn should_rotate(&self, current_file_size: u64) -> bool {
        current_file_size >= self.config.max_size
    }

    /// Perform file rotation
    pub fn rotate(&self, current_path: &Path) -> io::Result<()> {
        let oldest = backup_path(current_path, self.config.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for index in (1..self.config.max_backups).rev() {
            let from = backup_path(current_path, index);
            if from.exists() {
                fs::rename(&from, backup_path(current_path, index + 1))?;
            }
        }

        if current_path.exists() {
            fs::rename(current_path, backup_path(current_path, 1))?;
        }
        Ok(())
    }
}

/// `app.log` -> `app.log.<index>`
pub fn backup_path(base_path: &Path, index: usize) -> PathBuf {
    let mut name = base_path.as_os_str().to_os_string();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
