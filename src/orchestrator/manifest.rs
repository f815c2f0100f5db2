//! Persisted record of a running cluster.
//!
//! `stop` runs in a separate process from `start`, so the manifest is the
//! only bridge between them: every process launched by a run is recorded
//! here, and teardown trusts nothing else. A stale manifest is worse than a
//! missing one, so teardown deletes it even after partial failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::fleet::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coordinator,
    Master,
    Backup,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Coordinator => f.write_str("coordinator"),
            Role::Master => f.write_str("master"),
            Role::Backup => f.write_str("backup"),
        }
    }
}

/// One launched remote process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub host: Host,
    pub pid: u32,
    pub role: Role,
    pub locator: String,
    pub port: u16,
}

impl ProcessRecord {
    /// "role on host (pid N)", the form used in logs and reports.
    pub fn describe(&self) -> String {
        format!("{} on {} (pid {})", self.role, self.host.name, self.pid)
    }
}

/// The record of what is currently running, persisted after a fully
/// successful start and consumed by a later stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub coordinator: ProcessRecord,
    pub servers: Vec<ProcessRecord>,
    pub created_at: DateTime<Utc>,
}

impl RunManifest {
    /// Every recorded process, coordinator first.
    pub fn entries(&self) -> impl Iterator<Item = &ProcessRecord> {
        std::iter::once(&self.coordinator).chain(self.servers.iter())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load the manifest, or `None` when no run is recorded.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Remove the manifest. Removing an absent manifest is a no-op.
    pub fn delete(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
