//! Remote-execution channel: run commands on fleet machines.
//!
//! The orchestrator only needs "execute a command on a host and get back a
//! way to check on or kill it". [`RemoteExecutor`] is that seam; the SSH
//! implementation lives in [`ssh`], and the testkit provides a recording
//! mock behind the same trait.

pub mod ssh;

pub use ssh::SshExecutor;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::fleet::Host;

/// A long-lived process started on a remote host, identified by pid.
#[derive(Debug, Clone)]
pub struct RemoteProcess {
    pub host: String,
    pub pid: u32,
}

#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Start a long-lived process on `host`, detached from the channel,
    /// with stdout/stderr captured to `log_file` on the remote side.
    /// Returns the remote pid.
    async fn spawn(
        &self,
        host: &Host,
        command: &str,
        log_file: &str,
    ) -> Result<RemoteProcess, RemoteError>;

    /// Send a terminate signal to `pid` on `host`. A pid that is already
    /// gone is not an error; only channel failures are.
    async fn terminate(&self, host: &Host, pid: u32) -> Result<(), RemoteError>;

    /// Kill any process on `host` whose command line matches `pattern`.
    /// Degraded-mode cleanup for when no usable pid is recorded.
    async fn terminate_matching(&self, host: &Host, pattern: &str) -> Result<(), RemoteError>;
}
