//! Recording remote-executor mock.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::error::RemoteError;
use crate::fleet::Host;
use crate::remote::{RemoteExecutor, RemoteProcess};

/// One recorded launch.
#[derive(Debug, Clone)]
pub struct LaunchRecord {
    pub host: String,
    pub command: String,
    pub log_file: String,
    pub pid: u32,
}

/// In-memory executor: records every call, hands out sequential pids,
/// and fails all traffic to hosts marked unreachable.
#[derive(Default)]
pub struct MockExecutor {
    next_pid: AtomicU32,
    unreachable: Mutex<HashSet<String>>,
    launched: Mutex<Vec<LaunchRecord>>,
    terminated: Mutex<Vec<(String, u32)>>,
    pattern_kills: Mutex<Vec<(String, String)>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            next_pid: AtomicU32::new(1000),
            ..Default::default()
        }
    }

    /// All traffic to `host` now fails with `RemoteError::Unreachable`.
    pub fn fail_host(&self, host: &str) {
        self.unreachable.lock().unwrap().insert(host.to_string());
    }

    pub fn launches(&self) -> Vec<LaunchRecord> {
        self.launched.lock().unwrap().clone()
    }

    /// `(host, pid)` pairs, in termination order.
    pub fn terminations(&self) -> Vec<(String, u32)> {
        self.terminated.lock().unwrap().clone()
    }

    /// `(host, pattern)` pairs from degraded-mode kills.
    pub fn pattern_kills(&self) -> Vec<(String, String)> {
        self.pattern_kills.lock().unwrap().clone()
    }

    fn check_reachable(&self, host: &Host) -> Result<(), RemoteError> {
        if self.unreachable.lock().unwrap().contains(&host.name) {
            return Err(RemoteError::Unreachable {
                host: host.name.clone(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteExecutor for MockExecutor {
    async fn spawn(
        &self,
        host: &Host,
        command: &str,
        log_file: &str,
    ) -> Result<RemoteProcess, RemoteError> {
        self.check_reachable(host)?;
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        self.launched.lock().unwrap().push(LaunchRecord {
            host: host.name.clone(),
            command: command.to_string(),
            log_file: log_file.to_string(),
            pid,
        });
        Ok(RemoteProcess {
            host: host.name.clone(),
            pid,
        })
    }

    async fn terminate(&self, host: &Host, pid: u32) -> Result<(), RemoteError> {
        self.check_reachable(host)?;
        self.terminated.lock().unwrap().push((host.name.clone(), pid));
        Ok(())
    }

    async fn terminate_matching(&self, host: &Host, pattern: &str) -> Result<(), RemoteError> {
        self.check_reachable(host)?;
        self.pattern_kills
            .lock()
            .unwrap()
            .push((host.name.clone(), pattern.to_string()));
        Ok(())
    }
}
