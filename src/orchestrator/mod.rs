//! Cluster lifecycle: launch, readiness, teardown.
//!
//! `run` drives one start invocation end to end: place roles on hosts,
//! launch the coordinator, fan the server launches out concurrently, then
//! poll every process for readiness under a single wall-clock deadline.
//! A run either fully succeeds (manifest persisted, every role ready) or
//! fully rolls back; no partially-running cluster is ever recorded.
//!
//! `stop` is the mirror image, driven entirely by the persisted manifest:
//! terminations fan out to every recorded host, partial failures are
//! collected rather than short-circuiting, and the manifest is cleared
//! regardless so a later start never chases stale pids.
//!
//! Concurrent `run`/`stop` invocations against one manifest path are
//! operator error and not defended against.

pub mod manifest;
pub mod placement;
pub mod readiness;
pub mod topology;

pub use manifest::{ProcessRecord, Role, RunManifest};
pub use readiness::{ReadinessProbe, TcpProbe};
pub use topology::{ClusterTopology, Transport};

use chrono::Utc;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{Config, FleetConfig};
use crate::error::{ClusterError, RemoteError, Result};
use crate::fleet::{Host, HostTable};
use crate::remote::RemoteExecutor;

/// Delay between readiness poll rounds.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Cooperative interrupt, set from a signal handler and checked by the
/// readiness loop. An interrupted start rolls back like a timeout.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One process that could not be reached during teardown.
#[derive(Debug)]
pub struct TeardownFailure {
    pub target: String,
    pub reason: String,
}

/// Outcome of a teardown pass. Failures never block the rest of the
/// teardown; they are reported here instead.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub terminated: Vec<String>,
    pub failures: Vec<TeardownFailure>,
}

impl TeardownReport {
    pub fn is_empty(&self) -> bool {
        self.terminated.is_empty() && self.failures.is_empty()
    }
}

pub struct Orchestrator {
    fleet: HostTable,
    settings: FleetConfig,
    manifest_path: PathBuf,
    executor: Arc<dyn RemoteExecutor>,
    probe: Arc<dyn ReadinessProbe>,
}

impl Orchestrator {
    pub fn new(
        config: &Config,
        executor: Arc<dyn RemoteExecutor>,
        probe: Arc<dyn ReadinessProbe>,
    ) -> Self {
        Self {
            fleet: config.hosts(),
            settings: config.fleet.clone(),
            manifest_path: config.state.manifest_path(),
            executor,
            probe,
        }
    }

    /// Launch a cluster of the given shape and wait for every role to
    /// become ready. Persists and returns the run manifest on success.
    pub async fn run(
        &self,
        topology: &ClusterTopology,
        shutdown: &ShutdownFlag,
    ) -> Result<RunManifest> {
        topology.validate(self.fleet.len())?;

        if topology.clean_up {
            match self.stop().await {
                Ok(report) if !report.is_empty() => {
                    info!(cleared = report.terminated.len(), "Previous run cleaned up");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Cleanup of previous run failed; continuing"),
            }
        }

        let placement = placement::place(&self.fleet, topology)?;
        info!(
            coordinator = %placement.coordinator.name,
            servers = placement.servers.len(),
            transport = %topology.transport,
            "Launching cluster"
        );

        // Servers register with the coordinator at startup, so its launch
        // must complete before theirs are issued.
        let coordinator = self
            .launch_coordinator(&placement.coordinator, topology)
            .await?;

        let assignments = assign_server_ports(&placement.servers, self.settings.server_port);
        let launches = assignments
            .iter()
            .enumerate()
            .map(|(index, (host, port))| {
                self.launch_server(index, host, *port, &coordinator.locator, topology)
            });

        let mut servers = Vec::new();
        let mut failures = Vec::new();
        for result in join_all(launches).await {
            match result {
                Ok(record) => servers.push(record),
                Err(e) => failures.push(e),
            }
        }

        let mut records = vec![coordinator.clone()];
        records.extend(servers.iter().cloned());

        if let Some(first) = failures.into_iter().next() {
            // Fail fast, no retries; kill whatever did come up.
            self.rollback(&records).await;
            return Err(first);
        }

        self.await_readiness(topology, shutdown, &records).await?;

        let manifest = RunManifest {
            coordinator,
            servers,
            created_at: Utc::now(),
        };
        manifest.save(&self.manifest_path)?;
        info!(
            manifest = %self.manifest_path.display(),
            "Cluster ready"
        );
        Ok(manifest)
    }

    /// Tear down the cluster recorded in the manifest. Partial host
    /// unreachability is reported, never fatal; the manifest is always
    /// cleared.
    pub async fn stop(&self) -> Result<TeardownReport> {
        let Some(manifest) = RunManifest::load(&self.manifest_path)? else {
            info!("No run manifest found; nothing to stop");
            return Ok(TeardownReport::default());
        };

        let entries: Vec<ProcessRecord> = manifest.entries().cloned().collect();
        info!(processes = entries.len(), "Tearing down cluster");

        let results = join_all(entries.iter().map(|r| self.terminate_record(r))).await;

        let mut report = TeardownReport::default();
        for (record, result) in entries.iter().zip(results) {
            match result {
                Ok(()) => {
                    debug!(target = %record.describe(), "Terminated");
                    report.terminated.push(record.describe());
                }
                Err(e) => {
                    warn!(host = %record.host.name, error = %e, "Could not terminate");
                    report.failures.push(TeardownFailure {
                        target: record.describe(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        RunManifest::delete(&self.manifest_path)?;
        Ok(report)
    }

    async fn launch_coordinator(
        &self,
        host: &Host,
        topology: &ClusterTopology,
    ) -> Result<ProcessRecord> {
        let port = self.settings.coordinator_port;
        let locator = topology.transport.locator(host, port);
        let command = format!("{} -C {}", self.settings.coordinator_bin, locator);
        let log_file = format!("{}/coordinator.log", self.settings.log_dir);

        debug!(host = %host.name, %command, "Launching coordinator");
        let process = self
            .executor
            .spawn(host, &command, &log_file)
            .await
            .map_err(|e| launch_error(Role::Coordinator, host, e))?;

        Ok(ProcessRecord {
            host: host.clone(),
            pid: process.pid,
            role: Role::Coordinator,
            locator,
            port,
        })
    }

    async fn launch_server(
        &self,
        index: usize,
        host: &Host,
        port: u16,
        coordinator_locator: &str,
        topology: &ClusterTopology,
    ) -> Result<ProcessRecord> {
        let locator = topology.transport.locator(host, port);
        let command = format!(
            "{} -L {} -C {} -r {} {} {}",
            self.settings.server_bin,
            locator,
            coordinator_locator,
            topology.num_replicas,
            topology.master_args,
            self.settings.disk_arg,
        );
        let log_file = format!("{}/server{}.log", self.settings.log_dir, index);

        debug!(host = %host.name, %command, "Launching server");
        let process = self
            .executor
            .spawn(host, &command, &log_file)
            .await
            .map_err(|e| launch_error(Role::Master, host, e))?;

        Ok(ProcessRecord {
            host: host.clone(),
            pid: process.pid,
            role: Role::Master,
            locator,
            port,
        })
    }

    /// Poll every launched process until all are ready, the deadline
    /// passes, or the operator interrupts. The deadline bounds the whole
    /// wait, never a per-host sum.
    async fn await_readiness(
        &self,
        topology: &ClusterTopology,
        shutdown: &ShutdownFlag,
        records: &[ProcessRecord],
    ) -> Result<()> {
        let deadline = Instant::now() + topology.timeout;
        let mut pending: Vec<ProcessRecord> = records.to_vec();

        loop {
            if shutdown.is_set() {
                warn!("Interrupted; rolling back partial launch");
                self.rollback(records).await;
                return Err(ClusterError::Interrupted.into());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                let unready: Vec<String> =
                    pending.iter().map(ProcessRecord::describe).collect();
                warn!(unready = ?unready, "Startup deadline passed; rolling back");
                self.rollback(records).await;
                return Err(ClusterError::StartupTimeout {
                    timeout_secs: topology.timeout.as_secs(),
                    unready,
                }
                .into());
            }

            let round = join_all(pending.iter().map(|r| self.probe.probe(r)));
            let ready = match tokio::time::timeout(remaining, round).await {
                Ok(results) => results,
                // Deadline hit mid-round; the loop top turns it into a
                // timeout error.
                Err(_) => vec![false; pending.len()],
            };

            let mut flags = ready.into_iter();
            pending.retain(|_| !flags.next().unwrap_or(false));

            if pending.is_empty() {
                return Ok(());
            }

            debug!(pending = pending.len(), "Waiting for readiness");
            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(POLL_INTERVAL.min(remaining)).await;
        }
    }

    /// Best-effort kill of everything launched in this invocation.
    async fn rollback(&self, records: &[ProcessRecord]) {
        let results = join_all(records.iter().map(|r| self.terminate_record(r))).await;
        for (record, result) in records.iter().zip(results) {
            if let Err(e) = result {
                warn!(target = %record.describe(), error = %e, "Rollback kill failed");
            }
        }
    }

    async fn terminate_record(&self, record: &ProcessRecord) -> std::result::Result<(), RemoteError> {
        match self.executor.terminate(&record.host, record.pid).await {
            Ok(()) => Ok(()),
            Err(first) => {
                // Degraded mode: the pid may be stale; fall back to a
                // pattern kill by binary name.
                let pattern = self.kill_pattern(record.role);
                match self
                    .executor
                    .terminate_matching(&record.host, &pattern)
                    .await
                {
                    Ok(()) => Ok(()),
                    Err(_) => Err(first),
                }
            }
        }
    }

    fn kill_pattern(&self, role: Role) -> String {
        let bin = match role {
            Role::Coordinator => &self.settings.coordinator_bin,
            Role::Master | Role::Backup => &self.settings.server_bin,
        };
        bin.rsplit('/').next().unwrap_or(bin.as_str()).to_string()
    }
}

/// Distinct ports for servers packed onto the same host.
fn assign_server_ports(servers: &[Host], base_port: u16) -> Vec<(Host, u16)> {
    let mut packed: HashMap<String, u16> = HashMap::new();
    servers
        .iter()
        .map(|host| {
            let offset = packed.entry(host.name.clone()).or_insert(0);
            let port = base_port + *offset;
            *offset += 1;
            (host.clone(), port)
        })
        .collect()
}

fn launch_error(role: Role, host: &Host, source: RemoteError) -> crate::error::Error {
    ClusterError::LaunchFailed {
        role: role.to_string(),
        host: host.name.clone(),
        source,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn packed_hosts_get_distinct_ports() {
        let a = Host::new("rc01", Ipv4Addr::new(10, 0, 0, 1), 1);
        let b = Host::new("rc02", Ipv4Addr::new(10, 0, 0, 2), 2);
        let servers = vec![a.clone(), b.clone(), a.clone(), a];

        let assigned = assign_server_ports(&servers, 12247);
        let ports: Vec<u16> = assigned.iter().map(|(_, p)| *p).collect();
        assert_eq!(ports, vec![12247, 12247, 12248, 12249]);
    }

    #[test]
    fn shutdown_flag_round_trip() {
        let flag = ShutdownFlag::new();
        assert!(!flag.is_set());
        let clone = flag.clone();
        clone.set();
        assert!(flag.is_set());
    }
}
