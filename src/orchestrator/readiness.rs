//! Server readiness detection.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

use super::manifest::ProcessRecord;

/// One readiness check against a launched process.
///
/// The orchestrator polls every pending process through this trait until
/// all answer or the run's wall-clock deadline passes. Swapping the probe
/// (port check, RPC ping, log scan) never touches the orchestrator.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// A single attempt; true when the process answers at its locator
    /// address. Implementations must return promptly, they are polled in
    /// a loop that owns the overall deadline.
    async fn probe(&self, record: &ProcessRecord) -> bool;
}

/// Default probe: a TCP connect against the process's locator address.
/// Needs no cooperation from the server binary.
pub struct TcpProbe {
    connect_timeout: Duration,
}

impl TcpProbe {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl ReadinessProbe for TcpProbe {
    async fn probe(&self, record: &ProcessRecord) -> bool {
        let addr = (record.host.ip, record.port);
        matches!(
            tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr)).await,
            Ok(Ok(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Host;
    use crate::orchestrator::manifest::Role;
    use std::net::Ipv4Addr;

    fn local_record(port: u16) -> ProcessRecord {
        let host = Host::new("localhost", Ipv4Addr::LOCALHOST, 1);
        ProcessRecord {
            locator: format!("tcp:host={},port={port}", host.ip),
            host,
            pid: 42,
            role: Role::Master,
            port,
        }
    }

    #[tokio::test]
    async fn listening_port_probes_ready() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpProbe::default();
        assert!(probe.probe(&local_record(port)).await);
    }

    #[tokio::test]
    async fn closed_port_probes_unready() {
        // Bind then drop to get a port that is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = TcpProbe::default();
        assert!(!probe.probe(&local_record(port)).await);
    }
}
