//! Desired cluster shape for one `start` invocation.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::fleet::Host;

/// Wire transport encoded into service locators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Transport {
    /// Reliable stream over TCP.
    #[value(name = "tcp")]
    Tcp,
    /// Fast unreliable datagrams over UDP.
    #[value(name = "fast+udp")]
    FastUdp,
    /// Infiniband reliable-connected verbs.
    #[value(name = "infrc")]
    Infrc,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Tcp => "tcp",
            Transport::FastUdp => "fast+udp",
            Transport::Infrc => "infrc",
        }
    }

    /// Service locator for a process listening on `host:port`.
    ///
    /// Datagram transports carry the host's deterministic link-layer
    /// address so drivers can pre-resolve peers.
    pub fn locator(&self, host: &Host, port: u16) -> String {
        match self {
            Transport::FastUdp => format!(
                "{}:host={},port={},mac={}",
                self.as_str(),
                host.ip,
                port,
                host.ethernet_address()
            ),
            _ => format!("{}:host={},port={}", self.as_str(), host.ip, port),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Transport::Tcp),
            "fast+udp" => Ok(Transport::FastUdp),
            "infrc" => Ok(Transport::Infrc),
            other => Err(ConfigError::InvalidValue {
                field: "transport",
                reason: format!("unknown transport '{other}' (expected tcp, fast+udp, infrc)"),
            }),
        }
    }
}

/// Desired shape of a cluster run. Built once per invocation, immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct ClusterTopology {
    pub num_servers: usize,
    pub num_replicas: usize,
    pub transport: Transport,
    /// Opaque extra arguments forwarded to every storage server.
    pub master_args: String,
    /// Every server on a distinct host.
    pub disjunct: bool,
    /// Allow the coordinator to share a host with a server.
    pub share_hosts: bool,
    /// Wall-clock bound on the whole startup, launch through readiness.
    pub timeout: Duration,
    /// Kill leftovers from a previous run before starting.
    pub clean_up: bool,
}

impl ClusterTopology {
    pub fn validate(&self, fleet_size: usize) -> Result<(), ConfigError> {
        if self.num_servers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "num_servers",
                reason: "at least one server is required".into(),
            });
        }
        if self.num_replicas >= self.num_servers {
            return Err(ConfigError::InvalidValue {
                field: "num_replicas",
                reason: format!(
                    "{} replicas need more than {} servers to hold them",
                    self.num_replicas, self.num_servers
                ),
            });
        }
        if self.disjunct && self.num_servers > fleet_size {
            return Err(ConfigError::InvalidValue {
                field: "num_servers",
                reason: format!(
                    "disjunct placement of {} servers needs more than the {} available hosts",
                    self.num_servers, fleet_size
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn topology(num_servers: usize, num_replicas: usize, disjunct: bool) -> ClusterTopology {
        ClusterTopology {
            num_servers,
            num_replicas,
            transport: Transport::FastUdp,
            master_args: String::new(),
            disjunct,
            share_hosts: false,
            timeout: Duration::from_secs(250),
            clean_up: false,
        }
    }

    #[test]
    fn transport_names_round_trip() {
        for t in [Transport::Tcp, Transport::FastUdp, Transport::Infrc] {
            assert_eq!(t.as_str().parse::<Transport>().unwrap(), t);
        }
        assert!("carrier-pigeon".parse::<Transport>().is_err());
    }

    #[test]
    fn tcp_locator_has_host_and_port() {
        let host = Host::new("rc01", Ipv4Addr::new(192, 168, 1, 101), 1);
        assert_eq!(
            Transport::Tcp.locator(&host, 12246),
            "tcp:host=192.168.1.101,port=12246"
        );
    }

    #[test]
    fn fast_udp_locator_carries_the_mac() {
        let host = Host::new("rc03", Ipv4Addr::new(192, 168, 1, 103), 3);
        assert_eq!(
            Transport::FastUdp.locator(&host, 12247),
            "fast+udp:host=192.168.1.103,port=12247,mac=de:ad:be:ef:00:03"
        );
    }

    #[test]
    fn zero_servers_is_rejected() {
        assert!(topology(0, 0, false).validate(60).is_err());
    }

    #[test]
    fn replicas_must_fit_under_server_count() {
        assert!(topology(4, 4, false).validate(60).is_err());
        assert!(topology(4, 3, false).validate(60).is_ok());
    }

    #[test]
    fn disjunct_placement_is_bounded_by_fleet_size() {
        assert!(topology(5, 1, true).validate(4).is_err());
        assert!(topology(5, 1, true).validate(5).is_ok());
        // Non-disjunct packing is allowed to reuse hosts.
        assert!(topology(5, 1, false).validate(2).is_ok());
    }
}
