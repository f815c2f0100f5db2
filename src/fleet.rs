//! Static fleet description: the machines available for cluster roles.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// One fleet machine.
///
/// `name` must be SSH-resolvable from the operator's machine. `ip` is the
/// address baked into service locators. `id` is a small per-fleet number
/// used to derive deterministic link-layer addresses for datagram
/// transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    pub ip: Ipv4Addr,
    pub id: u8,
}

impl Host {
    pub fn new(name: impl Into<String>, ip: Ipv4Addr, id: u8) -> Self {
        Self {
            name: name.into(),
            ip,
            id,
        }
    }

    /// Deterministic locally-administered MAC derived from the host id.
    pub fn ethernet_address(&self) -> String {
        format!("de:ad:be:ef:00:{:02x}", self.id)
    }
}

/// Ordered, read-only table of fleet hosts. Loaded once at process start.
#[derive(Debug, Clone, Default)]
pub struct HostTable {
    hosts: Vec<Host>,
}

impl HostTable {
    pub fn new(hosts: Vec<Host>) -> Self {
        Self { hosts }
    }

    /// The stock lab fleet: rc01..rc60 on 192.168.1.101..160, ids 1..60.
    pub fn default_fleet() -> Self {
        let hosts = (1..=60u8)
            .map(|i| {
                Host::new(
                    format!("rc{i:02}"),
                    Ipv4Addr::new(192, 168, 1, 100 + i),
                    i,
                )
            })
            .collect();
        Self { hosts }
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Host> {
        self.hosts.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Host> {
        self.hosts.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.hosts.iter().map(|h| h.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fleet_covers_the_rack() {
        let fleet = HostTable::default_fleet();
        assert_eq!(fleet.len(), 60);
        assert_eq!(fleet.get(0).unwrap().name, "rc01");
        assert_eq!(fleet.get(59).unwrap().name, "rc60");
        assert_eq!(fleet.get(0).unwrap().ip, Ipv4Addr::new(192, 168, 1, 101));
        assert_eq!(fleet.get(59).unwrap().ip, Ipv4Addr::new(192, 168, 1, 160));
    }

    #[test]
    fn ethernet_address_is_deterministic_per_id() {
        let host = Host::new("rc07", Ipv4Addr::new(192, 168, 1, 107), 7);
        assert_eq!(host.ethernet_address(), "de:ad:be:ef:00:07");
        let host = Host::new("rc60", Ipv4Addr::new(192, 168, 1, 160), 60);
        assert_eq!(host.ethernet_address(), "de:ad:be:ef:00:3c");
    }
}
