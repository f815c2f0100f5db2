//! Host selection for cluster roles.

use std::collections::HashSet;

use super::topology::ClusterTopology;
use crate::error::ConfigError;
use crate::fleet::{Host, HostTable};

/// Hosts chosen for one run.
#[derive(Debug, Clone)]
pub struct Placement {
    pub coordinator: Host,
    pub servers: Vec<Host>,
}

/// Pick a coordinator host and a server host set from the static table.
///
/// Disjunct placement takes the first `num_servers` hosts, one server each;
/// packed placement wraps round-robin. The coordinator colocates with the
/// first server under `share_hosts`, otherwise it takes the first host no
/// server is using.
pub fn place(table: &HostTable, topology: &ClusterTopology) -> Result<Placement, ConfigError> {
    if table.is_empty() {
        return Err(ConfigError::MissingField {
            field: "fleet.hosts",
        });
    }

    let servers: Vec<Host> = if topology.disjunct {
        table.iter().take(topology.num_servers).cloned().collect()
    } else {
        (0..topology.num_servers)
            .map(|i| table.get(i % table.len()).cloned().unwrap())
            .collect()
    };

    let used: HashSet<&str> = servers.iter().map(|h| h.name.as_str()).collect();

    let coordinator = if topology.share_hosts {
        servers[0].clone()
    } else {
        table
            .iter()
            .find(|h| !used.contains(h.name.as_str()))
            .cloned()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "share_hosts",
                reason: "no host left for the coordinator; pass --share-hosts or add hosts".into(),
            })?
    };

    Ok(Placement {
        coordinator,
        servers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::topology::Transport;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn table(n: u8) -> HostTable {
        HostTable::new(
            (1..=n)
                .map(|i| Host::new(format!("rc{i:02}"), Ipv4Addr::new(10, 0, 0, i), i))
                .collect(),
        )
    }

    fn topology(num_servers: usize, disjunct: bool, share_hosts: bool) -> ClusterTopology {
        ClusterTopology {
            num_servers,
            num_replicas: 0,
            transport: Transport::Tcp,
            master_args: String::new(),
            disjunct,
            share_hosts,
            timeout: Duration::from_secs(1),
            clean_up: false,
        }
    }

    #[test]
    fn disjunct_servers_land_on_distinct_hosts() {
        let placement = place(&table(6), &topology(4, true, false)).unwrap();
        let names: HashSet<_> = placement.servers.iter().map(|h| h.name.clone()).collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn packed_servers_wrap_around_the_table() {
        let placement = place(&table(2), &topology(5, false, true)).unwrap();
        assert_eq!(placement.servers.len(), 5);
        assert_eq!(placement.servers[0].name, "rc01");
        assert_eq!(placement.servers[2].name, "rc01");
        assert_eq!(placement.servers[3].name, "rc02");
    }

    #[test]
    fn coordinator_avoids_server_hosts_by_default() {
        let placement = place(&table(5), &topology(4, true, false)).unwrap();
        assert!(placement
            .servers
            .iter()
            .all(|h| h.name != placement.coordinator.name));
    }

    #[test]
    fn share_hosts_colocates_the_coordinator() {
        let placement = place(&table(4), &topology(4, true, true)).unwrap();
        assert_eq!(placement.coordinator.name, placement.servers[0].name);
    }

    #[test]
    fn full_table_without_share_hosts_is_rejected() {
        let err = place(&table(4), &topology(4, true, false)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "share_hosts", .. }
        ));
    }
}
