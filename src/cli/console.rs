//! Handler for the `console` command.

use crate::cli::ConsoleArgs;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::mux::{self, PaneSpec, SessionSpec, SynchronizePanes, Tmux};

/// Execute the console command: one ssh pane per fleet host,
/// synchronized input unless desynchronized was requested.
pub fn execute(config: &Config, args: &ConsoleArgs) -> Result<()> {
    let hosts = resolve_hosts(config, args.serverlist.as_deref());
    if hosts.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "serverlist",
            reason: "no hosts to open consoles on".into(),
        }
        .into());
    }

    let spec = SessionSpec {
        name: config.session.name.clone(),
        panes: pane_specs(&hosts),
    };

    let tmux = Tmux;
    if args.desynch {
        mux::create(&tmux, &spec, None)?;
    } else {
        mux::create(&tmux, &spec, Some(&SynchronizePanes))?;
    }
    Ok(())
}

/// The hosts to open consoles on: an explicit comma-separated override,
/// or the full configured fleet.
fn resolve_hosts(config: &Config, serverlist: Option<&str>) -> Vec<String> {
    match serverlist {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => config.hosts().names(),
    }
}

fn pane_specs(hosts: &[String]) -> Vec<PaneSpec> {
    hosts
        .iter()
        .map(|host| PaneSpec::new(vec![format!("ssh {host}")]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serverlist_override_keeps_input_order() {
        let config = Config::default();
        let hosts = resolve_hosts(&config, Some("host1,host2,host3"));
        assert_eq!(hosts, vec!["host1", "host2", "host3"]);

        let panes = pane_specs(&hosts);
        assert_eq!(panes.len(), 3);
        assert_eq!(panes[0].commands(), ["ssh host1"]);
        assert_eq!(panes[2].commands(), ["ssh host3"]);
    }

    #[test]
    fn missing_serverlist_falls_back_to_the_fleet() {
        let config = Config::default();
        let hosts = resolve_hosts(&config, None);
        assert_eq!(hosts.len(), 60);
        assert_eq!(hosts[0], "rc01");
    }

    #[test]
    fn blank_entries_are_dropped() {
        let config = Config::default();
        let hosts = resolve_hosts(&config, Some("host1,, host2 ,"));
        assert_eq!(hosts, vec!["host1", "host2"]);
    }
}
