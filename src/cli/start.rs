//! Handler for the `start` command.

use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use crate::cli::StartArgs;
use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::{ClusterTopology, Orchestrator, ShutdownFlag, TcpProbe};
use crate::remote::SshExecutor;

/// Execute the start command.
pub async fn execute(config: &Config, args: &StartArgs) -> Result<()> {
    let topology = ClusterTopology {
        num_servers: args.servers,
        num_replicas: args.replicas,
        transport: args.transport,
        master_args: args.master_args.clone(),
        disjunct: !args.no_disjunct,
        share_hosts: args.share_hosts,
        timeout: Duration::from_secs(args.timeout),
        clean_up: args.clean_up,
    };

    let orchestrator = Orchestrator::new(
        config,
        Arc::new(SshExecutor::new()),
        Arc::new(TcpProbe::default()),
    );

    // Ctrl-c during startup is handled like a timeout: roll back, leave
    // no manifest behind.
    let shutdown = ShutdownFlag::new();
    let flag = shutdown.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            flag.set();
        }
    });

    info!(
        servers = topology.num_servers,
        replicas = topology.num_replicas,
        transport = %topology.transport,
        timeout_secs = args.timeout,
        "Starting cluster"
    );

    let manifest = orchestrator.run(&topology, &shutdown).await?;

    println!(
        "✓ Cluster up: coordinator on {}, {} servers",
        manifest.coordinator.host.name,
        manifest.servers.len()
    );
    println!("  coordinator locator: {}", manifest.coordinator.locator);
    println!("  stop with: fleetmux stop");
    Ok(())
}
