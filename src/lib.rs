//! Fleetmux - storage cluster bootstrap and synchronized fleet consoles.
//!
//! This crate drives two operator workflows over a static fleet of
//! machines:
//!
//! - **Cluster lifecycle**: launch one coordinator plus N storage servers
//!   over SSH, wait for readiness under a wall-clock deadline, persist a
//!   run manifest, and tear everything down from that manifest in a later
//!   invocation.
//! - **Console fan-out**: open a tmux session with one `ssh` pane per
//!   fleet host, with input mirrored across panes by default.
//!
//! # Modules
//!
//! - [`cli`] - Command-line surface and per-command handlers
//! - [`config`] - TOML configuration: fleet table, ports, session, logging
//! - [`error`] - Error types for the crate
//! - [`fleet`] - Static host table
//! - [`remote`] - Remote-execution channel (trait + SSH implementation)
//! - [`orchestrator`] - Cluster launch, readiness, manifest, teardown
//! - [`mux`] - tmux session multiplexer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use fleetmux::config::Config;
//! use fleetmux::orchestrator::{
//!     ClusterTopology, Orchestrator, ShutdownFlag, TcpProbe, Transport,
//! };
//! use fleetmux::remote::SshExecutor;
//!
//! # async fn demo() -> fleetmux::error::Result<()> {
//! let config = Config::load("fleetmux.toml")?;
//! let orchestrator = Orchestrator::new(
//!     &config,
//!     Arc::new(SshExecutor::new()),
//!     Arc::new(TcpProbe::default()),
//! );
//!
//! let topology = ClusterTopology {
//!     num_servers: 4,
//!     num_replicas: 1,
//!     transport: Transport::FastUdp,
//!     master_args: "--totalMasterMemory 8000".into(),
//!     disjunct: true,
//!     share_hosts: false,
//!     timeout: Duration::from_secs(250),
//!     clean_up: false,
//! };
//! let manifest = orchestrator.run(&topology, &ShutdownFlag::new()).await?;
//! println!("coordinator at {}", manifest.coordinator.locator);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod mux;
pub mod orchestrator;
pub mod remote;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
