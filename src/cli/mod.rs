//! Command-line interface definitions.

pub mod console;
pub mod start;
pub mod status;
pub mod stop;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::orchestrator::Transport;

/// Fleetmux - storage cluster bootstrap and fleet console fan-out.
#[derive(Parser, Debug)]
#[command(name = "fleetmux")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fleetmux.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the coordinator and storage servers across the fleet
    Start(StartArgs),

    /// Tear down the cluster recorded in the run manifest
    Stop,

    /// Open a tmux session with one console pane per fleet host
    Console(ConsoleArgs),

    /// Show the running cluster from the persisted manifest
    Status,
}

/// Arguments for the `start` subcommand. Defaults mirror the standard
/// operator preset.
#[derive(Parser, Debug)]
pub struct StartArgs {
    /// Number of storage servers to launch
    #[arg(long, default_value_t = 4)]
    pub servers: usize,

    /// Replicas kept for each segment
    #[arg(long, default_value_t = 1)]
    pub replicas: usize,

    /// Wire transport for service locators
    #[arg(long, value_enum, default_value_t = Transport::FastUdp)]
    pub transport: Transport,

    /// Extra arguments forwarded to every storage server
    #[arg(long, default_value = "--totalMasterMemory 8000 --segmentFrames 2500")]
    pub master_args: String,

    /// Seconds to wait for every role to become ready
    #[arg(long, default_value_t = 250)]
    pub timeout: u64,

    /// Allow several servers to share one host (disjunct placement is
    /// the default)
    #[arg(long)]
    pub no_disjunct: bool,

    /// Allow the coordinator to share a host with a server
    #[arg(long)]
    pub share_hosts: bool,

    /// Kill leftovers from a previous run before starting
    #[arg(long)]
    pub clean_up: bool,
}

/// Arguments for the `console` subcommand.
#[derive(Parser, Debug)]
pub struct ConsoleArgs {
    /// Comma-separated list of hosts; defaults to the configured fleet
    #[arg(short = 's', long)]
    pub serverlist: Option<String>,

    /// Keep panes desynchronized (each pane takes its own input);
    /// default is synchronized
    #[arg(short = 'd', long)]
    pub desynch: bool,
}
