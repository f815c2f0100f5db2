//! Handler for the `status` command.

use chrono::Utc;
use tabled::{Table, Tabled};

use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::RunManifest;

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(rename = "HOST")]
    host: String,
    #[tabled(rename = "PID")]
    pid: u32,
    #[tabled(rename = "LOCATOR")]
    locator: String,
}

/// Execute the status command.
pub fn execute(config: &Config) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let manifest_path = config.state.manifest_path();

    println!();
    println!("fleetmux v{version}");

    let Some(manifest) = RunManifest::load(&manifest_path)? else {
        println!("Status:  ○ no cluster running");
        println!();
        println!("Run 'fleetmux start' to launch one.");
        return Ok(());
    };

    let age = Utc::now().signed_duration_since(manifest.created_at);
    println!(
        "Status:  ● cluster up for {} ({} servers)",
        humanize(age.num_seconds().max(0)),
        manifest.servers.len()
    );
    println!();

    let rows: Vec<ProcessRow> = manifest
        .entries()
        .map(|r| ProcessRow {
            role: r.role.to_string(),
            host: r.host.name.clone(),
            pid: r.pid,
            locator: r.locator.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));
    println!();
    Ok(())
}

fn humanize(seconds: i64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m{}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h{}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
