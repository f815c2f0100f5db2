//! Handler for the `stop` command.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::{Orchestrator, TcpProbe};
use crate::remote::SshExecutor;

/// Execute the stop command. Partial host unreachability is reported but
/// never fails the teardown; the manifest is always cleared.
pub async fn execute(config: &Config) -> Result<()> {
    let orchestrator = Orchestrator::new(
        config,
        Arc::new(SshExecutor::new()),
        Arc::new(TcpProbe::default()),
    );

    let report = orchestrator.stop().await?;

    if report.is_empty() {
        println!("No cluster running.");
        return Ok(());
    }

    for target in &report.terminated {
        println!("✓ Stopped {target}");
    }
    for failure in &report.failures {
        eprintln!("✗ {}: {}", failure.target, failure.reason);
    }
    println!("✓ Run manifest cleared");

    if !report.failures.is_empty() {
        eprintln!(
            "{} process(es) could not be reached; finish by hand if they are still up.",
            report.failures.len()
        );
    }
    Ok(())
}
