//! Canned readiness probes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::orchestrator::manifest::ProcessRecord;
use crate::orchestrator::readiness::ReadinessProbe;

/// Everything is ready on the first poll.
pub struct InstantProbe;

#[async_trait]
impl ReadinessProbe for InstantProbe {
    async fn probe(&self, _record: &ProcessRecord) -> bool {
        true
    }
}

/// Nothing ever becomes ready; forces the timeout path.
pub struct NeverReadyProbe;

#[async_trait]
impl ReadinessProbe for NeverReadyProbe {
    async fn probe(&self, _record: &ProcessRecord) -> bool {
        false
    }
}

/// Unready for the first `rounds` probe calls, ready afterwards.
pub struct ReadyAfter {
    remaining: AtomicUsize,
}

impl ReadyAfter {
    pub fn new(rounds: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(rounds),
        }
    }
}

#[async_trait]
impl ReadinessProbe for ReadyAfter {
    async fn probe(&self, _record: &ProcessRecord) -> bool {
        let prev = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_sub(1))
            })
            .unwrap_or(0);
        prev == 0
    }
}
