use super::types::UnitReport;
use crate::space::types::UnitId;
use anyhow::{Context, Result};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Barrier;
use tokio::task::JoinSet;

/// A fixed group of P cooperating units.
///
/// Every unit runs the same body (SPMD); the group exists for exactly one
/// run, so there is no discovery, no failure detection and no resizing. The
/// barrier is the collective synchronization primitive: creation happens
/// before any insert, and the insert phase quiesces before any lookup.
pub struct UnitGroup {
    unit_count: u32,
    barrier: Barrier,
    registry: DashMap<UnitId, UnitReport>,
}

impl UnitGroup {
    pub fn new(unit_count: u32) -> Result<Arc<Self>> {
        anyhow::ensure!(unit_count > 0, "a unit group needs at least one unit");

        tracing::info!(units = unit_count, "starting unit group");
        Ok(Arc::new(Self {
            unit_count,
            barrier: Barrier::new(unit_count as usize),
            registry: DashMap::new(),
        }))
    }

    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    /// Collective synchronization point; every unit of the group must reach
    /// it before any unit proceeds.
    pub async fn barrier(&self) {
        self.barrier.wait().await;
    }

    /// Registers a unit's counters. Last write per unit wins.
    pub fn submit_report(&self, report: UnitReport) {
        self.registry.insert(UnitId(report.unit), report);
    }

    /// All registered per-unit reports, ordered by unit id.
    pub fn reports(&self) -> Vec<UnitReport> {
        let mut reports: Vec<UnitReport> = self
            .registry
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        reports.sort_by_key(|report| report.unit);
        reports
    }

    /// Spawns the same body once per unit and joins them all.
    ///
    /// A unit failure (error or panic) fails the whole run: the first failure
    /// aborts every other unit, including any still parked on a barrier the
    /// failed unit will never reach. There is no retry and no partial
    /// completion, matching the one-shot batch model.
    pub async fn run<F, Fut>(self: &Arc<Self>, body: F) -> Result<()>
    where
        F: Fn(UnitId, Arc<UnitGroup>) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let mut units = JoinSet::new();
        for unit in 0..self.unit_count {
            let fut = body(UnitId(unit), Arc::clone(self));
            units.spawn(async move { fut.await.with_context(|| format!("unit {unit} failed")) });
        }

        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    units.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    units.abort_all();
                    return Err(anyhow::anyhow!("a unit panicked: {e}"));
                }
            }
        }

        Ok(())
    }
}
