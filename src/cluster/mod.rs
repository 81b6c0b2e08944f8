//! Cluster Coordination Module
//!
//! Runs the fixed-size SPMD unit group and drives the whole build phase.
//!
//! ## Core Mechanisms
//! - **Unit group**: P units execute the same body over disjoint input
//!   shares; a shared barrier marks the collective points (table creation,
//!   the insert-phase quiesce, teardown).
//! - **Phase discipline**: lock-free lookups are only issued after the
//!   quiesce barrier, which is what makes them safe without locking.
//! - **Reporting**: each unit registers its per-unit counters in a shared
//!   registry; the driver folds them into a serializable build report.

pub mod build;
pub mod group;
pub mod types;

#[cfg(test)]
mod tests;

pub use build::{BuildOutput, build, shutdown};
pub use group::UnitGroup;
pub use types::{BuildReport, UnitReport};
