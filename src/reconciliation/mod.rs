//! Reconciliation of the platform configuration with the setup settings.
//!
//! A run has three phases, each awaited before the next starts:
//! 1. upsert the modular input stanza,
//! 2. delete every saved search of the app and create the lookup jobs,
//! 3. replace the fixed cleanup jobs by name.
//!
//! An optional fourth phase flags the app as configured.

mod execute;
mod plan;
mod reconciler;

pub use execute::{
    apply_input_settings, complete_setup, execute_reconciliation, install_cleanup_jobs,
    replace_lookup_jobs, Phase, ReconcileError, ReconciliationResult,
};
pub use plan::{build_reconciliation_plan, PlanError, ReconciliationPlan};
pub use reconciler::Reconciler;
