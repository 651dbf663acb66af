use super::plan::{PlanError, ReconciliationPlan};
use crate::jobs::{is_cleanup_job_name, GeneratedJob};
use crate::service::{ConfigService, Namespace, Properties, ServiceError};
use crate::utils::{INPUTS_CONF, INPUT_STANZA};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration file and stanza flagged once setup has completed
const APP_CONF: &str = "app";
const INSTALL_STANZA: &str = "install";

/// Step of a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    Lookups,
    Cleanup,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Input => "input",
            Phase::Lookups => "lookups",
            Phase::Cleanup => "cleanup",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Plan error: {0}")]
    PlanError(#[from] PlanError),

    #[error("{phase} phase failed: {source}")]
    PhaseFailed {
        phase: Phase,
        #[source]
        source: ServiceError,
    },

    #[error("A setup run is already in progress")]
    AlreadyRunning,
}

impl ReconcileError {
    /// Phase that failed, if the failure came from the service
    pub fn phase(&self) -> Option<Phase> {
        match self {
            ReconcileError::PhaseFailed { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Flat list of human-readable messages for display
    pub fn display_messages(&self) -> Vec<String> {
        match self {
            ReconcileError::PhaseFailed { source, .. } => source.display_messages(),
            other => vec![other.to_string()],
        }
    }
}

/// What a successful run changed
#[derive(Debug, Clone, Default)]
pub struct ReconciliationResult {
    /// Saved searches removed from the namespace
    pub deleted: Vec<String>,
    pub created_lookups: Vec<String>,
    pub created_cleanups: Vec<String>,
    pub marked_configured: bool,
}

/// Execute a reconciliation plan.
///
/// Phases run strictly one after the other and the first failure aborts the
/// run. Completed phases are not rolled back.
pub async fn execute_reconciliation(
    service: &dyn ConfigService,
    plan: &ReconciliationPlan,
) -> Result<ReconciliationResult, ReconcileError> {
    let mut result = ReconciliationResult::default();

    apply_input_settings(service, &plan.input_properties)
        .await
        .map_err(in_phase(Phase::Input))?;
    info!(stanza = INPUT_STANZA, "Modular input configured");

    replace_lookup_jobs(service, &plan.namespace, &plan.lookup_jobs, &mut result)
        .await
        .map_err(in_phase(Phase::Lookups))?;
    info!(
        deleted = result.deleted.len(),
        created = result.created_lookups.len(),
        "Lookup jobs replaced"
    );

    install_cleanup_jobs(service, &plan.namespace, &plan.cleanup_jobs, &mut result)
        .await
        .map_err(in_phase(Phase::Cleanup))?;
    info!(created = result.created_cleanups.len(), "Cleanup jobs installed");

    if plan.mark_configured {
        complete_setup(service).await.map_err(in_phase(Phase::Complete))?;
        result.marked_configured = true;
        info!("App flagged as configured");
    }

    Ok(result)
}

fn in_phase(phase: Phase) -> impl FnOnce(ServiceError) -> ReconcileError {
    move |source| ReconcileError::PhaseFailed { phase, source }
}

/// Upsert the modular input stanza. Re-applying the same settings is a no-op.
pub async fn apply_input_settings(
    service: &dyn ConfigService,
    properties: &Properties,
) -> Result<(), ServiceError> {
    service
        .update_configuration(INPUTS_CONF, INPUT_STANZA, properties)
        .await
}

/// Delete every saved search in the namespace, then create the lookup jobs.
///
/// The app owns its whole saved-search namespace: anything found there is
/// removed, whether or not it is about to be recreated.
pub async fn replace_lookup_jobs(
    service: &dyn ConfigService,
    namespace: &Namespace,
    jobs: &[GeneratedJob],
    result: &mut ReconciliationResult,
) -> Result<(), ServiceError> {
    let existing = service.list_saved_searches(&namespace.app).await?;

    for search in &existing {
        service.delete_saved_search(search).await?;
        debug!(name = %search.name, "Deleted saved search");
        result.deleted.push(search.name.clone());
    }

    for job in jobs {
        service.create_saved_search(namespace, &job.to_spec()).await?;
        debug!(name = %job.name, cron = %job.cron_schedule, "Created lookup job");
        result.created_lookups.push(job.name.clone());
    }

    Ok(())
}

/// Replace the cleanup jobs by name
pub async fn install_cleanup_jobs(
    service: &dyn ConfigService,
    namespace: &Namespace,
    jobs: &[GeneratedJob],
    result: &mut ReconciliationResult,
) -> Result<(), ServiceError> {
    let existing = service.list_saved_searches(&namespace.app).await?;

    for search in existing.iter().filter(|s| is_cleanup_job_name(&s.name)) {
        service.delete_saved_search(search).await?;
        debug!(name = %search.name, "Deleted previous cleanup job");
        result.deleted.push(search.name.clone());
    }

    for job in jobs {
        service.create_saved_search(namespace, &job.to_spec()).await?;
        debug!(name = %job.name, cron = %job.cron_schedule, "Created cleanup job");
        result.created_cleanups.push(job.name.clone());
    }

    Ok(())
}

/// Flag the app as configured in app.conf
pub async fn complete_setup(service: &dyn ConfigService) -> Result<(), ServiceError> {
    let properties = Properties::from([("is_configured".to_string(), "true".to_string())]);
    service
        .update_configuration(APP_CONF, INSTALL_STANZA, &properties)
        .await
}
