use crate::config::SetupConfig;
use crate::jobs::{generate_cleanup_jobs, generate_lookup_jobs, GeneratedJob};
use crate::service::{Namespace, Properties};
use crate::settings::SetupSettings;
use crate::template::{TemplateEngine, TemplateError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),
}

/// Everything a reconciliation run will write, computed without touching
/// the configuration service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPlan {
    /// Namespace whose saved searches are rebuilt
    pub namespace: Namespace,

    /// Properties for the modular input stanza
    #[serde(skip)]
    pub input_properties: Properties,

    /// Lookup jobs, in the order they will be created
    pub lookup_jobs: Vec<GeneratedJob>,

    /// The fixed cleanup jobs
    pub cleanup_jobs: Vec<GeneratedJob>,

    /// Whether app.conf is flagged as configured at the end
    pub mark_configured: bool,
}

impl ReconciliationPlan {
    /// Names of every job the plan installs
    pub fn job_names(&self) -> impl Iterator<Item = &str> {
        self.lookup_jobs
            .iter()
            .chain(self.cleanup_jobs.iter())
            .map(|job| job.name.as_str())
    }
}

/// Build the reconciliation plan for the submitted settings
pub fn build_reconciliation_plan(
    engine: &TemplateEngine,
    settings: &SetupSettings,
    config: &SetupConfig,
) -> Result<ReconciliationPlan, PlanError> {
    Ok(ReconciliationPlan {
        namespace: config.namespace.clone(),
        input_properties: settings.feed.to_properties(),
        lookup_jobs: generate_lookup_jobs(engine, &settings.lookups, config.lookup_naming)?,
        cleanup_jobs: generate_cleanup_jobs(engine)?,
        mark_configured: config.mark_configured,
    })
}
