use super::execute::{execute_reconciliation, ReconcileError, ReconciliationResult};
use super::plan::{build_reconciliation_plan, PlanError, ReconciliationPlan};
use crate::config::SetupConfig;
use crate::service::{ConfigService, ServiceError};
use crate::settings::{load_current_settings, SetupSettings};
use crate::template::TemplateEngine;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Applies setup settings to a configuration service.
///
/// At most one run is in flight per reconciler; a second submission while
/// one is running is rejected rather than queued, since two runs would race
/// on deleting and creating the same saved searches.
pub struct Reconciler {
    service: Arc<dyn ConfigService>,
    config: SetupConfig,
    engine: TemplateEngine,
    running: Mutex<()>,
}

impl Reconciler {
    pub fn new(service: Arc<dyn ConfigService>, config: SetupConfig) -> Self {
        Self {
            service,
            config,
            engine: TemplateEngine::new(),
            running: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// Compute what `reconcile` would write, without writing it
    pub fn plan(&self, settings: &SetupSettings) -> Result<ReconciliationPlan, PlanError> {
        build_reconciliation_plan(&self.engine, settings, &self.config)
    }

    /// Bring the platform in line with `settings`
    pub async fn reconcile(
        &self,
        settings: &SetupSettings,
    ) -> Result<ReconciliationResult, ReconcileError> {
        let _guard = self
            .running
            .try_lock()
            .map_err(|_| ReconcileError::AlreadyRunning)?;

        let plan = self.plan(settings)?;
        info!(
            app = %plan.namespace.app,
            lookups = plan.lookup_jobs.len(),
            "Starting setup"
        );

        match execute_reconciliation(self.service.as_ref(), &plan).await {
            Ok(result) => {
                info!("Setup completed");
                Ok(result)
            }
            Err(e) => {
                warn!(phase = ?e.phase(), "Setup failed: {}", e);
                Err(e)
            }
        }
    }

    /// Settings currently applied on the platform
    pub async fn current_settings(&self) -> Result<SetupSettings, ServiceError> {
        load_current_settings(
            self.service.as_ref(),
            &self.config.namespace,
            self.config.lookup_naming,
        )
        .await
    }
}
