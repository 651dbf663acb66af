pub mod config;
pub mod jobs;
pub mod reconciliation;
pub mod service;
pub mod settings;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use config::{read_config, write_config, ConfigError, SetupConfig};
pub use jobs::{GeneratedJob, LookupNaming};
pub use reconciliation::{
    build_reconciliation_plan, execute_reconciliation, Phase, PlanError, ReconcileError,
    ReconciliationPlan, ReconciliationResult, Reconciler,
};
pub use service::{
    ConfigService, DirectoryConfigService, MemoryConfigService, Namespace, SavedSearch,
    SavedSearchSpec, ServiceError, ServiceMessage,
};
pub use settings::{
    load_current_settings, parse_form, parse_form_json, FeedSettings, FormError, FormField,
    IocType, LookupSpec, SetupSettings,
};
pub use template::{TemplateEngine, TemplateError};
