//! Configuration-service boundary.
//!
//! The reconciler only ever talks to the host platform through
//! [`ConfigService`]. Two implementations ship with the crate: an in-memory
//! store and a directory-backed JSON store.

mod directory;
mod error;
mod memory;
mod types;

pub use directory::DirectoryConfigService;
pub use error::{ServiceError, ServiceMessage};
pub use memory::{MemoryConfigService, Operation};
pub use types::{ConfStanzas, Namespace, Properties, SavedSearch, SavedSearchSpec};

use async_trait::async_trait;

/// Narrow view of the platform's configuration REST API
#[async_trait]
pub trait ConfigService: Send + Sync {
    /// Read every stanza of a configuration file
    async fn get_configuration(&self, file: &str) -> Result<ConfStanzas, ServiceError>;

    /// Upsert a stanza: keys in `properties` overwrite, other keys are kept
    async fn update_configuration(
        &self,
        file: &str,
        stanza: &str,
        properties: &Properties,
    ) -> Result<(), ServiceError>;

    /// List saved searches belonging to `app`
    async fn list_saved_searches(&self, app: &str) -> Result<Vec<SavedSearch>, ServiceError>;

    async fn delete_saved_search(&self, search: &SavedSearch) -> Result<(), ServiceError>;

    /// Create a saved search; fails if the name is taken in the namespace
    async fn create_saved_search(
        &self,
        namespace: &Namespace,
        spec: &SavedSearchSpec,
    ) -> Result<(), ServiceError>;
}

pub(crate) fn already_exists(namespace: &Namespace, name: &str) -> ServiceError {
    ServiceError::Structured(vec![ServiceMessage::new(
        "ERROR",
        format!(
            "A saved search named '{}' already exists in app '{}'",
            name, namespace.app
        ),
    )])
}

pub(crate) fn not_found(name: &str) -> ServiceError {
    ServiceError::Structured(vec![ServiceMessage::new(
        "ERROR",
        format!("Could not find object id={}", name),
    )])
}
