use super::types::{ConfStanzas, Namespace, Properties, SavedSearch, SavedSearchSpec};
use super::{already_exists, not_found, ConfigService, ServiceError};
use crate::utils::now_iso;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

/// Operations of [`ConfigService`], used to inject failures and to inspect
/// the order calls were made in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetConfiguration,
    UpdateConfiguration,
    ListSavedSearches,
    DeleteSavedSearch,
    CreateSavedSearch,
}

#[derive(Debug, Default)]
struct MemoryState {
    confs: BTreeMap<String, ConfStanzas>,
    searches: Vec<SavedSearch>,
    failures: HashMap<Operation, ServiceError>,
    calls: Vec<Operation>,
}

impl MemoryState {
    fn record(&mut self, operation: Operation) -> Result<(), ServiceError> {
        self.calls.push(operation);
        match self.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Configuration service held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryConfigService {
    state: Mutex<MemoryState>,
}

impl MemoryConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future call of `operation` fail with `error`
    pub async fn fail_on(&self, operation: Operation, error: ServiceError) {
        self.state.lock().await.failures.insert(operation, error);
    }

    pub async fn clear_failures(&self) {
        self.state.lock().await.failures.clear();
    }

    /// Every call made so far, in order (failed calls included)
    pub async fn calls(&self) -> Vec<Operation> {
        self.state.lock().await.calls.clone()
    }

    /// Seed a saved search, bypassing the name check
    pub async fn insert_saved_search(&self, search: SavedSearch) {
        self.state.lock().await.searches.push(search);
    }

    /// All stored saved searches, whatever their app
    pub async fn all_saved_searches(&self) -> Vec<SavedSearch> {
        self.state.lock().await.searches.clone()
    }
}

#[async_trait]
impl ConfigService for MemoryConfigService {
    async fn get_configuration(&self, file: &str) -> Result<ConfStanzas, ServiceError> {
        let mut state = self.state.lock().await;
        state.record(Operation::GetConfiguration)?;
        Ok(state.confs.get(file).cloned().unwrap_or_default())
    }

    async fn update_configuration(
        &self,
        file: &str,
        stanza: &str,
        properties: &Properties,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        state.record(Operation::UpdateConfiguration)?;

        let entry = state
            .confs
            .entry(file.to_string())
            .or_default()
            .entry(stanza.to_string())
            .or_default();
        entry.extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    async fn list_saved_searches(&self, app: &str) -> Result<Vec<SavedSearch>, ServiceError> {
        let mut state = self.state.lock().await;
        state.record(Operation::ListSavedSearches)?;
        Ok(state
            .searches
            .iter()
            .filter(|s| s.namespace.app == app)
            .cloned()
            .collect())
    }

    async fn delete_saved_search(&self, search: &SavedSearch) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        state.record(Operation::DeleteSavedSearch)?;

        let position = state
            .searches
            .iter()
            .position(|s| s.name == search.name && s.namespace == search.namespace)
            .ok_or_else(|| not_found(&search.name))?;
        state.searches.remove(position);
        Ok(())
    }

    async fn create_saved_search(
        &self,
        namespace: &Namespace,
        spec: &SavedSearchSpec,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        state.record(Operation::CreateSavedSearch)?;

        if state
            .searches
            .iter()
            .any(|s| s.name == spec.name && s.namespace.app == namespace.app)
        {
            return Err(already_exists(namespace, &spec.name));
        }

        state.searches.push(SavedSearch {
            name: spec.name.clone(),
            namespace: namespace.clone(),
            properties: spec.properties.clone(),
            updated_at: now_iso(),
        });
        Ok(())
    }
}
