use super::types::{ConfStanzas, Namespace, Properties, SavedSearch, SavedSearchSpec};
use super::{already_exists, not_found, ConfigService, ServiceError};
use crate::utils::{compute_hash, now_iso};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration service persisted as JSON files under a root directory.
///
/// Layout:
/// - `conf/<file>.json`: stanza name -> properties
/// - `savedsearches/<app>/<sha256(name)>.json`: one saved search per file
///
/// Search files placed in an app directory under another file name are
/// still listed, and deleting them removes the file they were read from.
pub struct DirectoryConfigService {
    root: PathBuf,
    /// Serializes read-modify-write cycles on conf files
    lock: Mutex<()>,
}

impl DirectoryConfigService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn conf_path(&self, file: &str) -> PathBuf {
        self.root.join("conf").join(format!("{}.json", file))
    }

    fn app_searches_dir(&self, app: &str) -> PathBuf {
        self.root.join("savedsearches").join(app)
    }

    fn search_path(&self, app: &str, name: &str) -> PathBuf {
        self.app_searches_dir(app)
            .join(format!("{}.json", compute_hash(name)))
    }

    /// Read every saved search file of an app, with the path it came from
    async fn scan_searches(&self, app: &str) -> Result<Vec<(PathBuf, SavedSearch)>, ServiceError> {
        let dir = self.app_searches_dir(app);
        let mut searches = Vec::new();

        if !dir.exists() {
            return Ok(searches);
        }

        let paths: Vec<PathBuf> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();

        for path in paths {
            let content = fs::read_to_string(&path).await?;
            match serde_json::from_str::<SavedSearch>(&content) {
                Ok(search) => searches.push((path, search)),
                Err(e) => warn!(path = %path.display(), "Skipping malformed saved search: {}", e),
            }
        }

        Ok(searches)
    }

    /// Locate the file holding a saved search, trying the hashed name first
    async fn find_search_file(&self, app: &str, name: &str) -> Result<Option<PathBuf>, ServiceError> {
        let path = self.search_path(app, name);
        if path.exists() {
            return Ok(Some(path));
        }

        let found = self
            .scan_searches(app)
            .await?
            .into_iter()
            .find(|(_, search)| search.name == name)
            .map(|(path, _)| path);
        Ok(found)
    }

    async fn read_conf(&self, file: &str) -> Result<ConfStanzas, ServiceError> {
        let path = self.conf_path(file);

        if !path.exists() {
            return Ok(ConfStanzas::new());
        }

        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Write atomically using temp file + rename
async fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ServiceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(value)?;
    fs::write(&temp_path, &content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

#[async_trait]
impl ConfigService for DirectoryConfigService {
    async fn get_configuration(&self, file: &str) -> Result<ConfStanzas, ServiceError> {
        self.read_conf(file).await
    }

    async fn update_configuration(
        &self,
        file: &str,
        stanza: &str,
        properties: &Properties,
    ) -> Result<(), ServiceError> {
        // Lock the entire read-modify-write cycle
        let _guard = self.lock.lock().await;

        let mut confs = self.read_conf(file).await?;
        confs
            .entry(stanza.to_string())
            .or_default()
            .extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));

        write_json_atomic(&self.conf_path(file), &confs).await?;
        debug!(file = %file, stanza = %stanza, "Updated configuration stanza");
        Ok(())
    }

    async fn list_saved_searches(&self, app: &str) -> Result<Vec<SavedSearch>, ServiceError> {
        let mut searches: Vec<SavedSearch> = self
            .scan_searches(app)
            .await?
            .into_iter()
            .map(|(_, search)| search)
            .collect();

        searches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(searches)
    }

    async fn delete_saved_search(&self, search: &SavedSearch) -> Result<(), ServiceError> {
        let Some(path) = self.find_search_file(&search.namespace.app, &search.name).await? else {
            return Err(not_found(&search.name));
        };

        fs::remove_file(&path).await?;
        Ok(())
    }

    async fn create_saved_search(
        &self,
        namespace: &Namespace,
        spec: &SavedSearchSpec,
    ) -> Result<(), ServiceError> {
        if self.find_search_file(&namespace.app, &spec.name).await?.is_some() {
            return Err(already_exists(namespace, &spec.name));
        }

        let search = SavedSearch {
            name: spec.name.clone(),
            namespace: namespace.clone(),
            properties: spec.properties.clone(),
            updated_at: now_iso(),
        };
        write_json_atomic(&self.search_path(&namespace.app, &spec.name), &search).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let service = DirectoryConfigService::new("/srv/store");
        assert_eq!(
            service.conf_path("inputs"),
            Path::new("/srv/store/conf/inputs.json")
        );
        assert_eq!(
            service.search_path("sekoia.io", "hello world"),
            Path::new(
                "/srv/store/savedsearches/sekoia.io/b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9.json"
            )
        );
    }

    #[tokio::test]
    async fn test_missing_conf_reads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let service = DirectoryConfigService::new(temp_dir.path());
        assert!(service.get_configuration("inputs").await.unwrap().is_empty());
        assert!(service.list_saved_searches("sekoia.io").await.unwrap().is_empty());
    }
}
