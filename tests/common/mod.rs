#![allow(dead_code)]

use sekoia_setup::service::Properties;
use sekoia_setup::{
    FeedSettings, IocType, LookupSpec, MemoryConfigService, Namespace, SavedSearch, SetupSettings,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temporary directory for a directory-backed store
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

pub fn memory_service() -> Arc<MemoryConfigService> {
    Arc::new(MemoryConfigService::new())
}

pub fn settings_with(lookups: Vec<LookupSpec>) -> SetupSettings {
    SetupSettings {
        feed: FeedSettings::new("test-api-key", "d6092c37-d8d7-45c3-8aff-c4dc26030608"),
        lookups,
    }
}

pub fn three_lookups() -> Vec<LookupSpec> {
    vec![
        LookupSpec::new(IocType::Md5, "index=edr sourcetype=process", "file_hash"),
        LookupSpec::new(IocType::Ipv4, "index=fw", "dest_ip"),
        LookupSpec::new(IocType::Domain, "index=dns", "query"),
    ]
}

/// A saved search that some earlier run (or a person) left in the namespace
pub fn leftover_search(name: &str, app: &str) -> SavedSearch {
    SavedSearch {
        name: name.to_string(),
        namespace: Namespace::new("nobody", app, "app"),
        properties: Properties::from([("search".to_string(), "index=* | head 1".to_string())]),
        updated_at: String::new(),
    }
}

pub fn names(searches: &[SavedSearch]) -> Vec<String> {
    let mut names: Vec<String> = searches.iter().map(|s| s.name.clone()).collect();
    names.sort();
    names
}

pub fn lookup_names(searches: &[SavedSearch]) -> Vec<String> {
    names(searches)
        .into_iter()
        .filter(|n| n.contains(" lookup "))
        .collect()
}

pub fn cleanup_names(searches: &[SavedSearch]) -> Vec<String> {
    names(searches)
        .into_iter()
        .filter(|n| n.contains("IOC Cleanup"))
        .collect()
}
