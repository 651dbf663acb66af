use crate::utils::APP_NAME;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value properties of a configuration stanza or saved search
pub type Properties = BTreeMap<String, String>;

/// Stanzas of one configuration file, keyed by stanza name
pub type ConfStanzas = BTreeMap<String, Properties>;

/// Owner/app/sharing triple that scopes configuration objects
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    pub owner: String,
    pub app: String,
    pub sharing: String,
}

impl Namespace {
    pub fn new(owner: impl Into<String>, app: impl Into<String>, sharing: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            app: app.into(),
            sharing: sharing.into(),
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new("nobody", APP_NAME, "app")
    }
}

/// A saved search to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearchSpec {
    pub name: String,
    pub properties: Properties,
}

/// A saved search as stored by the configuration service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub name: String,
    pub namespace: Namespace,
    pub properties: Properties,
    /// When the service stored the search
    #[serde(default)]
    pub updated_at: String,
}

impl SavedSearch {
    pub fn search(&self) -> Option<&str> {
        self.properties.get("search").map(String::as_str)
    }
}
