use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown IOC type: {0}")]
pub struct UnknownIocType(pub String);

/// Kind of indicator of compromise supported by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IocType {
    Md5,
    Sha1,
    Sha256,
    Ipv4,
    Domain,
    Url,
}

impl IocType {
    /// All supported types, in the order the setup form lists them
    pub const ALL: [IocType; 6] = [
        IocType::Md5,
        IocType::Sha1,
        IocType::Sha256,
        IocType::Ipv4,
        IocType::Domain,
        IocType::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IocType::Md5 => "md5",
            IocType::Sha1 => "sha1",
            IocType::Sha256 => "sha256",
            IocType::Ipv4 => "ipv4",
            IocType::Domain => "domain",
            IocType::Url => "url",
        }
    }

    /// Name of the KV store collection holding indicators of this type
    pub fn collection_name(&self) -> String {
        format!("sekoia_iocs_{}", self.as_str())
    }
}

impl fmt::Display for IocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IocType {
    type Err = UnknownIocType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IocType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownIocType(s.to_string()))
    }
}

/// Credentials and location of the SEKOIA.IO feed
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSettings {
    pub api_key: String,
    /// Empty means the default feed
    #[serde(default)]
    pub feed_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_root_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

impl FeedSettings {
    pub fn new(api_key: impl Into<String>, feed_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            feed_id: feed_id.into(),
            api_root_url: None,
            proxy_url: None,
        }
    }

    /// Properties written to the modular input stanza.
    ///
    /// Unset optionals are written as empty strings so that an upsert
    /// clears a value left by a previous run.
    pub fn to_properties(&self) -> BTreeMap<String, String> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();

        BTreeMap::from([
            ("api_key".to_string(), self.api_key.clone()),
            ("feed_id".to_string(), self.feed_id.clone()),
            ("api_root_url".to_string(), optional(&self.api_root_url)),
            ("proxy_url".to_string(), optional(&self.proxy_url)),
        ])
    }

    /// Rebuild feed settings from a modular input stanza
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| properties.get(key).map(|v| v.trim().to_string());
        let non_empty = |key: &str| get(key).filter(|v| !v.is_empty());

        Self {
            api_key: get("api_key").unwrap_or_default(),
            feed_id: get("feed_id").unwrap_or_default(),
            api_root_url: non_empty("api_root_url"),
            proxy_url: non_empty("proxy_url"),
        }
    }
}

// Keep API keys out of logs
impl fmt::Debug for FeedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSettings")
            .field("api_key", &"<redacted>")
            .field("feed_id", &self.feed_id)
            .field("api_root_url", &self.api_root_url)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

/// A user-defined search whose results are matched against one IOC type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSpec {
    #[serde(rename = "type")]
    pub ioc_type: IocType,
    pub query: String,
    pub field: String,
}

impl LookupSpec {
    pub fn new(ioc_type: IocType, query: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            ioc_type,
            query: query.into(),
            field: field.into(),
        }
    }
}

/// Everything the setup form submits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupSettings {
    pub feed: FeedSettings,
    #[serde(default)]
    pub lookups: Vec<LookupSpec>,
}
