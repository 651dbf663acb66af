mod hash;

pub use hash::{compute_hash, compute_parts_hash};

/// Name of the Splunk application that owns the generated searches
pub const APP_NAME: &str = "sekoia.io";

/// Configuration file holding the modular input stanza
pub const INPUTS_CONF: &str = "inputs";

/// Stanza of the SEKOIA.IO indicators modular input
pub const INPUT_STANZA: &str = "sekoia_indicators://feed";

/// Feed used by the modular input when no feed ID is configured
pub const DEFAULT_FEED_ID: &str = "d6092c37-d8d7-45c3-8aff-c4dc26030608";

/// Prefix shared by every saved search this app generates
pub const JOB_PREFIX: &str = "SEKOIA.IO";

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
