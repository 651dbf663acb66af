use serde::Serialize;

/// Kind of generated search (for picking the template)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    LookupSearch,
    CleanupSearch,
}

/// Context for lookup searches
/// Placeholders: {{query}}, {{collection}}, {{field}}, {{ioc_type}}, {{alerts_collection}}
#[derive(Debug, Clone, Serialize)]
pub struct LookupSearchContext {
    pub query: String,
    pub collection: String,
    pub field: String,
    pub ioc_type: String,
    pub alerts_collection: String,
}

/// Context for cleanup searches
/// Placeholders: {{collection}}
#[derive(Debug, Clone, Serialize)]
pub struct CleanupSearchContext {
    pub collection: String,
}
