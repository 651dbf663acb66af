mod engine;
mod types;

pub use engine::{TemplateEngine, TemplateError, CLEANUP_SEARCH_TEMPLATE, LOOKUP_SEARCH_TEMPLATE};
pub use types::{CleanupSearchContext, LookupSearchContext, TemplateType};
