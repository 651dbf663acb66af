use handlebars::Handlebars;
use thiserror::Error;

use super::types::{CleanupSearchContext, LookupSearchContext, TemplateType};

/// Runs the user's query, joins it against the IOC collection, and appends
/// each sighting to the alerts collection keyed by a per-event hash so the
/// same sighting is never recorded twice.
pub const LOOKUP_SEARCH_TEMPLATE: &str = concat!(
    "{{query}} | lookup {{collection}} _key as {{field}} ",
    "OUTPUTNEW _key as matched_ioc indicator_id as indicator_id ",
    "| search matched_ioc=* ",
    "| eval event=_raw, event_time=_time, sighting_hash=sha256(host.index.sourcetype.event), ioc_type=\"{{ioc_type}}\" ",
    "| fields event_time,matched_ioc,ioc_type,indicator_id,host,index,sourcetype,event,sighting_hash ",
    "| outputlookup {{alerts_collection}} append=true key_field=sighting_hash",
);

/// Rewrites the IOC collection without the indicators whose validity ended
pub const CLEANUP_SEARCH_TEMPLATE: &str = concat!(
    "| inputlookup {{collection}} ",
    "| convert num(valid_until) ",
    "| where isNull(valid_until) OR valid_until > now() ",
    "| outputlookup {{collection}}",
);

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Render error: {0}")]
    RenderError(#[from] handlebars::RenderError),
}

pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Searches are SPL, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        Self { handlebars }
    }

    /// Source of the template for a search type
    pub fn template_source(template_type: TemplateType) -> &'static str {
        match template_type {
            TemplateType::LookupSearch => LOOKUP_SEARCH_TEMPLATE,
            TemplateType::CleanupSearch => CLEANUP_SEARCH_TEMPLATE,
        }
    }

    /// Render the search of a lookup job
    pub fn render_lookup_search(&self, context: &LookupSearchContext) -> Result<String, TemplateError> {
        self.handlebars
            .render_template(Self::template_source(TemplateType::LookupSearch), context)
            .map_err(TemplateError::from)
    }

    /// Render the search of a cleanup job
    pub fn render_cleanup_search(
        &self,
        context: &CleanupSearchContext,
    ) -> Result<String, TemplateError> {
        self.handlebars
            .render_template(Self::template_source(TemplateType::CleanupSearch), context)
            .map_err(TemplateError::from)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
