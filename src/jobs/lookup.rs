use super::schedule::{lookup_cron, LOOKUP_EARLIEST, LOOKUP_LATEST};
use super::types::GeneratedJob;
use crate::settings::{IocType, LookupSpec};
use crate::template::{LookupSearchContext, TemplateEngine, TemplateError};
use crate::utils::{compute_parts_hash, JOB_PREFIX};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Collection every lookup job appends its sightings to
pub const ALERTS_COLLECTION: &str = "sekoia_alerts";

/// Length of the content hash used by [`LookupNaming::Stable`]
const STABLE_KEY_LEN: usize = 12;

/// Recovers the user's query, IOC type and field from a generated search
static LOOKUP_SEARCH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(.*?) \| lookup sekoia_iocs_(\w+) _key as (\S+) OUTPUTNEW")
        .expect("valid lookup search regex")
});

/// How lookup jobs are named
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupNaming {
    /// `SEKOIA.IO {type} lookup {position}`. Reordering the list renames jobs.
    #[default]
    Ordinal,
    /// `SEKOIA.IO {type} lookup {hash}` where the hash covers type, query
    /// and field. Names survive reordering.
    Stable,
}

/// Content key of a lookup: first hex chars of sha256(type, query, field)
pub fn lookup_key(spec: &LookupSpec) -> String {
    let mut key = compute_parts_hash(&[spec.ioc_type.as_str(), spec.query.as_str(), spec.field.as_str()]);
    key.truncate(STABLE_KEY_LEN);
    key
}

pub fn lookup_job_name(spec: &LookupSpec, ordinal: usize, naming: LookupNaming) -> String {
    match naming {
        LookupNaming::Ordinal => format!("{} {} lookup {}", JOB_PREFIX, spec.ioc_type, ordinal),
        LookupNaming::Stable => format!("{} {} lookup {}", JOB_PREFIX, spec.ioc_type, lookup_key(spec)),
    }
}

/// Build the scheduled job for the lookup at position `ordinal`
pub fn generate_lookup_job(
    engine: &TemplateEngine,
    spec: &LookupSpec,
    ordinal: usize,
    naming: LookupNaming,
) -> Result<GeneratedJob, TemplateError> {
    let search = engine.render_lookup_search(&LookupSearchContext {
        query: spec.query.clone(),
        collection: spec.ioc_type.collection_name(),
        field: spec.field.clone(),
        ioc_type: spec.ioc_type.to_string(),
        alerts_collection: ALERTS_COLLECTION.to_string(),
    })?;

    Ok(GeneratedJob {
        name: lookup_job_name(spec, ordinal, naming),
        search,
        earliest: Some(LOOKUP_EARLIEST.to_string()),
        latest: Some(LOOKUP_LATEST.to_string()),
        cron_schedule: lookup_cron(spec.ioc_type).to_string(),
        enabled: true,
    })
}

/// Build the jobs for a whole lookup sequence, in order.
///
/// With stable naming two identical specs would map to the same job, so
/// repeats are dropped (with a warning) and the first occurrence wins.
pub fn generate_lookup_jobs(
    engine: &TemplateEngine,
    specs: &[LookupSpec],
    naming: LookupNaming,
) -> Result<Vec<GeneratedJob>, TemplateError> {
    let mut jobs = Vec::with_capacity(specs.len());
    let mut seen = HashSet::new();

    for (ordinal, spec) in specs.iter().enumerate() {
        let job = generate_lookup_job(engine, spec, ordinal, naming)?;

        if !seen.insert(job.name.clone()) {
            warn!(
                ioc_type = %spec.ioc_type,
                field = %spec.field,
                "Skipping lookup {} which repeats an earlier one",
                ordinal
            );
            continue;
        }

        jobs.push(job);
    }

    Ok(jobs)
}

/// Parse a generated lookup search back into the lookup that produced it.
/// Returns `None` for searches that were not generated by this app.
pub fn parse_lookup_search(search: &str) -> Option<LookupSpec> {
    let captures = LOOKUP_SEARCH_RE.captures(search)?;

    let query = captures.get(1)?.as_str().trim();
    let ioc_type: IocType = captures.get(2)?.as_str().parse().ok()?;
    let field = captures.get(3)?.as_str();

    Some(LookupSpec::new(ioc_type, query, field))
}
