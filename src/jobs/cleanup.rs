use super::schedule::cleanup_cron;
use super::types::GeneratedJob;
use crate::settings::IocType;
use crate::template::{CleanupSearchContext, TemplateEngine, TemplateError};
use crate::utils::JOB_PREFIX;

pub fn cleanup_job_name(ioc_type: IocType) -> String {
    format!("{} IOC Cleanup - {}", JOB_PREFIX, ioc_type)
}

/// Whether `name` is one of the fixed cleanup job names
pub fn is_cleanup_job_name(name: &str) -> bool {
    IocType::ALL.iter().any(|t| cleanup_job_name(*t) == name)
}

/// Build the daily job that purges expired indicators of one type
pub fn generate_cleanup_job(
    engine: &TemplateEngine,
    ioc_type: IocType,
) -> Result<GeneratedJob, TemplateError> {
    let search = engine.render_cleanup_search(&CleanupSearchContext {
        collection: ioc_type.collection_name(),
    })?;

    Ok(GeneratedJob {
        name: cleanup_job_name(ioc_type),
        search,
        earliest: None,
        latest: None,
        cron_schedule: cleanup_cron(ioc_type).to_string(),
        enabled: true,
    })
}

/// One cleanup job per IOC type, independent of the configured lookups
pub fn generate_cleanup_jobs(engine: &TemplateEngine) -> Result<Vec<GeneratedJob>, TemplateError> {
    IocType::ALL
        .iter()
        .map(|t| generate_cleanup_job(engine, *t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_cleanup_job() {
        let job = generate_cleanup_job(&TemplateEngine::new(), IocType::Sha256).unwrap();
        assert_eq!(job.name, "SEKOIA.IO IOC Cleanup - sha256");
        assert_eq!(job.cron_schedule, "5 2 * * *");
        assert!(job.earliest.is_none());
        assert!(job.latest.is_none());
        assert!(job.search.starts_with("| inputlookup sekoia_iocs_sha256 "));
        assert!(job.search.ends_with("| outputlookup sekoia_iocs_sha256"));
    }

    #[test]
    fn test_one_cleanup_job_per_type() {
        let jobs = generate_cleanup_jobs(&TemplateEngine::new()).unwrap();
        assert_eq!(jobs.len(), 6);
        for job in &jobs {
            assert!(is_cleanup_job_name(&job.name));
        }
    }

    #[test]
    fn test_is_cleanup_job_name() {
        assert!(is_cleanup_job_name("SEKOIA.IO IOC Cleanup - md5"));
        assert!(!is_cleanup_job_name("SEKOIA.IO IOC Cleanup - ipv6"));
        assert!(!is_cleanup_job_name("SEKOIA.IO md5 lookup 0"));
    }
}
