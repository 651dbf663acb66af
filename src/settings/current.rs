use super::types::{FeedSettings, LookupSpec, SetupSettings};
use crate::jobs::{is_cleanup_job_name, parse_lookup_search, LookupNaming};
use crate::service::{ConfigService, Namespace, SavedSearch, ServiceError};
use crate::utils::{INPUTS_CONF, INPUT_STANZA};
use tracing::{debug, warn};

/// Read the settings currently applied on the platform, so the setup form
/// can be pre-filled.
///
/// Lookups are recovered by parsing the generated saved searches back;
/// searches that do not parse are skipped. With ordinal naming, lookups come
/// back in the order of the position suffix of their job name; stable names
/// carry no position, so those come back in name order.
pub async fn load_current_settings(
    service: &dyn ConfigService,
    namespace: &Namespace,
    naming: LookupNaming,
) -> Result<SetupSettings, ServiceError> {
    let inputs = service.get_configuration(INPUTS_CONF).await?;
    let feed = inputs
        .get(INPUT_STANZA)
        .map(FeedSettings::from_properties)
        .unwrap_or_default();

    let mut searches = service.list_saved_searches(&namespace.app).await?;
    match naming {
        LookupNaming::Ordinal => searches.sort_by_key(|s| (position_suffix(&s.name), s.name.clone())),
        LookupNaming::Stable => searches.sort_by(|a, b| a.name.cmp(&b.name)),
    }

    let lookups = searches.iter().filter_map(lookup_from_search).collect();

    Ok(SetupSettings { feed, lookups })
}

/// Trailing number of an ordinal job name; other names sort last
fn position_suffix(name: &str) -> usize {
    name.rsplit(' ')
        .next()
        .and_then(|suffix| suffix.parse().ok())
        .unwrap_or(usize::MAX)
}

fn lookup_from_search(search: &SavedSearch) -> Option<LookupSpec> {
    if is_cleanup_job_name(&search.name) {
        return None;
    }

    let parsed = search.search().and_then(parse_lookup_search);
    match &parsed {
        Some(spec) => debug!(name = %search.name, ioc_type = %spec.ioc_type, "Recovered lookup"),
        None => warn!(name = %search.name, "Saved search is not a recognised lookup, skipping"),
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{generate_cleanup_jobs, generate_lookup_jobs, lookup_key};
    use crate::service::{MemoryConfigService, Properties};
    use crate::settings::IocType;
    use crate::template::TemplateEngine;

    #[tokio::test]
    async fn test_empty_service_yields_default_settings() {
        let service = MemoryConfigService::new();
        let settings = load_current_settings(&service, &Namespace::default(), LookupNaming::Ordinal)
            .await
            .unwrap();
        assert_eq!(settings, SetupSettings::default());
    }

    #[tokio::test]
    async fn test_recovers_feed_and_lookups() {
        let service = MemoryConfigService::new();
        let namespace = Namespace::default();
        let engine = TemplateEngine::new();

        let feed = FeedSettings::new("key", "feed");
        service
            .update_configuration(INPUTS_CONF, INPUT_STANZA, &feed.to_properties())
            .await
            .unwrap();

        let lookups = vec![
            LookupSpec::new(IocType::Sha1, "index=edr", "sha1"),
            LookupSpec::new(IocType::Url, "index=proxy", "url"),
        ];
        let jobs = generate_lookup_jobs(&engine, &lookups, LookupNaming::Ordinal).unwrap();
        for job in jobs.iter().chain(generate_cleanup_jobs(&engine).unwrap().iter()) {
            service.create_saved_search(&namespace, &job.to_spec()).await.unwrap();
        }

        // A hand-made search in the same app is skipped
        let foreign = crate::service::SavedSearchSpec {
            name: "My report".to_string(),
            properties: Properties::from([("search".to_string(), "index=* | stats count".to_string())]),
        };
        service.create_saved_search(&namespace, &foreign).await.unwrap();

        let settings = load_current_settings(&service, &namespace, LookupNaming::Ordinal)
            .await
            .unwrap();
        assert_eq!(settings.feed, feed);
        assert_eq!(settings.lookups, lookups);
    }

    #[test]
    fn test_position_suffix_orders_numerically() {
        assert_eq!(position_suffix("SEKOIA.IO md5 lookup 2"), 2);
        assert!(position_suffix("SEKOIA.IO md5 lookup 10") > position_suffix("SEKOIA.IO md5 lookup 2"));
        assert_eq!(position_suffix("SEKOIA.IO md5 lookup 1a2b3c4d5e6f"), usize::MAX);
    }

    #[tokio::test]
    async fn test_stable_names_are_not_read_as_positions() {
        let service = MemoryConfigService::new();
        let namespace = Namespace::default();
        let engine = TemplateEngine::new();

        // An all-digit key that would parse as a position, and a key that
        // sorts before it by name
        let numeric = (0..10_000)
            .map(|i| LookupSpec::new(IocType::Md5, format!("index=edr id={}", i), "hash"))
            .find(|spec| {
                let key = lookup_key(spec);
                !key.starts_with('0') && key.chars().all(|c| c.is_ascii_digit())
            })
            .expect("some key within range is all digits");
        let hex = (0..10_000)
            .map(|i| LookupSpec::new(IocType::Md5, format!("index=av id={}", i), "hash"))
            .find(|spec| {
                let key = lookup_key(spec);
                key.starts_with('0') && key.chars().any(|c| c.is_ascii_alphabetic())
            })
            .expect("some key within range starts with 0 and has a letter");

        let lookups = vec![numeric.clone(), hex.clone()];
        let jobs = generate_lookup_jobs(&engine, &lookups, LookupNaming::Stable).unwrap();
        for job in &jobs {
            service.create_saved_search(&namespace, &job.to_spec()).await.unwrap();
        }

        let settings = load_current_settings(&service, &namespace, LookupNaming::Stable)
            .await
            .unwrap();
        assert_eq!(settings.lookups, vec![hex, numeric]);
    }
}
