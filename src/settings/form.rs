use super::types::{FeedSettings, IocType, LookupSpec, SetupSettings};
use crate::utils::DEFAULT_FEED_ID;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Names of the two leading form fields
const HEADER_FIELDS: [&str; 2] = ["api_key", "feed_id"];

/// Names of the fields repeated once per lookup
const LOOKUP_FIELDS: [&str; 3] = ["type", "search", "field"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Form is missing the api_key and feed_id fields")]
    MissingHeader,

    #[error("API key is required")]
    MissingApiKey,

    #[error("Incomplete lookup definition: {0} trailing field(s) after the last complete lookup")]
    IncompleteLookup(usize),

    #[error("Unexpected form field at position {index}: expected '{expected}', found '{found}'")]
    UnexpectedField {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Unknown IOC type in lookup {0}: {1}")]
    UnknownIocType(usize, String),

    #[error("Lookup {0} ({1}) has an empty '{2}' field")]
    EmptyLookupField(usize, IocType, &'static str),

    #[error("Invalid form JSON: {0}")]
    InvalidJson(String),
}

/// A single `{name, value}` pair of a serialized HTML form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parse the JSON array produced by serializing the setup form
pub fn parse_form_json(json: &str) -> Result<SetupSettings, FormError> {
    let fields: Vec<FormField> =
        serde_json::from_str(json).map_err(|e| FormError::InvalidJson(e.to_string()))?;
    parse_form(&fields)
}

/// Rebuild the setup settings from a serialized form.
///
/// Layout: `api_key`, `feed_id`, then one `type`, `search`, `field` triple
/// per lookup, in the order they appear on the page. Values are trimmed.
pub fn parse_form(fields: &[FormField]) -> Result<SetupSettings, FormError> {
    if fields.len() < HEADER_FIELDS.len() {
        return Err(FormError::MissingHeader);
    }

    let (header, rest) = fields.split_at(HEADER_FIELDS.len());
    for (index, (field, expected)) in header.iter().zip(HEADER_FIELDS).enumerate() {
        expect_name(index, field, expected)?;
    }

    let api_key = header[0].value.trim().to_string();
    let feed_id = header[1].value.trim().to_string();

    if api_key.is_empty() {
        return Err(FormError::MissingApiKey);
    }
    check_feed_id(&feed_id);

    let trailing = rest.len() % LOOKUP_FIELDS.len();
    if trailing != 0 {
        return Err(FormError::IncompleteLookup(trailing));
    }

    let mut lookups = Vec::with_capacity(rest.len() / LOOKUP_FIELDS.len());

    for (ordinal, group) in rest.chunks(LOOKUP_FIELDS.len()).enumerate() {
        let offset = HEADER_FIELDS.len() + ordinal * LOOKUP_FIELDS.len();
        for (i, (field, expected)) in group.iter().zip(LOOKUP_FIELDS).enumerate() {
            expect_name(offset + i, field, expected)?;
        }

        let raw_type = group[0].value.trim();
        let ioc_type: IocType = raw_type
            .parse()
            .map_err(|_| FormError::UnknownIocType(ordinal, raw_type.to_string()))?;

        let query = group[1].value.trim();
        if query.is_empty() {
            return Err(FormError::EmptyLookupField(ordinal, ioc_type, "search"));
        }

        let field = group[2].value.trim();
        if field.is_empty() {
            return Err(FormError::EmptyLookupField(ordinal, ioc_type, "field"));
        }

        lookups.push(LookupSpec::new(ioc_type, query, field));
    }

    Ok(SetupSettings {
        feed: FeedSettings::new(api_key, feed_id),
        lookups,
    })
}

/// Serialize settings back into the form layout `parse_form` expects
pub fn to_form_fields(settings: &SetupSettings) -> Vec<FormField> {
    let mut fields = vec![
        FormField::new("api_key", settings.feed.api_key.clone()),
        FormField::new("feed_id", settings.feed.feed_id.clone()),
    ];

    for lookup in &settings.lookups {
        fields.push(FormField::new("type", lookup.ioc_type.as_str()));
        fields.push(FormField::new("search", lookup.query.clone()));
        fields.push(FormField::new("field", lookup.field.clone()));
    }

    fields
}

fn expect_name(index: usize, field: &FormField, expected: &'static str) -> Result<(), FormError> {
    if field.name != expected {
        return Err(FormError::UnexpectedField {
            index,
            expected,
            found: field.name.clone(),
        });
    }
    Ok(())
}

/// Feed IDs are UUIDs. This is lenient: it logs a warning but accepts
/// anything, since the feed service is the authority.
fn check_feed_id(feed_id: &str) -> bool {
    if feed_id.is_empty() {
        return true;
    }

    let is_valid = Uuid::parse_str(feed_id).is_ok();
    if !is_valid {
        warn!(
            feed_id = %feed_id,
            default_feed = DEFAULT_FEED_ID,
            "Feed ID '{}' does not look like a UUID. Accepting anyway.",
            feed_id
        );
    }
    is_valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(api_key: &str, feed_id: &str) -> Vec<FormField> {
        vec![
            FormField::new("api_key", api_key),
            FormField::new("feed_id", feed_id),
        ]
    }

    fn lookup(fields: &mut Vec<FormField>, ioc_type: &str, search: &str, field: &str) {
        fields.push(FormField::new("type", ioc_type));
        fields.push(FormField::new("search", search));
        fields.push(FormField::new("field", field));
    }

    #[test]
    fn test_parse_header_only() {
        let settings = parse_form(&header(" key ", "  ")).unwrap();
        assert_eq!(settings.feed.api_key, "key");
        assert_eq!(settings.feed.feed_id, "");
        assert!(settings.lookups.is_empty());
    }

    #[test]
    fn test_parse_lookups_in_order_and_trimmed() {
        let mut fields = header("key", DEFAULT_FEED_ID);
        lookup(&mut fields, "md5", " index=* ", " hash ");
        lookup(&mut fields, "ipv4", "index=fw", "src_ip");

        let settings = parse_form(&fields).unwrap();
        assert_eq!(
            settings.lookups,
            vec![
                LookupSpec::new(IocType::Md5, "index=*", "hash"),
                LookupSpec::new(IocType::Ipv4, "index=fw", "src_ip"),
            ]
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(parse_form(&[]), Err(FormError::MissingHeader));
        assert_eq!(
            parse_form(&[FormField::new("api_key", "key")]),
            Err(FormError::MissingHeader)
        );
    }

    #[test]
    fn test_missing_api_key() {
        assert_eq!(parse_form(&header("   ", "")), Err(FormError::MissingApiKey));
    }

    #[test]
    fn test_incomplete_lookup_is_rejected() {
        let mut fields = header("key", "");
        lookup(&mut fields, "md5", "index=*", "hash");
        fields.push(FormField::new("type", "sha1"));
        fields.push(FormField::new("search", "index=*"));

        assert_eq!(parse_form(&fields), Err(FormError::IncompleteLookup(2)));
    }

    #[test]
    fn test_unexpected_field_name() {
        let mut fields = header("key", "");
        fields.push(FormField::new("type", "md5"));
        fields.push(FormField::new("field", "hash"));
        fields.push(FormField::new("search", "index=*"));

        assert_eq!(
            parse_form(&fields),
            Err(FormError::UnexpectedField {
                index: 3,
                expected: "search",
                found: "field".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_ioc_type() {
        let mut fields = header("key", "");
        lookup(&mut fields, "ipv6", "index=*", "ip");

        assert_eq!(
            parse_form(&fields),
            Err(FormError::UnknownIocType(0, "ipv6".to_string()))
        );
    }

    #[test]
    fn test_empty_lookup_field() {
        let mut fields = header("key", "");
        lookup(&mut fields, "url", "index=proxy", "  ");

        assert_eq!(
            parse_form(&fields),
            Err(FormError::EmptyLookupField(0, IocType::Url, "field"))
        );
    }

    #[test]
    fn test_parse_form_json() {
        let json = r#"[
            {"name": "api_key", "value": "key"},
            {"name": "feed_id", "value": ""},
            {"name": "type", "value": "domain"},
            {"name": "search", "value": "index=dns"},
            {"name": "field", "value": "query"}
        ]"#;

        let settings = parse_form_json(json).unwrap();
        assert_eq!(
            settings.lookups,
            vec![LookupSpec::new(IocType::Domain, "index=dns", "query")]
        );
    }

    #[test]
    fn test_parse_form_json_invalid() {
        assert!(matches!(
            parse_form_json("{not json"),
            Err(FormError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_to_form_fields_is_parseable() {
        let settings = SetupSettings {
            feed: FeedSettings::new("key", "feed"),
            lookups: vec![LookupSpec::new(IocType::Sha1, "index=edr", "sha1")],
        };
        assert_eq!(parse_form(&to_form_fields(&settings)).unwrap(), settings);
    }

    #[test]
    fn test_check_feed_id() {
        assert!(check_feed_id(""));
        assert!(check_feed_id(DEFAULT_FEED_ID));
        assert!(!check_feed_id("my-feed"));
    }
}
