use crate::service::{Properties, SavedSearchSpec};
use serde::{Deserialize, Serialize};

/// A saved search derived from the settings, never authored by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedJob {
    /// Identity key for replace semantics
    pub name: String,
    pub search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    pub cron_schedule: String,
    pub enabled: bool,
}

impl GeneratedJob {
    /// Saved search properties as the platform's REST API names them
    pub fn to_properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties.insert("search".to_string(), self.search.clone());
        properties.insert("cron_schedule".to_string(), self.cron_schedule.clone());
        properties.insert("is_scheduled".to_string(), flag(self.enabled));
        properties.insert("disabled".to_string(), flag(!self.enabled));

        if let Some(earliest) = &self.earliest {
            properties.insert("dispatch.earliest_time".to_string(), earliest.clone());
        }
        if let Some(latest) = &self.latest {
            properties.insert("dispatch.latest_time".to_string(), latest.clone());
        }

        properties
    }

    pub fn to_spec(&self) -> SavedSearchSpec {
        SavedSearchSpec {
            name: self.name.clone(),
            properties: self.to_properties(),
        }
    }
}

fn flag(value: bool) -> String {
    let flag = if value { "1" } else { "0" };
    flag.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_properties_with_window() {
        let job = GeneratedJob {
            name: "job".to_string(),
            search: "index=*".to_string(),
            earliest: Some("-65m@m".to_string()),
            latest: Some("-5m@m".to_string()),
            cron_schedule: "10 * * * *".to_string(),
            enabled: true,
        };

        let properties = job.to_properties();
        assert_eq!(properties["search"], "index=*");
        assert_eq!(properties["dispatch.earliest_time"], "-65m@m");
        assert_eq!(properties["dispatch.latest_time"], "-5m@m");
        assert_eq!(properties["cron_schedule"], "10 * * * *");
        assert_eq!(properties["is_scheduled"], "1");
        assert_eq!(properties["disabled"], "0");
    }

    #[test]
    fn test_to_properties_without_window() {
        let job = GeneratedJob {
            name: "job".to_string(),
            search: "| inputlookup x".to_string(),
            earliest: None,
            latest: None,
            cron_schedule: "0 2 * * *".to_string(),
            enabled: false,
        };

        let spec = job.to_spec();
        assert_eq!(spec.name, "job");
        assert!(!spec.properties.contains_key("dispatch.earliest_time"));
        assert_eq!(spec.properties["is_scheduled"], "0");
        assert_eq!(spec.properties["disabled"], "1");
    }
}
