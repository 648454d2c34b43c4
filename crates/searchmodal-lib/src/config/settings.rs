use serde::{Deserialize, Serialize};

use crate::widget::filter::ByCategory;

/// Persisted harness settings (`config.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HarnessConfig {
    /// Tenon analysis endpoint.
    pub tenon_api_url: String,
    /// Whole-request timeout in seconds.
    pub timeout: u32,
    pub connect_timeout: u32,
    pub idle_conn_timeout: u32,
    pub max_idle_conns_per_host: u32,
    /// Reported `status` values above this are treated as a failed analysis.
    pub failure_status_threshold: u16,
    pub demo_base_url: String,
    pub search_endpoint: String,
    pub typeahead_endpoint: String,
    pub typeahead_min_chars: usize,
    pub typeahead_limit: usize,
    pub initial_page_size: ByCategory<usize>,
    pub page_size: usize,
    pub history_limit: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let mut initial_page_size = ByCategory::uniform(16);
        initial_page_size.resources = 2;

        Self {
            tenon_api_url: "https://tenon.io/api/".into(),
            timeout: 60,
            connect_timeout: 10,
            idle_conn_timeout: 90,
            max_idle_conns_per_host: 4,
            failure_status_threshold: 400,
            demo_base_url: "http://0.0.0.0:4567".into(),
            search_endpoint: "/ajaxed/search-results.json".into(),
            typeahead_endpoint: "/ajaxed/test-typeahead-search.json".into(),
            typeahead_min_chars: 3,
            typeahead_limit: 10,
            initial_page_size,
            page_size: 20,
            history_limit: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = HarnessConfig::default();
        assert_eq!(config.tenon_api_url, "https://tenon.io/api/");
        assert_eq!(config.failure_status_threshold, 400);
        assert_eq!(config.typeahead_min_chars, 3);
        assert_eq!(config.typeahead_limit, 10);
        assert_eq!(config.initial_page_size.all, 16);
        assert_eq!(config.initial_page_size.resources, 2);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(HarnessConfig::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("tenonApiUrl"));
        assert!(obj.contains_key("failureStatusThreshold"));
        assert!(obj.contains_key("initialPageSize"));
        assert!(!obj.contains_key("tenon_api_url"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let cfg: HarnessConfig = serde_json::from_str(r#"{"pageSize": 5}"#).unwrap();
        assert_eq!(cfg.page_size, 5);
        assert_eq!(cfg.typeahead_limit, 10);
    }
}
