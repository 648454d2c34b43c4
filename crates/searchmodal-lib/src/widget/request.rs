//! Query-string encoding of the requests the demo page's search form issues.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::filter::FilterCategory;
use crate::config::HarnessConfig;
use crate::errors::{HarnessError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Typeahead,
    Search,
    Append,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestKind::Typeahead => "typeahead",
            RequestKind::Search => "search",
            RequestKind::Append => "append",
        };
        f.write_str(s)
    }
}

/// A GET the widget would have sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedRequest {
    pub kind: RequestKind,
    pub url: String,
}

impl IssuedRequest {
    /// The part after `?`, or an empty string.
    pub fn query_string(&self) -> &str {
        self.url.split_once('?').map(|(_, q)| q).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEncoder {
    search: Url,
    typeahead: Url,
}

impl RequestEncoder {
    /// Join the endpoints onto `base_url`; fails when either is not a valid URL.
    pub fn new(base_url: &str, search_endpoint: &str, typeahead_endpoint: &str) -> Result<Self> {
        let base = base_url.trim_end_matches('/');
        Ok(Self {
            search: endpoint_url(base, search_endpoint)?,
            typeahead: endpoint_url(base, typeahead_endpoint)?,
        })
    }

    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        Self::new(
            &config.demo_base_url,
            &config.search_endpoint,
            &config.typeahead_endpoint,
        )
    }

    pub fn typeahead_url(&self, query: &str) -> String {
        let mut url = self.typeahead.clone();
        url.query_pairs_mut().append_pair("q", query);
        url.into()
    }

    /// Search form submission: field text, hidden value, filter and page window.
    pub fn search_url(
        &self,
        query: &str,
        value: &str,
        filter: FilterCategory,
        offset: usize,
        limit: usize,
    ) -> String {
        let mut url = self.search.clone();
        url.query_pairs_mut()
            .append_pair("search-modal", query)
            .append_pair("search-modal__value", value)
            .append_pair("search_filter", filter.as_str())
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        url.into()
    }
}

fn endpoint_url(base: &str, endpoint: &str) -> Result<Url> {
    let joined = format!("{base}{endpoint}");
    Url::parse(&joined).map_err(|e| HarnessError::InvalidUrl {
        url: joined,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> RequestEncoder {
        RequestEncoder::from_config(&HarnessConfig::default()).unwrap()
    }

    #[test]
    fn test_values_are_form_encoded() {
        let enc = encoder();
        assert!(enc
            .typeahead_url("Child Aggression Syndrome")
            .ends_with("?q=Child+Aggression+Syndrome"));
        assert!(enc.typeahead_url("a&b=c").ends_with("?q=a%26b%3Dc"));
        assert!(enc.typeahead_url("whānau").ends_with("?q=wh%C4%81nau"));
        assert!(enc.typeahead_url("").ends_with("?q="));
    }

    #[test]
    fn test_typeahead_url() {
        let enc = encoder();
        assert_eq!(
            enc.typeahead_url("Bullying"),
            "http://0.0.0.0:4567/ajaxed/test-typeahead-search.json?q=Bullying"
        );
    }

    #[test]
    fn test_search_url_param_order() {
        let enc = encoder();
        let url = enc.search_url(
            "UDL",
            "Universal Design for Learning",
            FilterCategory::All,
            0,
            16,
        );
        assert!(url.contains("search-modal=UDL&"));
        assert!(url.contains("search-modal__value=Universal+Design+for+Learning&"));
        assert!(url.contains("search_filter=all&"));
        assert!(url.ends_with("offset=0&limit=16"));
    }

    #[test]
    fn test_empty_value_is_still_sent() {
        let enc = RequestEncoder::new("http://localhost/", "/s.json", "/t.json").unwrap();
        let url = enc.search_url("", "", FilterCategory::All, 0, 16);
        assert_eq!(
            url,
            "http://localhost/s.json?search-modal=&search-modal__value=&search_filter=all&offset=0&limit=16"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = RequestEncoder::new("not a url", "/s.json", "/t.json").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidUrl { .. }));
    }

    #[test]
    fn test_query_string() {
        let req = IssuedRequest {
            kind: RequestKind::Typeahead,
            url: "http://x/t.json?q=Lea".into(),
        };
        assert_eq!(req.query_string(), "q=Lea");
    }
}
