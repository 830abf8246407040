//! Strategy selection for intercepted requests.
//!
//! Classification is a pure function of request method and URL: non-GET
//! requests bypass the worker entirely; API-like URLs go network-first,
//! everything else cache-first. The two substring markers are disjoint in
//! practice, so match order does not matter.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use money_net::FetchResponse;
use url::Url;

/// URL substring selecting the network-first strategy for API calls.
pub const API_MARKER: &str = "/api/";

/// URL substring selecting the network-first strategy for the auth domain.
pub const AUTH_DOMAIN_MARKER: &str = "firebaseapp.com";

/// Body of the synthetic offline response.
pub const OFFLINE_BODY: &str = "Offline - resource not available";

/// Which source to consult first for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyDecision {
    /// Try network, fall back to cache, then to the offline response.
    NetworkFirst,
    /// Try cache, fall back to network, then to the offline response.
    CacheFirst,
    /// Leave the request untouched.
    Bypass,
}

/// Classify a request into a strategy.
pub fn classify(method: &Method, url: &Url) -> StrategyDecision {
    if *method != Method::GET {
        return StrategyDecision::Bypass;
    }

    let url_str = url.as_str();
    if url_str.contains(API_MARKER) || url_str.contains(AUTH_DOMAIN_MARKER) {
        StrategyDecision::NetworkFirst
    } else {
        StrategyDecision::CacheFirst
    }
}

/// The synthetic response returned when neither network nor cache can
/// satisfy a request: 503 Service Unavailable, plain text.
pub fn fallback_response() -> FetchResponse {
    let mut headers = HeaderMap::new();
    headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

    FetchResponse {
        status: StatusCode::SERVICE_UNAVAILABLE,
        status_text: "Service Unavailable".to_string(),
        headers,
        body: Bytes::from_static(OFFLINE_BODY.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_non_get_bypasses() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            assert_eq!(
                classify(&method, &url("https://app.example/api/transactions")),
                StrategyDecision::Bypass
            );
        }
    }

    #[test]
    fn test_api_urls_are_network_first() {
        assert_eq!(
            classify(&Method::GET, &url("https://app.example/api/transactions")),
            StrategyDecision::NetworkFirst
        );
        assert_eq!(
            classify(&Method::GET, &url("https://money-b72e6.firebaseapp.com/token")),
            StrategyDecision::NetworkFirst
        );
    }

    #[test]
    fn test_everything_else_is_cache_first() {
        assert_eq!(
            classify(&Method::GET, &url("https://app.example/")),
            StrategyDecision::CacheFirst
        );
        assert_eq!(
            classify(&Method::GET, &url("https://app.example/src/style.css")),
            StrategyDecision::CacheFirst
        );
    }

    #[test]
    fn test_fallback_response_contract() {
        let response = fallback_response();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.status_text, "Service Unavailable");
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.body, Bytes::from(OFFLINE_BODY));
    }
}
