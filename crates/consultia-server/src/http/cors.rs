//! Origin allow-list for browser requests.

use axum::http::{header, request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Allowed browser origins.
///
/// Entries are exact origins (`https://app.example.com`) or wildcard
/// suffixes (`*.vercel.app`), which match any subdomain over any scheme.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    exact: Vec<String>,
    suffixes: Vec<String>,
}

impl OriginPolicy {
    pub fn from_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self::default();
        for origin in origins {
            let origin = origin.as_ref().trim().trim_end_matches('/');
            if origin.is_empty() {
                continue;
            }
            match origin.strip_prefix('*') {
                Some(suffix) if suffix.starts_with('.') => {
                    policy.suffixes.push(suffix.to_ascii_lowercase())
                }
                _ => policy.exact.push(origin.to_ascii_lowercase()),
            }
        }
        policy
    }

    /// Returns true if `origin` (as sent in the `Origin` header) is allowed.
    pub fn allows(&self, origin: &str) -> bool {
        let origin = origin.to_ascii_lowercase();
        if self.exact.iter().any(|o| *o == origin) {
            return true;
        }
        let host = origin.split_once("://").map_or(origin.as_str(), |(_, h)| h);
        self.suffixes
            .iter()
            .any(|suffix| host.len() > suffix.len() && host.ends_with(suffix.as_str()))
    }

    /// CORS layer enforcing this policy, with credentials allowed.
    pub fn layer(&self) -> CorsLayer {
        let policy = self.clone();
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| {
                    origin.to_str().map(|o| policy.allows(o)).unwrap_or(false)
                },
            ))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    }
}
