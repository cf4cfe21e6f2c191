//! HTTP transport. The client only needs "GET this path with these query
//! pairs and give me JSON", so that is all the trait asks for.

use std::fmt;

use serde_json::Value;
use sitemapper_core::settings::CmsSettings;

use crate::error::FetchError;

/// Query parameters in request order.
pub type Query = Vec<(String, String)>;

/// Blocking JSON GET against the CMS.
pub trait Transport {
    /// `path` is relative to the API base, e.g. `/api/news-articles`.
    fn get_json(&self, path: &str, query: &Query) -> Result<Value, FetchError>;
}

/// `ureq`-backed transport with bearer authentication.
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(settings: &CmsSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(settings.timeout)
            .user_agent(concat!("sitemapper/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.api_token.clone(),
        }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, path: &str, query: &Query) -> Result<Value, FetchError> {
        let url = format!("{}{path}", self.base_url);
        let request = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
            .query_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        match request.call() {
            Ok(response) => response
                .into_json::<Value>()
                .map_err(|source| FetchError::Body { url, source }),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(FetchError::Status {
                    url,
                    status,
                    body: truncate(&body, 300),
                })
            }
            Err(ureq::Error::Transport(transport)) => Err(FetchError::Transport {
                url,
                message: transport.to_string(),
            }),
        }
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get_json(&self, path: &str, query: &Query) -> Result<Value, FetchError> {
        (**self).get_json(path, query)
    }
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("ééééé", 2), "éé…");
    }

    #[test]
    fn debug_hides_token() {
        let transport = HttpTransport::new(&CmsSettings {
            api_url: "https://cms.example.com/".into(),
            api_token: "secret-token".into(),
            page_size: 10,
            timeout: std::time::Duration::from_secs(1),
        });
        let debug = format!("{transport:?}");
        assert!(debug.contains("https://cms.example.com"));
        assert!(!debug.contains("secret-token"));
    }
}
