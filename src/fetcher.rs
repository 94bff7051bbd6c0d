use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::redirect;

use crate::error::{Result, ScrapeError};

/// Fetches a page body. Implementations must be shareable across worker threads.
pub trait Fetch: Sync {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > 10 {
                attempt.error("Too many redirects (>10)")
            } else {
                attempt.follow()
            }
        });

        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| ScrapeError::Client(format!("invalid user agent {user_agent:?}: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .redirect(redirect_policy)
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let transport = |source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        resp.text().map_err(transport)
    }
}
