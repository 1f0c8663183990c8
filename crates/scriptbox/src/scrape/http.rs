//! Plain HTTP page source wrapping reqwest.
//!
//! Not a browser: scripts on the page never run, so counters that are filled
//! in client-side come back empty. Only used when asked for by name.

use std::time::Duration;

use async_trait::async_trait;

use super::PageSource;
use crate::types::{ScriptError, ScriptResult};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Fetches pages with a single GET request.
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> ScriptResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn load(&self, url: &str, settle: Duration) -> ScriptResult<String> {
        if !settle.is_zero() {
            tracing::debug!(
                "HTTP source cannot run scripts, ignoring {}ms settle time",
                settle.as_millis()
            );
        }

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScriptError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        tracing::debug!("GET {url} -> {status}");
        resp.text().await.map_err(|e| self.classify(e))
    }
}

impl HttpSource {
    fn classify(&self, e: reqwest::Error) -> ScriptError {
        if e.is_timeout() {
            ScriptError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ScriptError::Http(e)
        }
    }
}
