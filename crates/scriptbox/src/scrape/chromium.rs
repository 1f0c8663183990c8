//! Headless Chromium page source using chromiumoxide.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;

use super::PageSource;
use crate::types::{ScriptError, ScriptResult};

/// Environment variable naming an explicit Chromium binary.
pub const ENV_CHROMIUM_PATH: &str = "SCRIPTBOX_CHROMIUM_PATH";

const CANDIDATES: [&str; 4] = ["google-chrome", "chromium", "chromium-browser", "chrome"];

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(ENV_CHROMIUM_PATH) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!("{ENV_CHROMIUM_PATH}={p} does not exist, searching PATH");
    }

    CANDIDATES.iter().find_map(|name| which::which(name).ok())
}

/// Renders pages in a fresh headless Chromium per load.
#[derive(Debug, Clone)]
pub struct ChromiumSource {
    executable: PathBuf,
    timeout: Duration,
}

impl ChromiumSource {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    /// A source backed by the first Chromium found, if any.
    pub fn detect(timeout: Duration) -> Option<Self> {
        find_chromium().map(|path| Self::new(path, timeout))
    }

    async fn launch(&self) -> ScriptResult<(Browser, tokio::task::JoinHandle<()>)> {
        let config = BrowserConfig::builder()
            .chrome_executable(&self.executable)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| ScriptError::Render(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScriptError::Render(format!("failed to launch Chromium: {e}")))?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok((browser, handle))
    }

    async fn render(browser: &Browser, url: &str, settle: Duration) -> ScriptResult<String> {
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| ScriptError::Render(format!("navigation failed: {e}")))?;

        let html = Self::settled_html(&page, settle).await;
        let _ = page.close().await;
        html
    }

    async fn settled_html(page: &Page, settle: Duration) -> ScriptResult<String> {
        page.wait_for_navigation()
            .await
            .map_err(|e| ScriptError::Render(format!("page did not finish loading: {e}")))?;

        tracing::debug!("waiting {}ms for scripts to settle", settle.as_millis());
        tokio::time::sleep(settle).await;

        page.evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| ScriptError::Render(format!("failed to read HTML: {e}")))?
            .into_value::<String>()
            .map_err(|e| ScriptError::Render(format!("failed to convert HTML result: {e:?}")))
    }
}

#[async_trait]
impl PageSource for ChromiumSource {
    async fn load(&self, url: &str, settle: Duration) -> ScriptResult<String> {
        tracing::debug!("rendering {url} with {}", self.executable.display());

        let (mut browser, handle) = self.launch().await?;

        let timeout_ms = self.timeout.as_millis() as u64;
        let result = match tokio::time::timeout(self.timeout, Self::render(&browser, url, settle)).await {
            Ok(result) => result,
            Err(_) => Err(ScriptError::Timeout(timeout_ms)),
        };

        if let Err(e) = browser.close().await {
            tracing::debug!("closing Chromium: {e}");
        }
        let _ = browser.wait().await;
        handle.abort();

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_renders_scripted_counter() {
        let source = ChromiumSource::detect(Duration::from_secs(30)).expect("Chromium not found");
        let html = source
            .load(
                "data:text/html,<div class='maincounter-number'><span id='n'></span></div>\
                 <script>document.getElementById('n').textContent='42'</script>",
                Duration::from_millis(200),
            )
            .await
            .expect("render failed");

        let record = crate::scrape::extract(&html).unwrap();
        assert_eq!(record.population.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_render_error() {
        let source = ChromiumSource::new("/nonexistent/scriptbox-chrome", Duration::from_secs(5));
        let err = source
            .load("about:blank", Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::Render(_)));
    }
}
