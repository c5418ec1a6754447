//! Chromium-based render fetch using chromiumoxide.
//!
//! Every call launches a fresh headless instance with a throwaway profile,
//! runs one navigate-click-capture pass, and tears the browser down before
//! returning. Nothing is shared between calls.

use super::RenderFetch;
use crate::config::ScrapeConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. RAINWATCH_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("RAINWATCH_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.rainwatch/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".rainwatch/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".rainwatch/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".rainwatch/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".rainwatch/chromium/chrome-linux64/chrome"),
                home.join(".rainwatch/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-backed implementation of `RenderFetch`.
pub struct ChromiumFetcher {
    config: ScrapeConfig,
    chrome_path: PathBuf,
}

impl ChromiumFetcher {
    /// Create a fetcher bound to a discovered Chromium binary. Fails when
    /// no binary can be located; callers fall back to `NoopRenderFetch`.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let chrome_path = find_chromium().context("Chromium not found")?;
        Ok(Self {
            config,
            chrome_path,
        })
    }

    /// One navigate-click-capture pass against an already-launched browser.
    async fn render_page(&self, browser: &Browser, region: &str) -> Result<String> {
        let page = browser
            .new_page(self.config.source_url.as_str())
            .await
            .context("failed to open forecast page")?;

        // Let scripts populate the county panels before interacting.
        tokio::time::sleep(self.config.render_settle).await;

        if self.click_region(&page, region).await {
            tokio::time::sleep(self.config.post_click_wait).await;
        }

        let result = page
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to capture rendered DOM")?;

        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert DOM capture: {e:?}"))
    }

    /// Best-effort JS click on the first element whose text mentions
    /// `region`. Returns whether a click landed; a missing element and a
    /// script failure are both non-fatal.
    async fn click_region(&self, page: &Page, region: &str) -> bool {
        let script = format!(
            r#"(function() {{
    var hit = document.evaluate(
        "//*[contains(text(), '{region}')]",
        document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null
    ).singleNodeValue;
    if (!hit) {{ return false; }}
    hit.click();
    return true;
}})()"#
        );

        match page.evaluate(script).await {
            Ok(value) => value.into_value::<bool>().unwrap_or(false),
            Err(e) => {
                tracing::debug!("region click skipped: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl RenderFetch for ChromiumFetcher {
    async fn fetch(&self, region: &str) -> Result<String> {
        let browser_config = BrowserConfig::builder()
            .chrome_executable(self.chrome_path.clone())
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--window-size=1920,1080")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        // Teardown runs on every exit path: capture the render outcome
        // first, return it after the browser is gone.
        let outcome = self.render_page(&browser, region).await;

        let _ = browser.close().await;
        let _ = browser.wait().await;
        handler_task.abort();

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_chromium_does_not_panic() {
        let _ = find_chromium();
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_rendered_fetch_captures_dom() {
        let config = ScrapeConfig {
            source_url: "data:text/html,<div>臺北市 降雨機率：75%</div>".to_string(),
            ..ScrapeConfig::default()
        };

        let fetcher = ChromiumFetcher::new(config).expect("failed to create fetcher");
        let html = fetcher.fetch("臺北市").await.expect("render failed");
        assert!(html.contains("臺北市"));
    }
}
