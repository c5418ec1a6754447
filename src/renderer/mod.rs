//! Renderer abstraction for browser-based page acquisition.
//!
//! Defines the `RenderFetch` trait that abstracts over the browser engine
//! (currently Chromium via chromiumoxide).

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;

/// A browser engine that can fetch the rendered forecast page.
///
/// One call is one isolated browser session: implementations tear the
/// session down on every exit path before returning.
#[async_trait]
pub trait RenderFetch: Send + Sync {
    /// Render the forecast page with `region` brought into view and return
    /// the resulting DOM as HTML.
    async fn fetch(&self, region: &str) -> Result<String>;
}

/// A no-op render fetch used when Chromium is unavailable.
///
/// The static acquisition path works without a browser. This stub makes
/// the rendered stage fail immediately, so every resolution goes straight
/// to the static path.
pub struct NoopRenderFetch;

#[async_trait]
impl RenderFetch for NoopRenderFetch {
    async fn fetch(&self, _region: &str) -> Result<String> {
        Err(anyhow::anyhow!("Browser not available -- static-only mode"))
    }
}
