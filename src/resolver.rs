//! Resolution pipeline: rendered fetch first, static fetch second.
//!
//! Each resolution walks an explicit stage sequence and ends in a
//! well-formed report. Fetch and extraction failures are logged per stage
//! and fold into "try the next stage"; they never propagate out.

use crate::acquisition::extractor;
use crate::acquisition::static_fetch::StaticFetcher;
use crate::config::ScrapeConfig;
use crate::renderer::RenderFetch;
use crate::report::RainReport;
use std::sync::Arc;

/// Stages of one resolution, tried in order. The rendered stage fully
/// completes (browser teardown included) before the static stage starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    TryRendered,
    TryStatic,
    Done,
}

/// Resolves a region name to a rain report.
///
/// Stateless between calls: no caching, no retries, no shared mutable
/// state. Concurrent resolutions only share the HTTP client and the
/// renderer handle.
pub struct RainResolver {
    renderer: Arc<dyn RenderFetch>,
    fetcher: StaticFetcher,
}

impl RainResolver {
    pub fn new(renderer: Arc<dyn RenderFetch>, config: &ScrapeConfig) -> Self {
        Self {
            renderer,
            fetcher: StaticFetcher::new(config),
        }
    }

    /// Resolve `region` to a report. Never fails: exhausted stages produce
    /// an error report instead. The region is trimmed on entry and echoed
    /// back in the report.
    pub async fn resolve(&self, region: &str) -> RainReport {
        let region = region.trim();
        let mut stage = Stage::TryRendered;

        loop {
            match stage {
                Stage::TryRendered => match self.try_rendered(region).await {
                    Some(probability) => return RainReport::success(region, probability),
                    None => stage = Stage::TryStatic,
                },
                Stage::TryStatic => match self.try_static(region).await {
                    Some(probability) => return RainReport::success(region, probability),
                    None => stage = Stage::Done,
                },
                Stage::Done => return RainReport::error(region),
            }
        }
    }

    /// Rendered stage: one browser session, then the region-scoped
    /// extraction strategies.
    async fn try_rendered(&self, region: &str) -> Option<u8> {
        match self.renderer.fetch(region).await {
            Ok(html) => {
                let hit = extractor::extract_probability(&html, region);
                if hit.is_none() {
                    tracing::warn!("rendered page had no probability for {region}");
                }
                hit
            }
            Err(e) => {
                tracing::warn!("rendered fetch failed for {region}: {e:#}");
                None
            }
        }
    }

    /// Static stage: one plain GET, then every extraction strategy
    /// including the page-wide sweep.
    async fn try_static(&self, region: &str) -> Option<u8> {
        match self.fetcher.fetch().await {
            Ok(body) => {
                let hit = extractor::extract_probability_with_fallback(&body, region);
                if hit.is_none() {
                    tracing::warn!("static page had no probability for {region}");
                }
                hit
            }
            Err(e) => {
                tracing::warn!("static fetch failed for {region}: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NoopRenderFetch;
    use crate::report::ReportStatus;

    /// Render stub that always serves the same page.
    struct FixedPage(&'static str);

    #[async_trait::async_trait]
    impl RenderFetch for FixedPage {
        async fn fetch(&self, _region: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn unreachable_config() -> ScrapeConfig {
        ScrapeConfig {
            source_url: "http://127.0.0.1:1/unreachable".to_string(),
            ..ScrapeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_rendered_hit_short_circuits() {
        let page = FixedPage(r#"<div>臺北市 降雨機率：75%</div>"#);
        let resolver = RainResolver::new(Arc::new(page), &unreachable_config());

        let report = resolver.resolve("臺北市").await;
        assert_eq!(report.status, ReportStatus::Success);
        assert_eq!(report.rain_probability, Some(75));
        assert_eq!(report.will_rain, Some(true));
    }

    #[tokio::test]
    async fn test_all_stages_exhausted_yields_error_report() {
        let resolver = RainResolver::new(Arc::new(NoopRenderFetch), &unreachable_config());

        let report = resolver.resolve("高雄市").await;
        assert_eq!(report.status, ReportStatus::Error);
        assert_eq!(report.rain_probability, None);
        assert_eq!(report.will_rain, None);
        assert_eq!(report.city, "高雄市");
    }

    #[tokio::test]
    async fn test_region_is_trimmed_and_echoed() {
        let resolver = RainResolver::new(Arc::new(NoopRenderFetch), &unreachable_config());

        let report = resolver.resolve("  臺北市  ").await;
        assert_eq!(report.city, "臺北市");
    }
}
