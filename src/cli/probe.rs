//! One-shot resolution from the command line.

use crate::config::ScrapeConfig;
use crate::renderer::chromium::ChromiumFetcher;
use crate::renderer::{NoopRenderFetch, RenderFetch};
use crate::resolver::RainResolver;
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// Resolve a single city through the full pipeline and print the result.
///
/// The city is not checked against the whitelist here: probing arbitrary
/// region strings is the point of the command.
pub async fn run(city: &str, json: bool) -> Result<()> {
    crate::cli::init_tracing();

    let config = ScrapeConfig::from_env();

    let renderer: Arc<dyn RenderFetch> = match ChromiumFetcher::new(config.clone()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            warn!("Chromium unavailable, static fetch only: {e}");
            Arc::new(NoopRenderFetch)
        }
    };

    let resolver = RainResolver::new(renderer, &config);
    let report = resolver.resolve(city).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.city);
    match report.rain_probability {
        Some(probability) => {
            println!("  Rain probability: {probability}%");
            let verdict = if report.will_rain == Some(true) {
                "bring an umbrella"
            } else {
                "no rain expected"
            };
            println!("  Verdict: {verdict}");
        }
        None => {
            println!("  {}", report.message);
        }
    }

    Ok(())
}
