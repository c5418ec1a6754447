//! Start the rainwatch HTTP service.

use crate::config::ScrapeConfig;
use crate::renderer::chromium::ChromiumFetcher;
use crate::renderer::{NoopRenderFetch, RenderFetch};
use crate::resolver::RainResolver;
use crate::rest::{self, AppState};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the resolver and serve the REST API until ctrl-c.
pub async fn run(port: u16) -> Result<()> {
    crate::cli::init_tracing();

    info!("starting rainwatch v{}", env!("CARGO_PKG_VERSION"));

    let config = ScrapeConfig::from_env();

    let renderer: Arc<dyn RenderFetch> = match ChromiumFetcher::new(config.clone()) {
        Ok(fetcher) => {
            info!("Chromium renderer initialized");
            Arc::new(fetcher)
        }
        Err(e) => {
            warn!("Failed to initialize Chromium: {e}");
            warn!("Running in static-only mode (every resolution skips the rendered stage)");
            Arc::new(NoopRenderFetch)
        }
    };

    let state = Arc::new(AppState {
        resolver: RainResolver::new(renderer, &config),
    });

    eprintln!(
        "  rainwatch v{} serving on port {port}",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("  Try: curl 'http://localhost:{port}/weather/臺北市'");

    rest::start(port, state).await
}
