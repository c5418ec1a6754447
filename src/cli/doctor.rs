//! Environment readiness check.

use crate::config::{self, ScrapeConfig};
use crate::renderer::chromium::find_chromium;
use anyhow::Result;
use url::Url;

/// Check Chromium availability, the source URL, and the region table.
pub async fn run() -> Result<()> {
    println!("Rainwatch Doctor");
    println!("================");
    println!();

    // OS and architecture
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Check Chromium
    let chromium_path = find_chromium();
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!("[!!] Chromium NOT found. Rendered fetches will be skipped."),
    }

    // Check the source URL
    let config = ScrapeConfig::from_env();
    match Url::parse(&config.source_url) {
        Ok(url) => println!("[OK] Source URL parses: {url}"),
        Err(e) => println!("[!!] Source URL invalid ({e}): {}", config.source_url),
    }

    // Region table sanity
    if config::is_supported(config::DEFAULT_REGION) {
        println!(
            "[OK] Region table lists the default region ({}, {} regions total)",
            config::DEFAULT_REGION,
            config::TAIWAN_REGIONS.len()
        );
    } else {
        println!("[!!] Region table is missing the default region");
    }

    println!();
    if chromium_path.is_some() {
        println!("Status: READY");
    } else {
        println!("Status: DEGRADED (static fetch only)");
        println!("  Install Chrome or Chromium to enable rendered fetches.");
    }

    Ok(())
}
