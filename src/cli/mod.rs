//! CLI subcommand implementations for the rainwatch binary.

pub mod doctor;
pub mod probe;
pub mod serve;

/// Initialize tracing for commands that run the resolution pipeline.
///
/// `RAINWATCH_VERBOSE` (set by the global `--verbose` flag) raises the
/// default directive to debug; `RUST_LOG` still overrides everything.
pub fn init_tracing() {
    let directive = if std::env::var("RAINWATCH_VERBOSE").is_ok() {
        "rainwatch=debug"
    } else {
        "rainwatch=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .init();
}
