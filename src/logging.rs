// src/logging.rs
// =============================================================================
// Sets up `tracing` output.
//
// Logs go to stderr so the sitemap on stdout can be piped or redirected on
// its own. RUST_LOG always wins; without it, --verbose turns on per-page
// debug logs for this crate and everything else stays at info.
// =============================================================================

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "info,site_mapper=debug"
    } else {
        "warn,site_mapper=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();
}
