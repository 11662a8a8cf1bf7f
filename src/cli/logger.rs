//! Logging setup for the CLI
//!
//! Events go to stderr through a compact `tracing-subscriber` formatter so
//! that stdout stays clean for command output such as completions or the
//! `list` table.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Level selection, first match wins:
/// 1. `--verbose`: debug for mathdb, info for the HTTP stack
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for mathdb, warnings for everything else
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("mathdb=debug,tower_http=debug,warn")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mathdb=info,tower_http=info,warn"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}
