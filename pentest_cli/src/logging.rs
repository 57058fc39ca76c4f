//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `PENTEST_LOG=pentest_core=debug`
pub const LOG_ENV: &str = "PENTEST_LOG";

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "pentest_core=debug,pentest=debug"
    } else {
        "pentest_core=info,pentest=info"
    }
}

/// Initialize logging to stderr so stdout stays clean for `--json`.
///
/// `PENTEST_LOG` wins over `verbose` when set. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
