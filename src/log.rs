// src/log.rs
use tracing_subscriber::EnvFilter;

use crate::config::consts::LOG_ENV;

/// Install the stderr subscriber. `MASKSYNC_LOG` wins over `verbose`.
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("masksync=debug")
        } else {
            EnvFilter::new("masksync=warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
