pub mod application;
pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::*;
pub use storage::LedgerStore;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Install the global tracing subscriber. Logs go to stderr so they never mix
/// with command output; `verbose` lowers the level from WARN to DEBUG.
pub fn init_tracing(verbose: bool) {
    INIT_TRACING.call_once(|| {
        let level = if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    });
}
