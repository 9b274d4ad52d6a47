//! Tracing initialization.
//! Logs go to stderr so the program's own output on stdout stays clean.
//! The filter is read from `TRELLO_MOVE_LOG` (EnvFilter syntax) and
//! defaults to `warn`.

use tracing_subscriber::filter::EnvFilter;

const LOG_ENV: &str = "TRELLO_MOVE_LOG";
const DEFAULT_FILTER: &str = "warn";

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
