//! Tracing setup for the binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. Logs go to stderr; stdout is reserved
/// for reports and generated JSON.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug`, `quiet`
/// selects `error`, and the default is `info`.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

const fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "topk_sweep=debug,info"
    } else {
        "info"
    }
}
