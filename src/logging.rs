//! Diagnostic logging.
//!
//! Pipeline results go to stdout through [`output`](crate::output); this
//! is for everything else (skipped files, dangling references, served
//! requests). Logs go to stderr. `RUST_LOG` overrides the level when set.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive: `-v` raises this crate to debug.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "soulpress=debug,info" } else { "soulpress=info,warn" }
}

pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
