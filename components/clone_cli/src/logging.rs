//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber, writing to stderr.
///
/// `level` overrides `RUST_LOG`; the default is `info`. Safe to call more
/// than once, later calls are no-ops.
pub fn init(level: Option<&str>, json: bool) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
