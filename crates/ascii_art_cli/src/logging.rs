//! Diagnostics go to stderr so they never interleave with art on stdout.
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map the `-v` count to a default level; `RUST_LOG` still takes precedence.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Records emitted through the `log` facade by
/// the rendering library are forwarded as well.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_for(verbosity).into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
