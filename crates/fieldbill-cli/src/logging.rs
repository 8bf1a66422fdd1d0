use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging on stderr.
///
/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(verbose).with_writer(std::io::stderr))
        .init();
}
