//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber writing to stderr
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or debug
/// events of this crate with `--verbose`. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "vcl_deploy=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
