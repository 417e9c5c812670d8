use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Diagnostics go to stderr so they never mix with the payment link on
/// stdout. `RUST_LOG` takes precedence over `--verbose`.
pub fn register_logger(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let log_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(console::Term::stderr().features().colors_supported())
        .init();
}
