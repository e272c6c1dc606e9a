use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins over `log_level`. Logs go to stderr; stdout is reserved
/// for the outcome line.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
