use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    init_logging();
    echo_example::app().run_from_env();
}

/// Logs go to standard error so they never mix with printed output.
/// `RUST_LOG=debug` shows how arguments were resolved.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
