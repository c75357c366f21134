use tracing_subscriber::{EnvFilter, fmt};

/// Install the stderr subscriber. `-v` sets the level outright; otherwise
/// `TALLY_LOG`, then `RUST_LOG`, then warn.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => std::env::var("TALLY_LOG")
            .ok()
            .and_then(|spec| EnvFilter::try_new(spec).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Already installed (tests, embedding) is fine.
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
