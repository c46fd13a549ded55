use tracing_subscriber::EnvFilter;

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("proxyselect={}", default_level)))
}

/// Install the global stderr subscriber, filtered by `RUST_LOG` or else
/// `proxyselect=<default_level>`. `log` records are forwarded to it.
///
/// Returns false when the process already has a global subscriber.
pub fn init(default_level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
