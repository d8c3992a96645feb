use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "chirpy_api=info,chirpy_db=info";

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .try_init()
        .is_ok()
}
