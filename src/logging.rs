use env_logger::{Builder, Env};

/// Starts stderr logging. `RUST_LOG` wins over `default_level`. Safe to call
/// more than once; only the first call installs a logger.
pub fn init(default_level: &str) {
    let env = Env::default().default_filter_or(default_level);
    if let Err(err) = Builder::from_env(env).format_timestamp_secs().try_init() {
        log::debug!("logger already initialized: {}", err);
    }
}
