//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// gridbrush::core::logging::init();
/// log::info!("Editor started");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}

/// Like [`init`], but tolerates a logger that is already installed.
///
/// Useful from tests, where several cases may race to set up logging.
pub fn try_init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .is_test(true)
    .try_init();
}
