//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info` and millisecond
/// timestamps. Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// cavern::core::logging::init();
/// log::info!("Cave generation started");
/// ```
pub fn init() {
    // Tolerate a logger installed by the host or a previous call.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}
