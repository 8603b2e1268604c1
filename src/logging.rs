pub use log::LevelFilter::*;

/// Installs the process-wide logger. Only the first call takes effect.
pub fn setup_logging(verbosity: log::LevelFilter) {
    let result = fern::Dispatch::new()
        .level(verbosity)
        .format(|out, message, record| out.finish(format_args!("({}) {}: {}", record.level(), record.target(), message)))
        .chain(std::io::stdout())
        .apply();

    if let Err(err) = result {
        log::warn!("Logging was already set up: {}", err);
    }
}
