use slog::{o, Drain, Logger};
use slog_async::Async;
use slog_term::{FullFormat, TermDecorator};

/// Configuration for setting up the logger
#[derive(Debug, Clone, Copy)]
pub struct LoggerConfig {
    async_buffer_size: usize,
    use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            async_buffer_size: 1024,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    pub fn new(async_buffer_size: usize, use_color: bool) -> Self {
        Self {
            async_buffer_size,
            use_color,
        }
    }
}

/// Sets up the root service logger. Per-component loggers are derived
/// from it with `logger.new(o!("component" => ...))`.
pub fn setup_logger(config: LoggerConfig) -> Logger {
    let decorator = {
        let builder = TermDecorator::new();
        let builder = if config.use_color {
            builder.force_color()
        } else {
            builder
        };
        builder.build()
    };

    let drain = FullFormat::new(decorator).build().fuse();

    let drain = Async::new(drain)
        .chan_size(config.async_buffer_size)
        .build()
        .fuse();

    Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_logger_builds_a_usable_root_logger() {
        let config = LoggerConfig::new(128, false);
        let logger = setup_logger(config);

        let component = logger.new(o!("component" => "tests"));
        slog::info!(component, "logger smoke test"; "ok" => true);
    }
}
