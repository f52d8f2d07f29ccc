use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Targets of the HTTP stack this service runs on. Matching is by prefix, so
/// `hyper` also silences `hyper_util` and `tower` silences `tower_http`.
const DEPENDENCY_TARGETS: &[&str] = &["axum", "h2", "hyper", "reqwest", "rustls", "tower"];

pub struct Logger {}

impl Logger {
    /// Install the terminal logger at `config.log_level_filter`.
    ///
    /// Below TRACE the HTTP stack is muted so that gate decisions and upstream
    /// failures are what shows up on the console.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        TermLogger::init(
            config.log_level_filter,
            Self::log_config(config.log_level_filter),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
    }

    fn log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if level < LevelFilter::Trace {
            for &target in DEPENDENCY_TARGETS {
                builder.add_filter_ignore_str(target);
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Record};
    use simplelog::WriteLogger;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Whether an INFO record from `target` reaches the output at `level`.
    fn is_written(level: LevelFilter, target: &str) -> bool {
        let output = Captured::default();
        let logger = WriteLogger::new(level, Logger::log_config(level), output.clone());

        logger.log(
            &Record::builder()
                .args(format_args!("sample line"))
                .level(Level::Info)
                .target(target)
                .module_path(Some(target))
                .build(),
        );
        logger.flush();

        let written = output.0.lock().unwrap();
        String::from_utf8_lossy(&written).contains("sample line")
    }

    #[test]
    fn test_http_stack_is_muted_at_info() {
        for target in ["reqwest::connect", "hyper_util::client", "tower_http::catch_panic"] {
            assert!(!is_written(LevelFilter::Info, target), "{target} was not muted");
        }
    }

    #[test]
    fn test_http_stack_is_shown_at_trace() {
        assert!(is_written(LevelFilter::Trace, "reqwest::connect"));
    }

    #[test]
    fn test_service_crates_are_shown_at_info() {
        for target in ["domain::gate", "web::error", "telegram_auth::init_data::verify"] {
            assert!(is_written(LevelFilter::Info, target), "{target} was muted");
        }
    }
}
