//! `log` sink that speaks UCI.
//!
//! Records become `info string` lines on stdout so a GUI shows them next to
//! the engine output. The level comes from the `MAILBOX_CHESS_LOG`
//! environment variable and defaults to `warn`.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

pub const LOG_LEVEL_ENV: &str = "MAILBOX_CHESS_LOG";

struct UciLogger;

static LOGGER: UciLogger = UciLogger;

impl Log for UciLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(
                stdout,
                "info string {} {}",
                record.level().as_str().to_lowercase(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Parse a level name, falling back to `warn`
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Install the logger with the level from the environment
pub fn init() -> Result<(), SetLoggerError> {
    let level = level_from(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from() {
        assert_eq!(level_from(None), LevelFilter::Warn);
        assert_eq!(level_from(Some("debug")), LevelFilter::Debug);
        assert_eq!(level_from(Some("TRACE")), LevelFilter::Trace);
        assert_eq!(level_from(Some("loud")), LevelFilter::Warn);
    }
}
