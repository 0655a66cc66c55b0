use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::uprintln;

/// Prints records as `LEVEL: message` lines on the boot UART.
struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

impl log::Log for SerialLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            uprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// # Safety
///
/// Must be called once, on the only running hart, with interrupts disabled.
pub unsafe fn init_logger() -> Result<(), SetLoggerError> {
    log::set_logger_racy(&LOGGER).map(|()| {
        log::set_max_level(if option_env!("VERBOSE_BUILD").is_some() {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        })
    })
}
