//! Console Logger
//!
//! `log` backend for the browser: every record is routed to the matching
//! `console.*` method so levels survive into the devtools filter.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use wasm_bindgen::JsValue;

/// Logger writing formatted records to the browser console
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(
            record.level(),
            record.target(),
            &record.args().to_string(),
        ));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Format a record as `[LEVEL target] message`
pub fn format_record(level: Level, target: &str, message: &str) -> String {
    format!("[{} {}] {}", level, target, message)
}

/// Parse a level name (case-insensitive), falling back to `Info`
pub fn parse_level(name: Option<&str>) -> LevelFilter {
    name.and_then(|n| n.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the console logger as the global `log` backend
///
/// # Arguments
/// * `level` - Maximum level that reaches the console
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ConsoleLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
