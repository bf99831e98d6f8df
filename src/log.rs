//! Leveled file logger for yit.
//!
//! Lines are appended to `<yit home>/yit.log`, which is truncated on each
//! start. Nothing is written until [`init_with_debug`] runs, so library users
//! and unit tests stay silent.
//!
//! Level usage:
//! - ERROR: saves that did not land
//! - WARN: recovered problems (malformed persisted state, unusable config)
//! - INFO: startup, shutdown and user-visible actions
//! - DEBUG: every store mutation and ignored no-op
//! - TRACE: payload sizes and raw key events
//!
//! `--debug` or `YIT_DEBUG=1` lowers the threshold to DEBUG. `YIT_LOG=<level>`
//! sets it explicitly and wins over both.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use crate::Error;

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static THRESHOLD: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

const LEVELS: [LogLevel; 5] = [
    LogLevel::Error,
    LogLevel::Warn,
    LogLevel::Info,
    LogLevel::Debug,
    LogLevel::Trace,
];

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LEVELS
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Validation(format!("unknown log level '{wanted}'")))
    }
}

/// Resolve the threshold from the `--debug` flag and the `YIT_DEBUG` /
/// `YIT_LOG` environment values.
fn threshold(debug: bool, yit_debug: Option<&str>, yit_log: Option<&str>) -> LogLevel {
    if let Some(level) = yit_log.and_then(|v| v.parse().ok()) {
        return level;
    }
    let env_debug = yit_debug.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    if debug || env_debug {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

/// Start logging to `<dir>/yit.log`.
///
/// If the directory or file cannot be created, logging stays off.
pub fn init_with_debug(debug: bool, dir: &Path) {
    let level = threshold(
        debug,
        std::env::var("YIT_DEBUG").ok().as_deref(),
        std::env::var("YIT_LOG").ok().as_deref(),
    );
    THRESHOLD.store(level as u8, Ordering::SeqCst);

    let path = dir.join("yit.log");
    if fs::create_dir_all(dir).and_then(|_| fs::write(&path, "")).is_ok() {
        LOG_PATH.set(path).ok();
    }
}

/// Path of the active log file, if logging was started.
pub fn log_path() -> Option<&'static Path> {
    LOG_PATH.get().map(PathBuf::as_path)
}

/// Whether a message at `level` would be written.
pub fn enabled(level: LogLevel) -> bool {
    LOG_PATH.get().is_some() && level as u8 <= THRESHOLD.load(Ordering::Relaxed)
}

/// Backend for the `ylog*` macros. Arguments are only formatted when the
/// level is enabled.
#[doc(hidden)]
pub fn write(level: LogLevel, args: fmt::Arguments<'_>) {
    if !enabled(level) {
        return;
    }
    let Some(path) = LOG_PATH.get() else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] [{}] {}", timestamp, level.as_str(), args);
    }
}

#[macro_export]
macro_rules! ylog {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::LogLevel::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! ylog_error {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::LogLevel::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! ylog_warn {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::LogLevel::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! ylog_debug {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::LogLevel::Debug, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! ylog_trace {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::LogLevel::Trace, format_args!($($arg)*))
    };
}
