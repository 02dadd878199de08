//! Leveled, prefixed loggers with pluggable destinations.
//!
//! Every [`Logger`] has a prefix, a threshold and a [`Backend`]. Loggers can be chained: after a
//! logger has handled a message (whether or not its threshold let it through) the message bubbles
//! to the parent, which applies its own threshold and backend and sees the prefix chain
//! `parent:child`.
//!
//! ```
//! use std::sync::Arc;
//! use libutils::log::{Backend, LevelFilter, Logger, LoggerBuilder};
//! use libutils::log_info;
//!
//! let app = Arc::new(Logger::new("app"));
//! app.set_level(LevelFilter::INFO);
//! let db = LoggerBuilder::new("db").parent(Arc::clone(&app)).build().unwrap();
//! assert_eq!(db.backend(), Backend::Bubble);
//! // printed by `app` as "[app:db] connected"
//! log_info!(db, "connected");
//! ```

use std::ffi::CString;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Result, UtilsError};

/// Message severity, numbered like syslog priorities. Lower is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Alert = 1,
    Err = 3,
    Warning = 4,
    Info = 6,
    Debug = 7,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Alert => "alert",
            Level::Err => "err",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    const fn from_u8(n: u8) -> Option<Level> {
        match n {
            1 => Some(Level::Alert),
            3 => Some(Level::Err),
            4 => Some(Level::Warning),
            6 => Some(Level::Info),
            7 => Some(Level::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold of a logger: nothing, or every message at least as severe as the given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelFilter {
    Off,
    Max(Level),
}

impl LevelFilter {
    pub const ALERT: LevelFilter = LevelFilter::Max(Level::Alert);
    pub const ERR: LevelFilter = LevelFilter::Max(Level::Err);
    pub const WARNING: LevelFilter = LevelFilter::Max(Level::Warning);
    pub const INFO: LevelFilter = LevelFilter::Max(Level::Info);
    pub const DEBUG: LevelFilter = LevelFilter::Max(Level::Debug);

    pub fn allows(self, level: Level) -> bool {
        match self {
            LevelFilter::Off => false,
            LevelFilter::Max(max) => level <= max,
        }
    }

    /// Reads a threshold from the environment variable `var`. Unset or unparsable values yield
    /// `None`.
    pub fn from_env(var: &str) -> Option<LevelFilter> {
        std::env::var(var).ok()?.parse().ok()
    }

    const fn to_u8(self) -> u8 {
        match self {
            LevelFilter::Off => 0,
            LevelFilter::Max(level) => level as u8,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = UtilsError;

    fn from_str(s: &str) -> Result<Self> {
        let filter = match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => LevelFilter::Off,
            "alert" => LevelFilter::ALERT,
            "err" | "error" => LevelFilter::ERR,
            "warn" | "warning" => LevelFilter::WARNING,
            "info" => LevelFilter::INFO,
            "debug" => LevelFilter::DEBUG,
            other => return Err(UtilsError::Config(format!("unknown log level '{}'", other))),
        };
        Ok(filter)
    }
}

/// Where a logger writes the messages its threshold lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Errors and alerts to stderr, everything else to stdout.
    Stdio,
    /// Appends to the configured file, opened (and truncated) on first use.
    File,
    /// The system log.
    Syslog,
    /// No local output; the message only travels to the parent.
    Bubble,
}

const DEFAULT_MSG_FMT: &str = "[{prefix}] {message}";
const DEFAULT_PREFIX_FMT: &str = "{prefix}:{chain}";

pub struct Logger {
    prefix: String,
    level: AtomicU8,
    backend: Backend,
    file_path: Option<PathBuf>,
    file: Mutex<Option<File>>,
    msg_fmt: String,
    prefix_chain_fmt: String,
    parent: Option<Arc<Logger>>,
}

impl Logger {
    /// A root logger writing errors to the standard streams.
    pub fn new(prefix: &str) -> Logger {
        Logger {
            prefix: prefix.to_string(),
            level: AtomicU8::new(LevelFilter::ERR.to_u8()),
            backend: Backend::Stdio,
            file_path: None,
            file: Mutex::new(None),
            msg_fmt: DEFAULT_MSG_FMT.to_string(),
            prefix_chain_fmt: DEFAULT_PREFIX_FMT.to_string(),
            parent: None,
        }
    }

    /// A logger that only forwards to `parent`.
    pub fn child(parent: &Arc<Logger>, prefix: &str) -> Logger {
        Logger {
            backend: Backend::Bubble,
            parent: Some(Arc::clone(parent)),
            ..Logger::new(prefix)
        }
    }

    pub fn builder(prefix: &str) -> LoggerBuilder {
        LoggerBuilder::new(prefix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn parent(&self) -> Option<&Arc<Logger>> {
        self.parent.as_ref()
    }

    pub fn level(&self) -> LevelFilter {
        match Level::from_u8(self.level.load(Ordering::Relaxed)) {
            Some(level) => LevelFilter::Max(level),
            None => LevelFilter::Off,
        }
    }

    pub fn set_level(&self, level: LevelFilter) {
        self.level.store(level.to_u8(), Ordering::Relaxed);
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.level().allows(level)
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        self.emit(level, None, &message);
    }

    fn emit(&self, level: Level, chain: Option<&str>, message: &str) {
        let prefix = match chain {
            None => self.prefix.clone(),
            Some(chain) => fill(
                &self.prefix_chain_fmt,
                &[("prefix", &self.prefix), ("chain", chain)],
            ),
        };

        if self.enabled(level) {
            let mut line = fill(&self.msg_fmt, &[("prefix", &prefix), ("message", message)]);
            if !line.ends_with('\n') {
                line.push('\n');
            }
            self.write(level, &line);
        }

        if let Some(parent) = &self.parent {
            parent.emit(level, Some(&prefix), message);
        }
    }

    fn write(&self, level: Level, line: &str) {
        match self.backend {
            Backend::Stdio => {
                let _ = write_split(
                    level,
                    line,
                    &mut std::io::stdout().lock(),
                    &mut std::io::stderr().lock(),
                );
            }
            Backend::File => {
                let Some(path) = &self.file_path else { return };
                let mut file = match self.file.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                if file.is_none() {
                    *file = File::create(path).ok();
                }
                if let Some(f) = file.as_mut() {
                    let _ = f.write_all(line.as_bytes());
                }
            }
            Backend::Syslog => {
                let Ok(text) = CString::new(line.replace('\0', " ")) else { return };
                // SAFETY: both pointers are valid NUL-terminated strings for the duration of the
                // call, and the "%s" format consumes exactly one string argument.
                unsafe {
                    libc::syslog(level as libc::c_int, c"%s".as_ptr(), text.as_ptr());
                }
            }
            Backend::Bubble => {}
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("prefix", &self.prefix)
            .field("level", &self.level())
            .field("backend", &self.backend)
            .field("file_path", &self.file_path)
            .field("parent", &self.parent.as_ref().map(|p| p.prefix()))
            .finish()
    }
}

/// Alerts and errors go to `err`, everything else to `out`.
fn write_split(
    level: Level,
    line: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<()> {
    if level <= Level::Err {
        err.write_all(line.as_bytes())
    } else {
        out.write_all(line.as_bytes())
    }
}

/// Substitutes `{key}` placeholders of `template` in a single pass.
fn fill(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = pairs.iter().find_map(|(key, value)| {
            let close = key.len() + 1;
            (tail.get(1..close) == Some(*key) && tail.as_bytes().get(close) == Some(&b'}'))
                .then_some((value, close + 1))
        });
        match hit {
            Some((value, used)) => {
                out.push_str(value);
                rest = &tail[used..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub struct LoggerBuilder {
    prefix: String,
    level: LevelFilter,
    backend: Option<Backend>,
    file_path: Option<PathBuf>,
    msg_fmt: String,
    prefix_chain_fmt: String,
    parent: Option<Arc<Logger>>,
}

impl LoggerBuilder {
    pub fn new(prefix: &str) -> Self {
        LoggerBuilder {
            prefix: prefix.to_string(),
            level: LevelFilter::ERR,
            backend: None,
            file_path: None,
            msg_fmt: DEFAULT_MSG_FMT.to_string(),
            prefix_chain_fmt: DEFAULT_PREFIX_FMT.to_string(),
            parent: None,
        }
    }

    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Log to `path`; also selects [`Backend::File`].
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self.backend = Some(Backend::File);
        self
    }

    /// Line template; `{prefix}` and `{message}` are substituted.
    pub fn msg_format(mut self, fmt: &str) -> Self {
        self.msg_fmt = fmt.to_string();
        self
    }

    /// Prefix template used when a message bubbles up; `{prefix}` is this logger's prefix and
    /// `{chain}` the prefix the message arrived with.
    pub fn prefix_format(mut self, fmt: &str) -> Self {
        self.prefix_chain_fmt = fmt.to_string();
        self
    }

    pub fn parent(mut self, parent: Arc<Logger>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn build(self) -> Result<Logger> {
        let backend = self.backend.unwrap_or(if self.parent.is_some() {
            Backend::Bubble
        } else {
            Backend::Stdio
        });
        if backend == Backend::File && self.file_path.is_none() {
            return Err(UtilsError::Config(format!(
                "logger '{}' uses the file backend without a file",
                self.prefix
            )));
        }
        if !self.msg_fmt.contains("{message}") {
            return Err(UtilsError::Config(format!(
                "message format '{}' has no {{message}} placeholder",
                self.msg_fmt
            )));
        }
        Ok(Logger {
            prefix: self.prefix,
            level: AtomicU8::new(self.level.to_u8()),
            backend,
            file_path: self.file_path,
            file: Mutex::new(None),
            msg_fmt: self.msg_fmt,
            prefix_chain_fmt: self.prefix_chain_fmt,
            parent: self.parent,
        })
    }
}

#[macro_export]
macro_rules! log_alert {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::log::Level::Alert, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_err {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::log::Level::Err, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::log::Level::Warning, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::log::Level::Info, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::log::Level::Debug, format_args!($($arg)+))
    };
}
