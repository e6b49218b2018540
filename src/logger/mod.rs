//! SDK-wide logging.
//!
//! Every subsystem owns a named [`Logger`] (its tag). Records below the global level are
//! discarded. The remaining records go to the optional user callback installed with
//! [`set_user_log_handler`] and then to the [`log`] facade, using the tag as the record target.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

use chrono::{DateTime, Utc};

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static USER_LOG_HANDLER: LazyLock<RwLock<Option<UserHandler>>> =
    LazyLock::new(|| RwLock::new(None));

pub type LogCallback = Arc<dyn Fn(LogCallbackParams) + Send + Sync + 'static>;

#[derive(Clone)]
struct UserHandler {
    callback: LogCallback,
    level: Option<LogLevel>,
}

/// Named logging handle. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Logger {
    tag: Arc<str>,
}

impl Logger {
    pub fn new(tag: impl Into<Arc<str>>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Debug, message);
    }

    pub fn verbose(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Verbose, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Error, message);
    }

    fn dispatch(&self, level: LogLevel, message: impl fmt::Display) {
        if level == LogLevel::Silent {
            return;
        }
        let global = log_level();
        let user_handler = USER_LOG_HANDLER
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone();

        let user_wants = user_handler
            .as_ref()
            .map(|handler| level >= handler.level.unwrap_or(global))
            .unwrap_or(false);
        if level < global && !user_wants {
            return;
        }

        let message = message.to_string();
        if let Some(handler) = user_handler.filter(|_| user_wants) {
            (handler.callback)(LogCallbackParams {
                level,
                message: message.clone(),
                tag: self.tag.to_string(),
                timestamp: Utc::now(),
            });
        }
        if level >= global {
            forward_to_log_facade(&self.tag, level, &message);
        }
    }
}

fn forward_to_log_facade(tag: &str, level: LogLevel, message: &str) {
    let level = match level {
        LogLevel::Debug => log::Level::Debug,
        LogLevel::Verbose => log::Level::Trace,
        LogLevel::Info => log::Level::Info,
        LogLevel::Warn => log::Level::Warn,
        LogLevel::Error => log::Level::Error,
        LogLevel::Silent => return,
    };
    log::log!(target: tag, level, "{message}");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Verbose = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Silent = 5,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Verbose,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Silent,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Silent => "SILENT",
        };
        f.write_str(label)
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "verbose" => Ok(LogLevel::Verbose),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" => Ok(LogLevel::Silent),
            other => Err(LogError::InvalidLogLevel(other.to_string())),
        }
    }
}

pub trait IntoLogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError>;
}

impl IntoLogLevel for LogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        Ok(self)
    }
}

impl IntoLogLevel for &str {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(self)
    }
}

impl IntoLogLevel for String {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(&self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub level: Option<LogLevel>,
}

impl LogOptions {
    pub fn with_level<L>(mut self, level: L) -> Result<Self, LogError>
    where
        L: IntoLogLevel,
    {
        self.level = Some(level.into_log_level()?);
        Ok(self)
    }
}

/// A single record handed to the user log callback.
#[derive(Debug, Clone)]
pub struct LogCallbackParams {
    pub level: LogLevel,
    pub message: String,
    pub tag: String,
    pub timestamp: DateTime<Utc>,
}

impl LogCallbackParams {
    pub fn level_label(&self) -> &'static str {
        self.level.as_str()
    }
}

#[derive(Debug, Clone)]
pub enum LogError {
    InvalidLogLevel(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::InvalidLogLevel(level) => {
                write!(f, "Invalid value \"{level}\" assigned to `logLevel`")
            }
        }
    }
}

impl std::error::Error for LogError {}

pub fn log_level() -> LogLevel {
    LogLevel::from_u8(GLOBAL_LOG_LEVEL.load(Ordering::SeqCst))
}

pub fn set_log_level<L>(level: L) -> Result<(), LogError>
where
    L: IntoLogLevel,
{
    let level = level.into_log_level()?;
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    Ok(())
}

/// Installs (or with `None`, removes) the process-wide user log callback.
///
/// When `options.level` is set the callback receives records at or above that level even if
/// the global level is stricter.
pub fn set_user_log_handler(callback: Option<LogCallback>, options: Option<LogOptions>) {
    let options = options.unwrap_or_default();
    let handler = callback.map(|callback| UserHandler {
        callback,
        level: options.level,
    });
    *USER_LOG_HANDLER
        .write()
        .unwrap_or_else(|poison| poison.into_inner()) = handler;
}

pub fn set_user_log_handler_fn<F>(callback: Option<F>, options: Option<LogOptions>)
where
    F: Fn(LogCallbackParams) + Send + Sync + 'static,
{
    let wrapped = callback.map(|cb| Arc::new(cb) as LogCallback);
    set_user_log_handler(wrapped, options);
}
