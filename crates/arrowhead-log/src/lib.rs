//! A minimal logging crate for the Arrowhead engine.
//!
//! This crate provides thread-safe logging with automatic module path
//! detection, colored terminal output, pluggable sinks, configurable log
//! levels, and the fail-fast reporter used by the memory core to stop the
//! process on unrecoverable conditions.
//!
//! Every message carries a [`Kind`]: engine internals log as [`Kind::Core`]
//! through the `core_*` macros, application code logs as [`Kind::User`]
//! through the plain macros. Any macro accepts an optional leading
//! `tag: "..."` that is printed next to the kind.
//!
//! # Example
//!
//! ```
//! use arrowhead_log::{error, warn, info, debug, core_info, Level};
//!
//! // Set the minimum log level
//! arrowhead_log::set_level(Level::Debug);
//!
//! let status = "running";
//! info!("Application is {}", status);
//! debug!("Debug information: {:?}", vec![1, 2, 3]);
//! warn!(tag: "Renderer", "Swapchain recreated");
//! core_info!("Scratch arenas ready");
//! error!("This is an error message");
//! ```
//!
//! # Fail-fast reporting
//!
//! [`core_assert!`] and [`user_assert!`] log the message at
//! [`Level::Fatal`], run the installed [`FatalHook`] (if any) and then
//! terminate the process. Tests install [`panic_on_fatal`] so the fatal path
//! becomes an observable panic:
//!
//! ```
//! use arrowhead_log::{core_assert, panic_on_fatal, set_fatal_hook};
//!
//! set_fatal_hook(Some(panic_on_fatal));
//!
//! let result = std::panic::catch_unwind(|| {
//!     core_assert!(1 + 1 == 3, "arithmetic is broken");
//! });
//! assert!(result.is_err());
//! ```

use std::fmt::{self, Arguments};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError, RwLock};

/// Log levels representing the severity/priority of log messages.
///
/// `Levels` are ordered from most severe (Fatal) to least severe (Trace).
/// Lower numeric values indicate higher severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Fatal level - the process is about to terminate
    Fatal = 0,
    /// Error level - critical failures and errors
    Error = 1,
    /// Warning level - potentially harmful situations
    Warn = 2,
    /// Info level - informational messages
    Info = 3,
    /// Debug level - detailed diagnostic information
    Debug = 4,
    /// Trace level - most detailed tracing information
    Trace = 5,
}

impl Level {
    /// Returns the ANSI color code for this log level.
    const fn color_code(&self) -> &'static str {
        match self {
            Level::Fatal => "\x1b[1;31m", // Bold red
            Level::Error => "\x1b[31m",   // Red
            Level::Warn => "\x1b[33m",    // Yellow
            Level::Info => "\x1b[32m",    // Green
            Level::Debug => "\x1b[36m",   // Cyan
            Level::Trace => "\x1b[35m",   // Magenta
        }
    }

    /// Returns the string representation of this log level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Fatal,
            1 => Level::Error,
            2 => Level::Warn,
            3 => Level::Info,
            4 => Level::Debug,
            5 => Level::Trace,
            _ => Level::Info,
        }
    }

    /// Parses a string into a Level.
    ///
    /// # Example
    ///
    /// ```
    /// use arrowhead_log::Level;
    ///
    /// assert_eq!(Level::from_str("error"), Ok(Level::Error));
    /// assert_eq!(Level::from_str("INFO"), Ok(Level::Info));
    /// assert_eq!(Level::from_str("warning"), Ok(Level::Warn));
    /// assert!(Level::from_str("invalid").is_err());
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_uppercase().as_str() {
            "FATAL" => Ok(Level::Fatal),
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who emitted a message: the engine itself or the application on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Engine internals (allocators, platform layer).
    Core,
    /// Application code.
    User,
}

impl Kind {
    /// Returns the string representation of this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Core => "Core",
            Kind::User => "User",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A destination for formatted log lines.
///
/// Sinks that report `colorize() == true` receive lines wrapped in ANSI
/// color codes; the others receive plain text.
pub trait Sink: Send {
    /// Writes one complete log line (without trailing newline).
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error. The logger ignores sink errors so a
    /// broken sink never takes the process down.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Whether lines sent to this sink should carry color codes.
    fn colorize(&self) -> bool;
}

/// Colorized sink writing to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")
    }

    fn colorize(&self) -> bool {
        true
    }
}

/// Plain-text sink writing to a file.
///
/// The file is truncated when the sink is created. Every line is flushed so
/// a fatal report is on disk before the process exits.
#[derive(Debug)]
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Creates (or truncates) the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from opening the file.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(FileSink {
            writer: BufWriter::new(file),
        })
    }
}

impl Sink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }

    fn colorize(&self) -> bool {
        false
    }
}

/// Callback run by the fail-fast reporter before the process terminates.
///
/// A hook that panics turns the fatal path into an unwinding panic, which is
/// how tests observe it.
pub type FatalHook = fn(&str);

/// The global logger instance.
///
/// This struct uses atomic operations for thread-safe level management.
/// It is intended to be used as a singleton via `get_logger()`.
pub struct Logger {
    level: AtomicU8,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
    fatal_hook: RwLock<Option<FatalHook>>,
}

impl Logger {
    /// Creates a new logger with the specified minimum level.
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            sinks: Mutex::new(Vec::new()),
            fatal_hook: RwLock::new(None),
        }
    }

    /// Sets the minimum log level.
    ///
    /// Messages below this level will not be logged.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum log level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Checks if a message at the given level would be logged.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    /// Adds a sink. Once any sink is installed, stdout is only written to
    /// through an explicit [`StdoutSink`].
    pub fn add_sink(&self, sink: Box<dyn Sink>) {
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sink);
    }

    /// Removes every sink, restoring the default stdout output.
    pub fn clear_sinks(&self) {
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Installs (or with `None`, removes) the fatal hook and returns the
    /// previous one.
    pub fn set_fatal_hook(&self, hook: Option<FatalHook>) -> Option<FatalHook> {
        let mut slot = self
            .fatal_hook
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, hook)
    }

    /// Returns the installed fatal hook.
    pub fn fatal_hook(&self) -> Option<FatalHook> {
        *self
            .fatal_hook
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(
        &self,
        level: Level,
        kind: Kind,
        tag: Option<&str>,
        target: &str,
        args: Arguments,
    ) {
        static RESET: &str = "\x1b[0m";

        let level_str = level.as_str();
        let body = match tag {
            Some(tag) => format!("[{kind}] [{tag}] {target}: {args}"),
            None => format!("[{kind}] {target}: {args}"),
        };

        let mut sinks =
            self.sinks.lock().unwrap_or_else(PoisonError::into_inner);

        if sinks.is_empty() {
            let color = level.color_code();
            println!("{color}[{level_str}]{RESET} {body}");
            return;
        }

        let plain = format!("[{level_str}] {body}");
        let colored = format!("{}[{level_str}]{RESET} {body}", level.color_code());
        for sink in sinks.iter_mut() {
            let line = if sink.colorize() { &colored } else { &plain };
            let _ = sink.write_line(line);
        }
    }
}

/// Global logger singleton.
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns a reference to the global logger instance.
///
/// This initializes the logger on first call with `Level::Info` as the default level.
///
/// # Example
///
/// ```
/// use arrowhead_log::get_logger;
///
/// let logger = get_logger();
/// logger.set_level(arrowhead_log::Level::Debug);
/// ```
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Info))
}

/// Sets the minimum log level for the global logger.
///
/// # Example
///
/// ```
/// use arrowhead_log::{set_level, Level};
///
/// set_level(Level::Debug);
/// ```
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum log level from a string.
///
/// # Example
///
/// ```
/// use arrowhead_log::set_level_from_str;
///
/// set_level_from_str("debug").unwrap();
/// ```
pub fn set_level_from_str(s: &str) -> Result<(), String> {
    let level = Level::from_str(s)?;
    set_level(level);
    Ok(())
}

/// Sets the minimum log level from the environment variable `var`.
///
/// Returns `Ok(false)` when the variable is not set, leaving the level
/// unchanged.
///
/// # Errors
///
/// Returns an error if the variable holds something other than a level name.
pub fn set_level_from_env(var: &str) -> Result<bool, String> {
    match std::env::var(var) {
        Ok(value) => set_level_from_str(&value).map(|()| true),
        Err(std::env::VarError::NotPresent) => Ok(false),
        Err(err) => Err(format!("{var}: {err}")),
    }
}

/// Adds a sink to the global logger.
pub fn add_sink(sink: impl Sink + 'static) {
    get_logger().add_sink(Box::new(sink));
}

/// Removes every sink from the global logger.
pub fn clear_sinks() {
    get_logger().clear_sinks();
}

/// Installs the fatal hook on the global logger, returning the previous one.
pub fn set_fatal_hook(hook: Option<FatalHook>) -> Option<FatalHook> {
    get_logger().set_fatal_hook(hook)
}

/// A [`FatalHook`] that panics with the fatal message.
///
/// Installing it turns every fail-fast report into a panic, so tests can use
/// `#[should_panic(expected = "...")]` against the reported message.
pub fn panic_on_fatal(message: &str) {
    panic!("{message}");
}

/// Internal function that performs the actual logging.
///
/// This function is called by the log macros after checking if the level is enabled.
#[doc(hidden)]
pub fn __log_with_target(
    level: Level,
    kind: Kind,
    tag: Option<&str>,
    target: &str,
    args: Arguments,
) {
    let logger = get_logger();
    if !logger.enabled(level) {
        return;
    }

    logger.emit(level, kind, tag, target, args);
}

/// Internal entry point of the fail-fast reporter.
///
/// Logs `args` at [`Level::Fatal`], runs the fatal hook and terminates the
/// process. Fatal messages are never filtered by the level.
#[doc(hidden)]
#[cold]
#[inline(never)]
pub fn __report_fatal(kind: Kind, target: &str, args: Arguments) -> ! {
    let logger = get_logger();
    let message = args.to_string();

    logger.emit(Level::Fatal, kind, None, target, format_args!("{message}"));

    #[cfg(feature = "backtrace")]
    {
        let trace = backtrace::Backtrace::new();
        logger.emit(
            Level::Fatal,
            kind,
            Some("backtrace"),
            target,
            format_args!("\n{trace:?}"),
        );
    }

    if let Some(hook) = logger.fatal_hook() {
        hook(&message);
    }

    std::process::exit(-1)
}

/// The primary logging macro.
///
/// Logs a message at the specified level. The macro automatically captures
/// the module path where it was called. `kind` defaults to [`Kind::User`].
///
/// # Example
///
/// ```
/// use arrowhead_log::{log, Kind, Level};
///
/// # arrowhead_log::set_level(Level::Info);
/// log!(level: Level::Info, "This is an info message: {}", 42);
/// log!(level: Level::Warn, kind: Kind::Core, tag: "Arena", "{} bytes left", 12);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, kind: $kind:expr, tag: $tag:expr, $($arg:tt)+) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    $kind,
                    ::core::option::Option::Some($tag),
                    module_path!(),
                    format_args!($($arg)+)
                );
            }
        }
    };
    (level: $level:expr, kind: $kind:expr, $($arg:tt)+) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    $kind,
                    ::core::option::Option::None,
                    module_path!(),
                    format_args!($($arg)+)
                );
            }
        }
    };
    (level: $level:expr, $($arg:tt)+) => {
        $crate::log!(level: $level, kind: $crate::Kind::User, $($arg)+)
    };
}

/// Logs a message at the Fatal level without terminating.
///
/// Use [`user_assert!`] or [`user_fail!`] to stop the process.
#[macro_export]
macro_rules! fatal {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Fatal, kind: $crate::Kind::User, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Fatal, kind: $crate::Kind::User, $($arg)+)
    };
}

/// Logs a message at the Error level.
///
/// # Example
///
/// ```
/// use arrowhead_log::error;
///
/// # let path = "/tmp/test.txt";
/// error!("Failed to open file: {}", path);
/// ```
#[macro_export]
macro_rules! error {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Error, kind: $crate::Kind::User, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Error, kind: $crate::Kind::User, $($arg)+)
    };
}

/// Logs a message at the Warn level.
///
/// # Example
///
/// ```
/// use arrowhead_log::warn;
///
/// # arrowhead_log::set_level(arrowhead_log::Level::Warn);
/// warn!("Deprecated feature used");
/// ```
#[macro_export]
macro_rules! warn {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Warn, kind: $crate::Kind::User, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Warn, kind: $crate::Kind::User, $($arg)+)
    };
}

/// Logs a message at the Info level.
///
/// # Example
///
/// ```
/// use arrowhead_log::info;
///
/// # arrowhead_log::set_level(arrowhead_log::Level::Info);
/// info!("Application started successfully");
/// info!(tag: "Audio", "Device opened");
/// ```
#[macro_export]
macro_rules! info {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Info, kind: $crate::Kind::User, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Info, kind: $crate::Kind::User, $($arg)+)
    };
}

/// Logs a message at the Debug level.
///
/// # Example
///
/// ```
/// use arrowhead_log::debug;
///
/// # let request = vec![1, 2, 3];
/// # arrowhead_log::set_level(arrowhead_log::Level::Debug);
/// debug!("Processing request: {:?}", request);
/// ```
#[macro_export]
macro_rules! debug {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Debug, kind: $crate::Kind::User, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Debug, kind: $crate::Kind::User, $($arg)+)
    };
}

/// Logs a message at the Trace level.
///
/// # Example
///
/// ```
/// use arrowhead_log::trace;
///
/// # let function_name = "process_data";
/// # arrowhead_log::set_level(arrowhead_log::Level::Trace);
/// trace!("Entering function: {}", function_name);
/// ```
#[macro_export]
macro_rules! trace {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Trace, kind: $crate::Kind::User, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Trace, kind: $crate::Kind::User, $($arg)+)
    };
}

/// Logs an engine message at the Fatal level without terminating.
#[macro_export]
macro_rules! core_fatal {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Fatal, kind: $crate::Kind::Core, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Fatal, kind: $crate::Kind::Core, $($arg)+)
    };
}

/// Logs an engine message at the Error level.
#[macro_export]
macro_rules! core_error {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Error, kind: $crate::Kind::Core, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Error, kind: $crate::Kind::Core, $($arg)+)
    };
}

/// Logs an engine message at the Warn level.
#[macro_export]
macro_rules! core_warn {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Warn, kind: $crate::Kind::Core, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Warn, kind: $crate::Kind::Core, $($arg)+)
    };
}

/// Logs an engine message at the Info level.
#[macro_export]
macro_rules! core_info {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Info, kind: $crate::Kind::Core, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Info, kind: $crate::Kind::Core, $($arg)+)
    };
}

/// Logs an engine message at the Debug level.
#[macro_export]
macro_rules! core_debug {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Debug, kind: $crate::Kind::Core, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Debug, kind: $crate::Kind::Core, $($arg)+)
    };
}

/// Logs an engine message at the Trace level.
#[macro_export]
macro_rules! core_trace {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Trace, kind: $crate::Kind::Core, tag: $tag, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!(level: $crate::Level::Trace, kind: $crate::Kind::Core, $($arg)+)
    };
}

/// Reports an unrecoverable engine error and terminates the process.
///
/// The expression has type `!`.
#[macro_export]
macro_rules! core_fail {
    ($($arg:tt)+) => {
        $crate::__report_fatal($crate::Kind::Core, module_path!(), format_args!($($arg)+))
    };
}

/// Reports an unrecoverable application error and terminates the process.
#[macro_export]
macro_rules! user_fail {
    ($($arg:tt)+) => {
        $crate::__report_fatal($crate::Kind::User, module_path!(), format_args!($($arg)+))
    };
}

/// Checks an engine invariant; on failure reports it and terminates.
///
/// Unlike `debug_assert!`, the check is kept in release builds.
///
/// # Example
///
/// ```
/// use arrowhead_log::core_assert;
///
/// let offset = 8;
/// let capacity = 16;
/// core_assert!(offset <= capacity, "offset {} beyond {}", offset, capacity);
/// ```
#[macro_export]
macro_rules! core_assert {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::core_fail!($($arg)+);
        }
    };
    ($cond:expr $(,)?) => {
        $crate::core_assert!($cond, "assertion failed: {}", stringify!($cond))
    };
}

/// Checks an application invariant; on failure reports it and terminates.
#[macro_export]
macro_rules! user_assert {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::user_fail!($($arg)+);
        }
    };
    ($cond:expr $(,)?) => {
        $crate::user_assert!($cond, "assertion failed: {}", stringify!($cond))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Serializes tests that assert on the global level.
    static GLOBAL_LEVEL: Mutex<()> = Mutex::new(());

    /// Sink that records plain lines for inspection.
    struct MemorySink {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Sink for MemorySink {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.lines.lock().unwrap().push(line.to_string());
            Ok(())
        }

        fn colorize(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Fatal < Level::Error);
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!(Level::from_str("fatal"), Ok(Level::Fatal));
        assert_eq!(Level::from_str("error"), Ok(Level::Error));
        assert_eq!(Level::from_str("WARN"), Ok(Level::Warn));
        assert_eq!(Level::from_str("Warning"), Ok(Level::Warn));
        assert_eq!(Level::from_str("Info"), Ok(Level::Info));
        assert_eq!(Level::from_str(" DEBUG "), Ok(Level::Debug));
        assert_eq!(Level::from_str("trace"), Ok(Level::Trace));
        assert!(Level::from_str("invalid").is_err());
    }

    #[test]
    fn test_level_as_str() {
        assert_eq!(Level::Fatal.as_str(), "FATAL");
        assert_eq!(Level::Error.as_str(), "ERROR");
        assert_eq!(Level::Warn.as_str(), "WARN");
        assert_eq!(Level::Info.as_str(), "INFO");
        assert_eq!(Level::Debug.as_str(), "DEBUG");
        assert_eq!(Level::Trace.as_str(), "TRACE");
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(Kind::Core.to_string(), "Core");
        assert_eq!(Kind::User.to_string(), "User");
    }

    #[test]
    fn test_logger_level_filtering() {
        let logger = Logger::new(Level::Info);

        assert!(logger.enabled(Level::Fatal));
        assert!(logger.enabled(Level::Error));
        assert!(logger.enabled(Level::Warn));
        assert!(logger.enabled(Level::Info));
        assert!(!logger.enabled(Level::Debug));
        assert!(!logger.enabled(Level::Trace));

        logger.set_level(Level::Debug);

        assert!(logger.enabled(Level::Debug));
        assert!(!logger.enabled(Level::Trace));

        logger.set_level(Level::Fatal);

        assert!(logger.enabled(Level::Fatal));
        assert!(!logger.enabled(Level::Error));
    }

    #[test]
    fn test_logger_sinks_receive_plain_lines() {
        let logger = Logger::new(Level::Trace);
        let lines = Arc::new(Mutex::new(Vec::new()));
        logger.add_sink(Box::new(MemorySink {
            lines: Arc::clone(&lines),
        }));

        logger.emit(Level::Warn, Kind::Core, None, "arena", format_args!("low on space"));
        logger.emit(
            Level::Info,
            Kind::User,
            Some("Pool"),
            "game",
            format_args!("{} nodes", 3),
        );

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[WARN] [Core] arena: low on space");
        assert_eq!(lines[1], "[INFO] [User] [Pool] game: 3 nodes");
    }

    #[test]
    fn test_clear_sinks() {
        let logger = Logger::new(Level::Trace);
        let lines = Arc::new(Mutex::new(Vec::new()));
        logger.add_sink(Box::new(MemorySink {
            lines: Arc::clone(&lines),
        }));
        logger.clear_sinks();

        logger.emit(Level::Info, Kind::User, None, "game", format_args!("to stdout"));
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_file_sink_truncates_and_writes() {
        let path = std::env::temp_dir().join(format!(
            "arrowhead-log-{}.log",
            std::process::id()
        ));
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut sink = FileSink::create(&path).unwrap();
        assert!(!sink.colorize());
        sink.write_line("[INFO] [User] test: hello").unwrap();
        drop(sink);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[INFO] [User] test: hello\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_fatal_hook_replacement() {
        let logger = Logger::new(Level::Info);
        assert!(logger.fatal_hook().is_none());

        let previous = logger.set_fatal_hook(Some(panic_on_fatal));
        assert!(previous.is_none());
        assert!(logger.fatal_hook().is_some());

        let previous = logger.set_fatal_hook(None);
        assert!(previous.is_some());
        assert!(logger.fatal_hook().is_none());
    }

    #[test]
    #[should_panic(expected = "invariant broken: 7")]
    fn test_core_assert_reports_through_hook() {
        set_fatal_hook(Some(panic_on_fatal));
        let value = 7;
        core_assert!(value == 0, "invariant broken: {}", value);
    }

    #[test]
    #[should_panic(expected = "assertion failed: 1 > 2")]
    fn test_user_assert_default_message() {
        set_fatal_hook(Some(panic_on_fatal));
        user_assert!(1 > 2);
    }

    #[test]
    fn test_core_assert_passes_silently() {
        set_fatal_hook(Some(panic_on_fatal));
        core_assert!(2 > 1, "never reported");
        user_assert!(true);
    }

    #[test]
    fn test_set_level_from_str() {
        let _guard = GLOBAL_LEVEL.lock().unwrap_or_else(PoisonError::into_inner);
        set_level_from_str("debug").unwrap();
        assert_eq!(get_logger().level(), Level::Debug);

        set_level_from_str("ERROR").unwrap();
        assert_eq!(get_logger().level(), Level::Error);

        assert!(set_level_from_str("invalid").is_err());
    }

    #[test]
    fn test_set_level_from_env_missing_var() {
        assert_eq!(
            set_level_from_env("ARROWHEAD_LOG_TEST_UNSET_VARIABLE"),
            Ok(false)
        );
    }

    #[test]
    fn test_global_logger_singleton() {
        let _guard = GLOBAL_LEVEL.lock().unwrap_or_else(PoisonError::into_inner);
        // Reset to Info level
        set_level(Level::Info);
        assert_eq!(get_logger().level(), Level::Info);

        // Change level
        set_level(Level::Debug);
        assert_eq!(get_logger().level(), Level::Debug);

        // Verify it's the same instance
        let logger1 = get_logger();
        let logger2 = get_logger();
        logger1.set_level(Level::Warn);
        assert_eq!(logger2.level(), Level::Warn);
    }

    #[test]
    fn test_macros_basic() {
        let _guard = GLOBAL_LEVEL.lock().unwrap_or_else(PoisonError::into_inner);
        set_level(Level::Info);

        info!("This is an info message");
        info!(tag: "Test", "Tagged info message");
        core_info!("Core info message");
        core_warn!(tag: "Test", "Tagged core warning");
        debug!("This debug message should not appear");
        fatal!("Fatal-level message without terminating");

        set_level(Level::Debug);
        debug!("Now debug messages should appear");
        core_debug!("And core debug messages");
    }

    #[test]
    fn test_thread_safety() {
        use std::thread;

        let _guard = GLOBAL_LEVEL.lock().unwrap_or_else(PoisonError::into_inner);

        set_level(Level::Info);

        let handles: Vec<_> = (0..10)
            .map(|i| {
                thread::spawn(move || {
                    info!("Thread {} message", i);
                    core_debug!("Thread {} debug (should not show)", i);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
