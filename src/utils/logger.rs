//! Logging setup
//!
//! The CLI installs `Logger`, a `log` backend that echoes every record to
//! stderr and, once a log file is attached, writes it there as well. Library
//! users and tests can use `init_env` instead, which installs `env_logger`
//! driven by `RUST_LOG`.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use lazy_static::lazy_static;
use log::{Log, Record, Metadata, LevelFilter};

lazy_static! {
    /// Backend installed by `install_console`; the level is capped through
    /// `log::set_max_level`.
    static ref GLOBAL_LOGGER: Logger = Logger::console(LevelFilter::Trace);
}

/// File and console logger
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    level: LevelFilter,
}

impl Logger {
    /// Creates a logger writing to `log_file`
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file, truncated on open
    /// * `level` - Most verbose level that is recorded
    pub fn new(log_file: &str, level: LevelFilter) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level,
        })
    }

    /// Logger that only writes to the console
    pub fn console(level: LevelFilter) -> Self {
        Logger {
            file: Mutex::new(None),
            level,
        }
    }

    /// Appends a line to the log file, if there is one
    pub fn append(&self, message: &str) -> io::Result<()> {
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Start writing to `log_file`, replacing any previous file
    pub fn open_file(&self, log_file: &str) -> io::Result<()> {
        let file = File::create(Path::new(log_file))?;
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(file);
        Ok(())
    }

    /// Install the global console logger
    ///
    /// Records are visible from this point on; a log file can be attached
    /// later with `log_to_file`.
    pub fn install_console(level: LevelFilter) {
        if log::set_logger(&*GLOBAL_LOGGER).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }
        log::set_max_level(level);
    }

    /// Also write records of the global logger to `log_file`
    pub fn log_to_file(log_file: &str) -> io::Result<()> {
        GLOBAL_LOGGER.open_file(log_file)
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.append(&message);
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {}
}

/// Install `env_logger`, honouring `RUST_LOG`
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_env() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn file_logger_respects_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rastermask.log");
        let logger = Logger::new(path.to_str().unwrap(), LevelFilter::Info).unwrap();

        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));

        logger.append("first line").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first line\n");
    }

    #[test]
    fn console_logger_ignores_append() {
        let logger = Logger::console(LevelFilter::Warn);
        assert!(logger.append("nowhere").is_ok());
    }

    #[test]
    fn file_can_be_attached_later() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.log");
        let logger = Logger::console(LevelFilter::Info);

        logger.append("before").unwrap();
        logger.open_file(path.to_str().unwrap()).unwrap();
        logger.log(&Record::builder()
            .level(Level::Warn)
            .args(format_args!("unknown config section"))
            .build());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[WARN] unknown config section\n");
    }
}
