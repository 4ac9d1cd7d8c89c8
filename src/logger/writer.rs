//! Log writer module
//!
//! Routes log lines to files or stdout/stderr, chosen once at startup.

use super::Level;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

enum Sink {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl Sink {
    fn open(path: Option<&str>, console: Self) -> io::Result<Self> {
        path.map_or(Ok(console), |p| Ok(Self::File(Mutex::new(open_append(p)?))))
    }

    fn write_line(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Stderr => eprintln!("{line}"),
            Self::File(file) => {
                let mut f = file.lock().unwrap_or_else(PoisonError::into_inner);
                let _ = writeln!(f, "{line}");
            }
        }
    }
}

/// Two sinks: access and info lines share one, warnings and errors the other
pub struct LogWriter {
    access: Sink,
    error: Sink,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: Sink::open(access_log_file, Sink::Stdout)?,
            error: Sink::open(error_log_file, Sink::Stderr)?,
        })
    }

    /// Console-only writer, used before (or instead of) `init`
    const fn console() -> Self {
        Self {
            access: Sink::Stdout,
            error: Sink::Stderr,
        }
    }

    pub fn write(&self, level: Level, line: &str) {
        match level {
            Level::Access | Level::Info => self.access.write_line(line),
            Level::Warn | Level::Error => self.error.write_line(line),
        }
    }
}

fn open_append(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the process-wide writer
///
/// Fails if a log file cannot be opened or the writer is already installed.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER
        .set(writer)
        .map_err(|_| io::Error::new(io::ErrorKind::AlreadyExists, "log writer already set"))
}

/// The installed writer, or the console when `init` has not run
pub fn get() -> &'static LogWriter {
    static CONSOLE: LogWriter = LogWriter::console();
    LOG_WRITER.get().unwrap_or(&CONSOLE)
}
