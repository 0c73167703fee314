//! Leveled line logger.
//!
//! Each record is one line, `[LEVEL] <timestamp> message`, appended through a
//! buffered writer and flushed immediately so a crash loses nothing. The file
//! is created on the first write, not when the logger is constructed.

use lumiere_application::DiagnosticSink;
use lumiere_domain::{Diagnostic, LogLevel};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Attempted opening a log but a stream was already open")]
    AlreadyOpen,

    #[error("No log stream is open")]
    NotOpen,

    #[error("Log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

enum State {
    /// Not opened yet; the first write opens the file.
    Pending,
    Open(BufWriter<File>),
    Closed,
}

/// Line-oriented log file writer.
pub struct LineLogger {
    path: PathBuf,
    state: State,
}

impl LineLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: State::Pending,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Open the file. The first open truncates it; reopening after
    /// [`close`](Self::close) appends.
    pub fn open(&mut self) -> Result<(), LogError> {
        let append = match self.state {
            State::Open(_) => return Err(LogError::AlreadyOpen),
            State::Pending => false,
            State::Closed => true,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;

        self.state = State::Open(BufWriter::new(file));
        Ok(())
    }

    /// Write one record. Opens the file lazily on the first write.
    pub fn write(&mut self, level: LogLevel, message: &str) -> Result<(), LogError> {
        if matches!(self.state, State::Pending) {
            self.open()?;
        }
        let State::Open(writer) = &mut self.state else {
            return Err(LogError::NotOpen);
        };

        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        writeln!(writer, "{} {} {}", level.tag(), timestamp, message)
            .and_then(|_| writer.flush())
            .map_err(|source| LogError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Flush and close the file.
    pub fn close(&mut self) -> Result<(), LogError> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(mut writer) => writer.flush().map_err(|source| self.io_error(source)),
            previous => {
                self.state = previous;
                Err(LogError::NotOpen)
            }
        }
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Drop for LineLogger {
    fn drop(&mut self) {
        if let State::Open(writer) = &mut self.state {
            let _ = writer.flush();
        }
    }
}

/// Diagnostic sink writing to a [`LineLogger`].
///
/// Diagnostics below `min_level` are dropped. Write failures are reported
/// through `tracing` and otherwise ignored.
pub struct LineLogSink {
    logger: Mutex<LineLogger>,
    min_level: LogLevel,
}

impl LineLogSink {
    pub fn new(logger: LineLogger, min_level: LogLevel) -> Self {
        Self {
            logger: Mutex::new(logger),
            min_level,
        }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Close the underlying logger.
    pub fn close(&self) -> Result<(), LogError> {
        match self.logger.lock() {
            Ok(mut logger) => logger.close(),
            Err(_) => Err(LogError::NotOpen),
        }
    }
}

impl DiagnosticSink for LineLogSink {
    fn emit(&self, diagnostic: Diagnostic) {
        if diagnostic.level < self.min_level {
            return;
        }

        let mut line = format!("[{}] {}", diagnostic.kind, diagnostic.message);
        if let Some(trace) = &diagnostic.trace {
            line.push('\n');
            line.push_str(trace);
        }

        if let Ok(mut logger) = self.logger.lock()
            && let Err(e) = logger.write(diagnostic.level, &line)
        {
            warn!("Could not write diagnostic to log: {}", e);
        }
    }
}
