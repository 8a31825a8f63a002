//! Log sinks for the binary: a file under the config dir and an in-memory
//! ring buffer the terminal client shows in its log view.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use simplelog::{CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, WriteLogger};

/// Lines kept by the in-memory log view.
pub const LOG_BUFFER_CAPACITY: usize = 500;

/// Environment variable selecting the log level when `--verbose` is absent.
pub const LOG_LEVEL_ENV: &str = "PI_PIANOTEQ_LOG_LEVEL";

#[derive(Debug, Default)]
struct LogLines {
    lines: VecDeque<String>,
    partial: String,
    capacity: usize,
}

/// Shared ring buffer of formatted log lines. Cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<LogLines>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogLines {
                capacity: capacity.max(1),
                ..LogLines::default()
            })),
        }
    }

    pub fn push_line(&self, line: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.push(line.to_string());
        }
    }

    /// The newest `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(inner) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = inner.lines.len().saturating_sub(count);
        inner.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LOG_BUFFER_CAPACITY)
    }
}

impl LogLines {
    fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?;
        inner.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = inner.partial.find('\n') {
            let line: String = inner.partial.drain(..=pos).collect();
            let line = line.trim_end().to_string();
            if !line.is_empty() {
                inner.push(line);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `--verbose` wins, then the environment, then `Info`.
pub fn log_level(verbose: bool, env_level: Option<&str>) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    env_level
        .and_then(|level| LevelFilter::from_str(level.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

pub fn log_file_path() -> PathBuf {
    pipq_core::config::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pi_pianoteq.log")
}

/// Install the global logger: the log file plus `buffer`.
pub fn init_logging(verbose: bool, buffer: &LogBuffer) {
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let level = log_level(verbose, env_level.as_deref());

    let log_path = log_file_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let log_file = File::create(&log_path).or_else(|_| File::create("/tmp/pi_pianoteq.log"));

    let buffer_config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> =
        vec![WriteLogger::new(level, buffer_config, buffer.clone())];
    if let Ok(file) = log_file {
        loggers.push(WriteLogger::new(level, simplelog::Config::default(), file));
    }

    if CombinedLogger::init(loggers).is_err() {
        return;
    }

    log::info!("pi-pianoteq {} starting (log level: {:?})", env!("CARGO_PKG_VERSION"), level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_split_into_lines() {
        let mut buffer = LogBuffer::new(10);
        buffer.write_all(b"[INFO] first\n[WARN] sec").unwrap();
        assert_eq!(buffer.tail(10), vec!["[INFO] first"]);
        buffer.write_all(b"ond\n").unwrap();
        assert_eq!(buffer.tail(10), vec!["[INFO] first", "[WARN] second"]);
    }

    #[test]
    fn oldest_lines_are_dropped_at_capacity() {
        let buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push_line(&format!("line {}", i));
        }
        assert_eq!(buffer.tail(10), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(buffer.tail(1), vec!["line 4"]);
    }

    #[test]
    fn clones_share_lines() {
        let buffer = LogBuffer::default();
        let other = buffer.clone();
        other.push_line("shared");
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn verbose_overrides_environment() {
        assert_eq!(log_level(true, Some("error")), LevelFilter::Debug);
        assert_eq!(log_level(false, Some("warn")), LevelFilter::Warn);
        assert_eq!(log_level(false, Some("nonsense")), LevelFilter::Info);
        assert_eq!(log_level(false, None), LevelFilter::Info);
    }
}
