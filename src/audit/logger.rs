//! Audit logger implementation.
//!
//! Thread-safe audit logging with:
//! - Buffered file I/O, flushed per entry
//! - Severity-based filtering
//! - Two output formats (text, JSON Lines)
//!
//! Program output owns stdout, so console echo goes to stderr.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::entry::{AuditEntry, Severity};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the audit logger.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Path to the audit log file, if any.
    pub log_path: Option<PathBuf>,
    /// Minimum severity to log.
    pub min_severity: Severity,
    /// Whether to also print to stderr.
    pub echo_stderr: bool,
    /// Output format.
    pub format: AuditFormat,
}

/// Output format for audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditFormat {
    /// Structured text lines (default).
    #[default]
    Text,
    /// JSON Lines format.
    JsonLines,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            min_severity: Severity::Info,
            echo_stderr: false,
            format: AuditFormat::Text,
        }
    }
}

// =============================================================================
// Audit Logger
// =============================================================================

enum Sink {
    Discard,
    File(BufWriter<File>),
    Memory(Vec<String>),
}

/// Thread-safe audit logger.
pub struct AuditLogger {
    config: AuditConfig,
    sink: Mutex<Sink>,
    sequence: AtomicU64,
}

impl AuditLogger {
    /// Create a new audit logger with the given configuration.
    pub fn new(config: AuditConfig) -> std::io::Result<Self> {
        let sink = match &config.log_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Sink::File(BufWriter::new(file))
            }
            None => Sink::Discard,
        };

        Ok(Self {
            config,
            sink: Mutex::new(sink),
            sequence: AtomicU64::new(0),
        })
    }

    /// Create a logger that writes to the specified path.
    pub fn with_path(path: impl AsRef<Path>, format: AuditFormat) -> std::io::Result<Self> {
        Self::new(AuditConfig {
            log_path: Some(path.as_ref().to_path_buf()),
            format,
            ..Default::default()
        })
    }

    /// Create a logger that only echoes to stderr (no file).
    pub fn stderr_only(format: AuditFormat) -> Self {
        Self {
            config: AuditConfig {
                echo_stderr: true,
                format,
                ..Default::default()
            },
            sink: Mutex::new(Sink::Discard),
            sequence: AtomicU64::new(0),
        }
    }

    /// Create a logger that keeps formatted lines in memory.
    pub fn in_memory(format: AuditFormat) -> Self {
        Self {
            config: AuditConfig {
                format,
                ..Default::default()
            },
            sink: Mutex::new(Sink::Memory(Vec::new())),
            sequence: AtomicU64::new(0),
        }
    }

    fn render(&self, entry: &AuditEntry) -> std::io::Result<String> {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        match self.config.format {
            AuditFormat::Text => Ok(format!("{:08} | {}", seq, entry.format_line())),
            AuditFormat::JsonLines => entry.to_json().map_err(std::io::Error::from),
        }
    }

    /// Log an audit entry.
    pub fn log(&self, entry: AuditEntry) -> std::io::Result<()> {
        if entry.severity < self.config.min_severity {
            return Ok(());
        }

        let line = self.render(&entry)?;

        if let Ok(mut guard) = self.sink.lock() {
            match &mut *guard {
                Sink::Discard => {}
                Sink::File(w) => {
                    writeln!(w, "{}", line)?;
                    w.flush()?;
                }
                Sink::Memory(lines) => lines.push(line.clone()),
            }
        }

        if self.config.echo_stderr {
            eprintln!("{}", line);
        }

        Ok(())
    }

    /// Flush the log buffer.
    pub fn flush(&self) -> std::io::Result<()> {
        if let Ok(mut guard) = self.sink.lock() {
            if let Sink::File(w) = &mut *guard {
                w.flush()?;
            }
        }
        Ok(())
    }

    /// Lines kept by an in-memory logger; empty for other sinks.
    pub fn captured(&self) -> Vec<String> {
        match self.sink.lock() {
            Ok(guard) => match &*guard {
                Sink::Memory(lines) => lines.clone(),
                _ => Vec::new(),
            },
            Err(_) => Vec::new(),
        }
    }

    /// Get the current sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }
}
