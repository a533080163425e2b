//! Global audit logger singleton.

use std::sync::OnceLock;
use super::entry::AuditEntry;
use super::logger::{AuditLogger, AuditConfig, AuditFormat};

static GLOBAL_LOGGER: OnceLock<AuditLogger> = OnceLock::new();

/// Initialize the global audit logger.
pub fn init_global_logger(config: AuditConfig) -> std::io::Result<()> {
    init_global_logger_with(AuditLogger::new(config)?)
}

/// Install an already-built logger as the global one.
pub fn init_global_logger_with(logger: AuditLogger) -> std::io::Result<()> {
    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::AlreadyExists, "Logger already initialized"))
}

/// Initialize a stderr-only global logger (for CLI use).
pub fn init_stderr_logger(format: AuditFormat) {
    let _ = GLOBAL_LOGGER.set(AuditLogger::stderr_only(format));
}

/// Get a reference to the global logger (if initialized).
pub fn global_logger() -> Option<&'static AuditLogger> {
    GLOBAL_LOGGER.get()
}

/// Log to the global logger (no-op if not initialized).
pub fn audit(entry: AuditEntry) {
    if let Some(logger) = global_logger() {
        let _ = logger.log(entry);
    }
}
