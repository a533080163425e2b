//! Structured audit logging for befunge-plus.
//!
//! Entries are append-only and carry structured fields, so a run can be
//! traced from startup through loading, each garbage collection, and the
//! final halt or fault.
//!
//! # Design Principles
//!
//! - **Immutable**: Entries cannot be modified after creation
//! - **Structured**: WHAT/WHICH/WHEN/OUTCOME pattern for all events
//! - **Out of band**: Never written to stdout, which belongs to the program
//!
//! # Modules
//!
//! - `entry`: Core audit entry types (AuditEntry, Severity, Outcome, ActionCategory)
//! - `logger`: Thread-safe logging to a file, stderr, or memory
//! - `global`: Global singleton logger for application-wide use
//!
//! # Example
//!
//! ```ignore
//! use befunge_plus::audit::{AuditLogger, AuditEntry, AuditFormat, Outcome};
//!
//! let logger = AuditLogger::with_path("/tmp/run.log", AuditFormat::JsonLines)?;
//! logger.log(AuditEntry::new(
//!     "LOAD",
//!     "Program",
//!     "hello.bf",
//!     "Loaded 3 lines",
//! ).with_outcome(Outcome::Success))?;
//! ```

mod entry;
mod logger;
mod global;

pub use entry::{AuditEntry, Severity, Outcome, ActionCategory};

pub use logger::{AuditLogger, AuditConfig, AuditFormat};

pub use global::{
    init_global_logger, init_global_logger_with, init_stderr_logger, global_logger,
    audit,
};

// =============================================================================
// Macros for Convenient Logging
// =============================================================================

/// Log an audit entry with structured fields to the global logger.
///
/// Optional fields must appear in the order shown; free-form fields go
/// in the trailing `meta` group and are rendered with `to_string`.
///
/// # Example
///
/// ```ignore
/// audit_log!(
///     action = "GC",
///     entity = ("Heap", "3"),
///     description = "Reclaimed 42 cells",
///     category = Heap,
///     outcome = Success,
///     duration_us = 120,
///     meta = { live: 7 },
/// );
/// ```
#[macro_export]
macro_rules! audit_log {
    (
        action = $action:expr,
        entity = ($etype:expr, $eid:expr),
        description = $desc:expr
        $(, category = $cat:ident)?
        $(, severity = $sev:ident)?
        $(, outcome = $out:ident)?
        $(, duration_us = $dur:expr)?
        $(, meta = { $($key:ident : $val:expr),* $(,)? })?
        $(,)?
    ) => {{
        if $crate::audit::global_logger().is_some() {
            #[allow(unused_mut)]
            let mut entry = $crate::audit::AuditEntry::new($action, $etype, $eid, $desc);
            $(entry = entry.with_category($crate::audit::ActionCategory::$cat);)?
            $(entry = entry.with_severity($crate::audit::Severity::$sev);)?
            $(entry = entry.with_outcome($crate::audit::Outcome::$out);)?
            $(entry = entry.with_duration_us($dur);)?
            $($(entry = entry.with_meta(stringify!($key), $val.to_string());)*)?
            $crate::audit::audit(entry);
        }
    }};
}
