//! Error types for befunge-plus.
//!
//! Every fault in the interpreter is fatal: the run stops at the first one and
//! the CLI exits with a failure status. Conditions that the language defines
//! as non-errors (stack underflow, 62-bit overflow) never reach this module.
//!
//! # Error Categories
//!
//! - **Load**: the source file could not be turned into a grid
//! - **Runtime**: a fault raised by an instruction
//! - **Heap**: the arena is exhausted and collection reclaimed nothing
//! - **Io**: the console streams failed
//! - **Internal**: a broken interpreter invariant

use std::fmt;
use super::position::Position;

/// Configuration for error handling behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorConfig {
    /// How to handle division and modulo by zero.
    pub division_by_zero: DivisionByZeroPolicy,
    /// Maximum stack depth (0 = unlimited).
    pub max_stack_depth: usize,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            division_by_zero: DivisionByZeroPolicy::ReturnZero,
            max_stack_depth: super::stack::STACK_SIZE,
        }
    }
}

impl ErrorConfig {
    /// Strict mode: division by zero is a fault.
    pub fn strict() -> Self {
        Self {
            division_by_zero: DivisionByZeroPolicy::Error,
            ..Self::default()
        }
    }
}

/// Policy for handling division by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisionByZeroPolicy {
    /// Push zero and carry on.
    ReturnZero,
    /// Produce a runtime error.
    Error,
}

/// Errors raised while loading or running a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BefError {
    // ═══════════════════════════════════════════════════════════════════
    // Load Errors
    // ═══════════════════════════════════════════════════════════════════

    /// The source file could not be opened or read.
    SourceUnreadable {
        path: String,
        message: String,
    },

    /// A source line is wider than the grid.
    LineTooLong {
        /// 1-based line number.
        line: usize,
        length: usize,
        max: usize,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Runtime Errors
    // ═══════════════════════════════════════════════════════════════════

    /// A byte with no instruction meaning was dispatched outside string mode.
    UnknownInstruction {
        byte: u8,
        position: Position,
    },

    /// `h` or `t` was applied to an integer.
    NotABlock {
        operation: char,
        position: Position,
    },

    /// Division or modulo by zero under the strict policy.
    DivisionByZero {
        dividend: i64,
        position: Position,
    },

    /// The operand stack hit its configured depth.
    StackOverflow {
        max_depth: usize,
        position: Position,
    },

    /// The configured step budget ran out.
    StepLimitExceeded {
        limit: u64,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Heap Errors
    // ═══════════════════════════════════════════════════════════════════

    /// A full collection freed nothing; the arena cannot grow.
    OutOfMemory {
        capacity: usize,
    },

    // ═══════════════════════════════════════════════════════════════════
    // I/O and Internal Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Console read or write failure.
    Io {
        operation: String,
        message: String,
    },

    /// Internal error (should not occur in normal operation).
    Internal {
        message: String,
    },
}

impl fmt::Display for BefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BefError::SourceUnreadable { path, message } => {
                write!(f, "Cannot open '{}': {}", path, message)
            }
            BefError::LineTooLong { line, length, max } => {
                write!(f, "Line {} is {} characters wide (max: {})", line, length, max)
            }
            BefError::UnknownInstruction { byte, position } => {
                if byte.is_ascii_graphic() {
                    write!(f, "[{}] Unknown instruction: '{}'", position, *byte as char)
                } else {
                    write!(f, "[{}] Unknown instruction: byte {}", position, byte)
                }
            }
            BefError::NotABlock { operation, position } => {
                write!(f, "[{}] '{}' applied to an integer, expected a cell", position, operation)
            }
            BefError::DivisionByZero { dividend, position } => {
                write!(f, "[{}] Division by zero: {} / 0", position, dividend)
            }
            BefError::StackOverflow { max_depth, position } => {
                write!(f, "[{}] Stack overflow: exceeded maximum depth of {}", position, max_depth)
            }
            BefError::StepLimitExceeded { limit } => {
                write!(f, "Step limit exceeded: {} instructions", limit)
            }
            BefError::OutOfMemory { capacity } => {
                write!(f, "Not enough memory: all {} cells are reachable", capacity)
            }
            BefError::Io { operation, message } => {
                write!(f, "I/O error during {}: {}", operation, message)
            }
            BefError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for BefError {}

impl BefError {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            BefError::SourceUnreadable { .. } |
            BefError::LineTooLong { .. } => ErrorCategory::Load,

            BefError::UnknownInstruction { .. } |
            BefError::NotABlock { .. } |
            BefError::DivisionByZero { .. } |
            BefError::StackOverflow { .. } |
            BefError::StepLimitExceeded { .. } => ErrorCategory::Runtime,

            BefError::OutOfMemory { .. } => ErrorCategory::Heap,

            BefError::Io { .. } => ErrorCategory::Io,

            BefError::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Get the error code for programmatic handling.
    pub fn code(&self) -> u32 {
        match self {
            // Load: 1000-1999
            BefError::SourceUnreadable { .. } => 1001,
            BefError::LineTooLong { .. } => 1002,

            // Runtime: 2000-2999
            BefError::UnknownInstruction { .. } => 2001,
            BefError::NotABlock { .. } => 2002,
            BefError::DivisionByZero { .. } => 2003,
            BefError::StackOverflow { .. } => 2004,
            BefError::StepLimitExceeded { .. } => 2005,

            // Heap: 3000-3999
            BefError::OutOfMemory { .. } => 3001,

            // I/O: 7000-7999
            BefError::Io { .. } => 7001,

            // Internal: 9000-9999
            BefError::Internal { .. } => 9001,
        }
    }

    /// Get the grid position if the error happened at one.
    pub fn position(&self) -> Option<Position> {
        match self {
            BefError::UnknownInstruction { position, .. } |
            BefError::NotABlock { position, .. } |
            BefError::DivisionByZero { position, .. } |
            BefError::StackOverflow { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Process exit status for this error. Every fault exits 1, like the
    /// reference interpreter.
    pub fn exit_status(&self) -> i32 {
        1
    }

    pub(crate) fn io(operation: &str, err: std::io::Error) -> Self {
        BefError::Io {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

/// Error category for filtering and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Load,
    Runtime,
    Heap,
    Io,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Load => write!(f, "load"),
            ErrorCategory::Runtime => write!(f, "runtime"),
            ErrorCategory::Heap => write!(f, "heap"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Result type alias for befunge-plus operations.
pub type BefResult<T> = Result<T, BefError>;
