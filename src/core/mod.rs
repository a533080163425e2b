//! Core types for the befunge-plus virtual machine.
//!
//! This module defines the data types everything else is built from:
//!
//! - **Position**: Grid geometry and cursor direction
//! - **Value**: 62-bit integers and cell references
//! - **Stack**: The operand stack, which underflows to zero
//! - **Heap**: Cons cells with a mark-sweep collector
//! - **Error**: The error hierarchy
//!
//! # Layer 0 - No Internal Dependencies
//!
//! Apart from the audit hooks in the collector, this module depends on
//! no other befunge-plus module.

pub mod position;
pub mod error;
pub mod value;
pub mod stack;
pub mod heap;

// Re-export primary types at module level
pub use position::{Position, Direction, GRID_W, GRID_H};
pub use error::{BefError, BefResult, ErrorConfig, ErrorCategory, DivisionByZeroPolicy};
pub use value::{Value, BlockId, INT_MIN, INT_MAX};
pub use stack::{Stack, STACK_SIZE};
pub use heap::{Heap, Block, GcStats, HEAP_SIZE};
