//! befunge-plus: a Befunge-93 interpreter extended with garbage-collected
//! cons cells.
//!
//! Programs live on an 80x25 toroidal grid. On top of the classic
//! instruction set, `c` builds a two-field cell from the top two stack
//! values, and `h`/`t` read its fields back. Cells are reclaimed by a
//! mark-sweep collector that treats the operand stack as its only roots.

// ═══════════════════════════════════════════════════════════════════════════
// Layer 0: Core (No internal dependencies)
// ═══════════════════════════════════════════════════════════════════════════
pub mod core;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 1: Program Representation (depends on core)
// ═══════════════════════════════════════════════════════════════════════════
pub mod opcode;
pub mod grid;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 2: Runtime (depends on core, grid)
// ═══════════════════════════════════════════════════════════════════════════
pub mod runtime;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 3: VM (depends on all of the above)
// ═══════════════════════════════════════════════════════════════════════════
pub mod vm;

// ═══════════════════════════════════════════════════════════════════════════
// Cross-cutting
// ═══════════════════════════════════════════════════════════════════════════
pub mod audit;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use crate::core::{
    BefError, BefResult, ErrorConfig, ErrorCategory, DivisionByZeroPolicy,
    Value, BlockId, Stack, Heap, GcStats, Position, Direction,
};
pub use opcode::OpCode;
pub use grid::Grid;
pub use runtime::{load_file, InputSource, OutputSink, ReaderInput, WriterOutput, OutputBuffer, OutputItem};
pub use vm::{Vm, VmStatus, ExecutorConfig, RunSummary};
