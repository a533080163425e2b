//! Virtual machine for befunge-plus.
//!
//! # Architecture
//!
//! The `Vm` runs one program to completion: fetch the compiled instruction
//! under the cursor, execute it, move. The operand stack doubles as the
//! garbage collector's root set, so the heap is only ever handed the stack
//! when it allocates.
//!
//! Configuration comes from `ExecutorConfig`; the result of a successful
//! run is a `RunSummary`.

pub mod executor;

pub use executor::{Vm, VmStatus, ExecutorConfig, RunSummary};
